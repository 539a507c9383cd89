//! Walks a document through a short edit history.
//!
//! Run with `RUST_LOG=piece_table=trace` to see every range replace.

use piece_table::{PieceTableError, TextBuffer};

fn show(step: &str, buffer: &TextBuffer) {
    println!(
        "{step:<14} {:<16} pieces={} undo={} redo={}",
        format!("{:?}", buffer.to_text()),
        buffer.piece_count(),
        buffer.undo_depth(),
        buffer.redo_depth()
    );
}

fn main() -> Result<(), PieceTableError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let mut buffer = TextBuffer::from_text("Hello World");
    show("open", &buffer);

    buffer.delete_range_at(5, 1)?;
    show("delete 5..6", &buffer);

    buffer.insert_text(5, " ")?;
    show("insert ' '", &buffer);

    buffer.append_text("!")?;
    show("append '!'", &buffer);

    buffer.undo()?;
    show("undo", &buffer);

    buffer.undo()?;
    show("undo", &buffer);

    buffer.redo()?;
    show("redo", &buffer);

    buffer.clear()?;
    show("clear", &buffer);

    buffer.undo()?;
    show("undo", &buffer);

    if let Err(err) = buffer.redo().and_then(|()| buffer.redo()) {
        println!("{err}");
    }

    Ok(())
}
