//! Property-based tests for edits and their inverses.

use piece_table::{LinkedPieces, PieceSequence, PieceTable, PositionalPieces, UndoRedoBuffer};
use proptest::prelude::*;

// =============================================================================
// Test helpers
// =============================================================================

/// A random edit, with positions scaled to the document length when applied.
#[derive(Clone, Debug)]
enum EditOp {
    Insert { pos_pct: f64, content: String },
    Append { content: String },
    Delete { pos_pct: f64, len_pct: f64 },
    Clear,
}

fn arbitrary_edit_op() -> impl Strategy<Value = EditOp> {
    prop_oneof![
        4 => (0.0..=1.0f64, "[a-z你👋]{0,8}")
            .prop_map(|(pos_pct, content)| EditOp::Insert { pos_pct, content }),
        2 => "[a-z]{0,6}".prop_map(|content| EditOp::Append { content }),
        3 => (0.0..=1.0f64, 0.0..=0.5f64)
            .prop_map(|(pos_pct, len_pct)| EditOp::Delete { pos_pct, len_pct }),
        1 => Just(EditOp::Clear),
    ]
}

/// Resolve an op against a document of `len` elements into concrete indices.
fn resolve_delete(len: usize, pos_pct: f64, len_pct: f64) -> (usize, usize) {
    if len == 0 {
        return (0, 0);
    }
    let start = ((pos_pct * len as f64) as usize).min(len - 1);
    let max_len = len - start;
    let count = ((len_pct * max_len as f64) as usize).max(1).min(max_len);
    (start, count)
}

fn resolve_insert(len: usize, pos_pct: f64) -> usize {
    ((pos_pct * len as f64) as usize).min(len)
}

fn chars(text: &str) -> Vec<char> {
    text.chars().collect()
}

fn edit_table<S: PieceSequence>(
    table: &mut PieceTable<S>,
    op: &EditOp,
) -> piece_table::Result<piece_table::UndoPack<S>> {
    let len = table.len();
    match op {
        EditOp::Insert { pos_pct, content } => {
            table.insert_range_at(resolve_insert(len, *pos_pct), &chars(content))
        }
        EditOp::Append { content } => table.append_range(&chars(content)),
        EditOp::Delete { pos_pct, len_pct } => {
            let (start, count) = resolve_delete(len, *pos_pct, *len_pct);
            table.delete_range_at(start, count)
        }
        EditOp::Clear => table.clear(),
    }
}

fn edit_buffer<S: PieceSequence>(
    buffer: &mut UndoRedoBuffer<S>,
    op: &EditOp,
) -> piece_table::Result<()> {
    let len = buffer.len();
    match op {
        EditOp::Insert { pos_pct, content } => {
            buffer.insert_text(resolve_insert(len, *pos_pct), content)
        }
        EditOp::Append { content } => buffer.append_text(content),
        EditOp::Delete { pos_pct, len_pct } => {
            let (start, count) = resolve_delete(len, *pos_pct, *len_pct);
            buffer.delete_range_at(start, count)
        }
        EditOp::Clear => buffer.clear(),
    }
}

/// Mirror an op on a plain `Vec<char>` model.
fn edit_model(model: &mut Vec<char>, op: &EditOp) {
    let len = model.len();
    match op {
        EditOp::Insert { pos_pct, content } => {
            let at = resolve_insert(len, *pos_pct);
            model.splice(at..at, content.chars());
        }
        EditOp::Append { content } => model.extend(content.chars()),
        EditOp::Delete { pos_pct, len_pct } => {
            let (start, count) = resolve_delete(len, *pos_pct, *len_pct);
            model.drain(start..start + count);
        }
        EditOp::Clear => model.clear(),
    }
}

// =============================================================================
// Generic properties
// =============================================================================

fn check_matches_model<S: PieceSequence>(
    initial: &str,
    ops: &[EditOp],
) -> Result<(), TestCaseError> {
    let mut table: PieceTable<S> = PieceTable::from_text(initial);
    let mut model = chars(initial);

    for op in ops {
        edit_table(&mut table, op).map_err(|err| TestCaseError::fail(err.to_string()))?;
        edit_model(&mut model, op);

        prop_assert_eq!(table.len(), model.len());
        prop_assert_eq!(table.to_vec(), model.clone());
        prop_assert!(table.check_invariants().is_ok());
    }
    Ok(())
}

fn check_inverse_law<S: PieceSequence>(
    initial: &str,
    ops: &[EditOp],
) -> Result<(), TestCaseError> {
    let mut table: PieceTable<S> = PieceTable::from_text(initial);

    for op in ops {
        let before = table.to_vec();
        let pack =
            edit_table(&mut table, op).map_err(|err| TestCaseError::fail(err.to_string()))?;
        let after = table.to_vec();

        let redo = table
            .apply(pack)
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        prop_assert_eq!(table.to_vec(), before);
        prop_assert!(table.check_invariants().is_ok());

        let undo = table
            .apply(redo)
            .map_err(|err| TestCaseError::fail(err.to_string()))?;
        prop_assert_eq!(table.to_vec(), after);
        prop_assert!(table.check_invariants().is_ok());

        table.discard(undo);
    }
    Ok(())
}

fn check_undo_redo_round_trip<S: PieceSequence>(
    initial: &str,
    ops: &[EditOp],
) -> Result<(), TestCaseError> {
    let mut buffer: UndoRedoBuffer<S> = UndoRedoBuffer::from_text(initial);
    let mut states = vec![buffer.to_text()];

    for op in ops {
        edit_buffer(&mut buffer, op).map_err(|err| TestCaseError::fail(err.to_string()))?;
        states.push(buffer.to_text());
    }
    prop_assert_eq!(buffer.undo_depth(), ops.len());

    for expected in states.iter().rev().skip(1) {
        buffer.undo().map_err(|err| TestCaseError::fail(err.to_string()))?;
        prop_assert_eq!(&buffer.to_text(), expected);
    }
    prop_assert!(!buffer.can_undo());

    for expected in states.iter().skip(1) {
        buffer.redo().map_err(|err| TestCaseError::fail(err.to_string()))?;
        prop_assert_eq!(&buffer.to_text(), expected);
    }
    prop_assert!(!buffer.can_redo());
    prop_assert!(buffer.check_invariants().is_ok());
    Ok(())
}

// =============================================================================
// Edit properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Every edit leaves the same document as the vector model
    #[test]
    fn linked_edits_match_model(
        initial in "[a-z ]{0,40}",
        ops in prop::collection::vec(arbitrary_edit_op(), 1..40),
    ) {
        check_matches_model::<LinkedPieces>(&initial, &ops)?;
    }

    #[test]
    fn positional_edits_match_model(
        initial in "[a-z ]{0,40}",
        ops in prop::collection::vec(arbitrary_edit_op(), 1..40),
    ) {
        check_matches_model::<PositionalPieces>(&initial, &ops)?;
    }

    /// Inserting at the end is indistinguishable from appending
    #[test]
    fn insert_at_end_is_append(
        initial in "[a-z]{0,20}",
        content in "[a-z]{1,10}",
    ) {
        let mut inserted: PieceTable<LinkedPieces> = PieceTable::from_text(&initial);
        let mut appended: PieceTable<LinkedPieces> = PieceTable::from_text(&initial);

        let len = inserted.len();
        inserted.insert_range_at(len, &chars(&content)).unwrap();
        appended.append_range(&chars(&content)).unwrap();

        prop_assert_eq!(inserted.to_text(), appended.to_text());
        prop_assert_eq!(
            inserted.pieces().collect::<Vec<_>>(),
            appended.pieces().collect::<Vec<_>>()
        );
    }
}

// =============================================================================
// Inverse properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Applying a pack restores the previous state, and its mirror restores
    /// the edited one
    #[test]
    fn linked_pack_is_inverse(
        initial in "[a-z ]{0,40}",
        ops in prop::collection::vec(arbitrary_edit_op(), 1..30),
    ) {
        check_inverse_law::<LinkedPieces>(&initial, &ops)?;
    }

    #[test]
    fn positional_pack_is_inverse(
        initial in "[a-z ]{0,40}",
        ops in prop::collection::vec(arbitrary_edit_op(), 1..30),
    ) {
        check_inverse_law::<PositionalPieces>(&initial, &ops)?;
    }

    /// Undoing everything walks back through every state, redoing walks forward
    #[test]
    fn linked_undo_redo_round_trip(
        initial in "[a-z ]{0,40}",
        ops in prop::collection::vec(arbitrary_edit_op(), 0..30),
    ) {
        check_undo_redo_round_trip::<LinkedPieces>(&initial, &ops)?;
    }

    #[test]
    fn positional_undo_redo_round_trip(
        initial in "[a-z ]{0,40}",
        ops in prop::collection::vec(arbitrary_edit_op(), 0..30),
    ) {
        check_undo_redo_round_trip::<PositionalPieces>(&initial, &ops)?;
    }
}
