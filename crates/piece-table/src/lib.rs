#![warn(missing_docs)]
//! Piece Table - reversible text storage for editors
//!
//! # Overview
//!
//! `piece-table` stores a mutable document as a sequence of pieces over two
//! backing buffers: the original content, which is never modified, and an
//! append buffer that every inserted element is written to. Edits only
//! rearrange pieces, so nothing is copied on insert or delete and every edit
//! can be reverted exactly.
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  UndoRedoBuffer (history stacks)            │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  PieceTable (insert / append / delete)      │  ← Edit operations
//! ├─────────────────────────────────────────────┤
//! │  Position lookup + piece splitter           │
//! ├─────────────────────────────────────────────┤
//! │  PieceSequence::replace → UndoPack          │  ← Range-replace primitive
//! ├─────────────────────────────────────────────┤
//! │  Original buffer │ Append buffer            │  ← Backing storage
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use piece_table::TextBuffer;
//!
//! let mut buffer = TextBuffer::from_text("Hello World");
//!
//! buffer.delete_range_at(5, 1).unwrap();
//! buffer.insert_text(5, " ").unwrap();
//! buffer.append_text("!").unwrap();
//! assert_eq!(buffer.to_text(), "Hello World!");
//!
//! buffer.undo().unwrap();
//! buffer.undo().unwrap();
//! assert_eq!(buffer.to_text(), "HelloWorld");
//!
//! buffer.redo().unwrap();
//! buffer.clear().unwrap();
//! assert_eq!(buffer.to_text(), "");
//!
//! buffer.undo().unwrap();
//! assert_eq!(buffer.to_text(), "Hello World");
//! ```
//!
//! # Piece sequence strategies
//!
//! - [`LinkedPieces`] relocates removed pieces by relinking arena nodes. Undo
//!   markers are stable handles and extraction does not copy pieces.
//! - [`PositionalPieces`] is a plain vector. Removed pieces are copied and
//!   markers are generation-stamped indices, valid only for the state they
//!   were taken from.
//!
//! Pick one with the first type parameter of [`PieceTable`] or
//! [`UndoRedoBuffer`]; [`TextBuffer`] and [`PositionalTextBuffer`] are the
//! `char` instantiations.
//!
//! # Module Description
//!
//! - [`buffer`] - Original and append buffer contracts
//! - [`piece`] - Pieces and the piece splitter
//! - [`lookup`] - Document index to piece position
//! - [`sequence`] - Piece sequences and the range-replace primitive
//! - [`table`] - Edit operations
//! - [`history`] - Undo/redo controller
//! - [`config`] - History limits
//! - [`error`] - Error types
//!
//! # Logging
//!
//! The crate emits [`tracing`] events (`trace` for range replaces, `debug` for
//! history transitions, `warn` for rejected replaces) and never installs a
//! subscriber.

pub mod buffer;
pub mod config;
pub mod error;
pub mod history;
pub mod lookup;
pub mod piece;
pub mod sequence;
pub mod table;

pub use buffer::{AppendBuffer, ReadBuffer};
pub use config::HistoryConfig;
pub use error::{HistoryDirection, InvariantViolation, PieceTableError, Result};
pub use history::UndoRedoBuffer;
pub use lookup::{Location, locate};
pub use piece::{BufferType, Piece};
pub use sequence::{
    LinkedPieces, LinkedRun, NodeId, PieceSequence, PositionalPieces, PositionalRun, StampedIndex,
    UndoPack,
};
pub use table::PieceTable;

/// Relocatable piece table over `char`s.
pub type TextTable = PieceTable<LinkedPieces, Box<[char]>, Vec<char>>;

/// Positional piece table over `char`s.
pub type PositionalTextTable = PieceTable<PositionalPieces, Box<[char]>, Vec<char>>;

/// Relocatable `char` document with undo/redo.
pub type TextBuffer = UndoRedoBuffer<LinkedPieces, Box<[char]>, Vec<char>>;

/// Positional `char` document with undo/redo.
pub type PositionalTextBuffer = UndoRedoBuffer<PositionalPieces, Box<[char]>, Vec<char>>;
