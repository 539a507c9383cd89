//! Error types for piece table edits and history navigation.

use std::fmt;

use thiserror::Error;

/// Which history stack an operation tried to pop from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryDirection {
    /// The undo stack.
    Undo,
    /// The redo stack.
    Redo,
}

impl fmt::Display for HistoryDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryDirection::Undo => write!(f, "undo"),
            HistoryDirection::Redo => write!(f, "redo"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Errors surfaced by [`PieceTable`](crate::PieceTable) and
/// [`UndoRedoBuffer`](crate::UndoRedoBuffer).
pub enum PieceTableError {
    #[error("range {start}..{end} is out of bounds for a document of length {len}")]
    /// An index, or index plus count, lies past the end of the document.
    OutOfRange {
        /// First element of the requested range.
        start: usize,
        /// One past the last element of the requested range.
        end: usize,
        /// Document length at the time of the call.
        len: usize,
    },

    #[error("nothing to {0}")]
    /// `undo()` or `redo()` was called with an empty stack.
    EmptyHistory(HistoryDirection),

    #[error("internal invariant violated: {0}")]
    /// The piece sequence or an undo record is malformed.
    ///
    /// Never expected in correct operation. The document is left untouched
    /// but the history entry that triggered it is not recoverable.
    Invariant(#[from] InvariantViolation),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
/// Internal consistency failures of the piece sequence.
pub enum InvariantViolation {
    #[error("sequence marker refers to a piece that is no longer in the sequence")]
    /// A cursor was minted for a different state of the sequence.
    StaleMarker,

    #[error("markers do not bound a contiguous range of the live sequence")]
    /// `begin` does not reach `end` when walking forward.
    InvalidRange,

    #[error("split offset {offset} is outside the interior of a piece of length {length}")]
    /// A split was requested at a piece boundary or past the piece end.
    SplitOutOfBounds {
        /// Requested in-piece offset.
        offset: usize,
        /// Length of the piece being split.
        length: usize,
    },

    #[error("piece lengths sum to {actual}, document length is {expected}")]
    /// Cached document length disagrees with the piece sequence.
    LengthMismatch {
        /// Cached document length.
        expected: usize,
        /// Sum of piece lengths.
        actual: usize,
    },

    #[error("zero-length piece in the sequence")]
    /// A piece with no content survived an edit.
    EmptyPiece,

    #[error("piece span {start}..{end} exceeds its buffer of length {buffer_len}")]
    /// A piece references elements its buffer does not hold.
    PieceOutOfBounds {
        /// Piece start in its buffer.
        start: usize,
        /// Piece end in its buffer.
        end: usize,
        /// Current buffer length.
        buffer_len: usize,
    },
}

/// Result alias used throughout the crate.
pub type Result<T, E = PieceTableError> = std::result::Result<T, E>;
