//! Position lookup: document index to (piece, in-piece offset).

use crate::sequence::PieceSequence;

/// A document position resolved against the piece sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location<C> {
    /// Piece containing the position, or the end sentinel.
    pub cursor: C,
    /// Offset of the position inside that piece.
    pub offset: usize,
}

impl<C> Location<C> {
    /// Whether the position falls on the first element of its piece (or on the end sentinel).
    pub fn is_piece_boundary(&self) -> bool {
        self.offset == 0
    }
}

/// Find the piece containing document index `idx`.
///
/// Walks the sequence accumulating piece lengths, so the cost is linear in
/// the number of pieces. For `idx == len` the result is the end sentinel with
/// offset 0, the append point. Indices past the end also land on the sentinel,
/// with the overshoot as offset; callers bounds-check first.
pub fn locate<S: PieceSequence>(pieces: &S, idx: usize) -> Location<S::Cursor> {
    let mut remaining = idx;
    let mut cursor = pieces.first();

    while let Some(piece) = pieces.get(cursor) {
        if piece.length > remaining {
            break;
        }
        remaining -= piece.length;
        cursor = pieces.next(cursor);
    }

    Location {
        cursor,
        offset: remaining,
    }
}
