//! Piece sequences and the range-replace primitive.
//!
//! Every edit, undo and redo funnels through [`PieceSequence::replace`]. It
//! swaps a contiguous run of pieces for another run and hands back an
//! [`UndoPack`] describing exactly what it removed and where the new pieces
//! now sit. Feeding that pack straight back into `replace` restores the
//! previous sequence and yields the mirror pack, which is how redo works.
//!
//! Two storage strategies implement the contract:
//!
//! - [`LinkedPieces`]: a doubly-linked list stored in a generational arena.
//!   Removed pieces are relocated out of the list by relinking, so their
//!   identity survives and [`NodeId`] markers stay valid however many
//!   unrelated edits happen elsewhere.
//! - [`PositionalPieces`]: a plain `Vec<Piece>`. Removed pieces are copied
//!   out and markers are indices stamped with the generation of the state
//!   they were minted in, so a marker used against any other state is
//!   rejected instead of corrupting the sequence.
//!
//! The strategy is picked by type when a [`PieceTable`](crate::PieceTable) is
//! instantiated.

use std::fmt::Debug;

use crate::error::InvariantViolation;
use crate::piece::Piece;

pub mod linked;
pub mod positional;

pub use linked::{LinkedPieces, LinkedRun, NodeId};
pub use positional::{PositionalPieces, PositionalRun, StampedIndex};

/// Ordered container of pieces supporting the range-replace primitive.
pub trait PieceSequence: Debug + Sized {
    /// Position in the sequence; also the marker type stored in an [`UndoPack`].
    type Cursor: Copy + Eq + Debug;

    /// A run of pieces that is not part of the live sequence.
    ///
    /// Used both for pieces about to be inserted and for pieces removed by
    /// a replace.
    type Run: Debug;

    /// Build a sequence holding `pieces` in order.
    fn from_pieces(pieces: Vec<Piece>) -> Self;

    /// Number of pieces in the live sequence.
    fn piece_count(&self) -> usize;

    /// Cursor at the first piece, or [`end`](Self::end) when empty.
    fn first(&self) -> Self::Cursor;

    /// End sentinel: the position one past the last piece.
    fn end(&self) -> Self::Cursor;

    /// Cursor following `cursor`. Advancing the end sentinel yields the end sentinel.
    fn next(&self, cursor: Self::Cursor) -> Self::Cursor;

    /// Piece at `cursor`, or `None` for the end sentinel and stale cursors.
    fn get(&self, cursor: Self::Cursor) -> Option<&Piece>;

    /// Live pieces in document order.
    fn iter(&self) -> impl Iterator<Item = &Piece> + '_;

    /// Wrap freshly created pieces in a detached run ready for insertion.
    fn make_run(&mut self, pieces: Vec<Piece>) -> Self::Run;

    /// Total element count covered by the pieces of `run`.
    fn run_span(&self, run: &Self::Run) -> usize;

    /// Pieces of `run` in order.
    fn run_pieces(&self, run: &Self::Run) -> Vec<Piece>;

    /// Replace the live pieces in `[begin, end)` with `elements`.
    ///
    /// The returned pack holds the removed pieces in `data` and bounds the
    /// inserted pieces with `begin` and `end`. When nothing is inserted,
    /// `begin == end` and both denote a valid insertion point in the live
    /// sequence. On error the sequence is unchanged and `elements` is released.
    fn replace(
        &mut self,
        begin: Self::Cursor,
        end: Self::Cursor,
        elements: Self::Run,
    ) -> Result<UndoPack<Self>, InvariantViolation>;

    /// Drop a detached run that will never be reinserted.
    fn release(&mut self, run: Self::Run);
}

/// Record sufficient to invert one call of the range-replace primitive.
///
/// `data` holds the pieces that occupied `[begin, end)` before the replace
/// that produced this pack. Passing the three fields back to
/// [`PieceSequence::replace`] restores that state.
#[derive(Debug)]
pub struct UndoPack<S: PieceSequence> {
    pub(crate) begin: S::Cursor,
    pub(crate) end: S::Cursor,
    pub(crate) data: S::Run,
}

impl<S: PieceSequence> UndoPack<S> {
    /// Start of the range the pack will replace.
    pub fn begin(&self) -> S::Cursor {
        self.begin
    }

    /// End of the range the pack will replace.
    pub fn end(&self) -> S::Cursor {
        self.end
    }

    /// Pieces the pack will put back.
    pub fn data(&self) -> &S::Run {
        &self.data
    }

    /// Whether applying the pack leaves the range unchanged because nothing
    /// was removed and nothing was inserted.
    pub fn is_noop(&self, sequence: &S) -> bool {
        self.begin == self.end && sequence.run_span(&self.data) == 0
    }
}

#[cfg(test)]
pub(crate) mod contract {
    //! Behaviour every strategy must share; instantiated per strategy.

    use super::*;
    use crate::piece::BufferType;

    pub(crate) fn pieces_of<S: PieceSequence>(sequence: &S) -> Vec<Piece> {
        sequence.iter().copied().collect()
    }

    pub(crate) fn sample() -> Vec<Piece> {
        vec![
            Piece::original(0..3),
            Piece::append(0..2),
            Piece::original(3..7),
        ]
    }

    fn nth<S: PieceSequence>(sequence: &S, n: usize) -> S::Cursor {
        let mut cursor = sequence.first();
        for _ in 0..n {
            cursor = sequence.next(cursor);
        }
        cursor
    }

    pub(crate) fn replace_round_trip<S: PieceSequence>() {
        let mut sequence = S::from_pieces(sample());
        let before = pieces_of(&sequence);

        let inserted = vec![Piece::append(2..5), Piece::append(5..6)];
        let run = sequence.make_run(inserted.clone());
        let begin = nth(&sequence, 1);
        let end = nth(&sequence, 2);
        let undo = sequence.replace(begin, end, run).unwrap();

        assert_eq!(
            pieces_of(&sequence),
            vec![sample()[0], inserted[0], inserted[1], sample()[2]]
        );
        assert_eq!(sequence.run_pieces(undo.data()), vec![sample()[1]]);
        assert_eq!(sequence.get(undo.begin()), Some(&inserted[0]));
        assert_eq!(sequence.get(undo.end()), Some(&sample()[2]));

        let redo = sequence.replace(undo.begin, undo.end, undo.data).unwrap();
        assert_eq!(pieces_of(&sequence), before);
        assert_eq!(sequence.run_pieces(redo.data()), inserted);

        let undo = sequence.replace(redo.begin, redo.end, redo.data).unwrap();
        assert_eq!(pieces_of(&sequence).len(), 4);
        sequence.replace(undo.begin, undo.end, undo.data).unwrap();
        assert_eq!(pieces_of(&sequence), before);
    }

    pub(crate) fn empty_removal_marks_insertion_point<S: PieceSequence>() {
        let mut sequence = S::from_pieces(sample());
        let at = nth(&sequence, 2);

        let run = sequence.make_run(Vec::new());
        let undo = sequence.replace(at, at, run).unwrap();
        assert_eq!(undo.begin(), undo.end());
        assert!(undo.is_noop(&sequence));
        assert_eq!(sequence.get(undo.begin()), Some(&sample()[2]));
        assert_eq!(pieces_of(&sequence), sample());
    }

    pub(crate) fn pure_insertion_at_end<S: PieceSequence>() {
        let mut sequence = S::from_pieces(sample());
        let end = sequence.end();

        let tail = Piece::new(BufferType::Append, 9, 1);
        let run = sequence.make_run(vec![tail]);
        let undo = sequence.replace(end, end, run).unwrap();

        assert_eq!(pieces_of(&sequence).last(), Some(&tail));
        assert_eq!(sequence.get(undo.end()), None);
        assert_eq!(sequence.run_span(undo.data()), 0);

        sequence.replace(undo.begin, undo.end, undo.data).unwrap();
        assert_eq!(pieces_of(&sequence), sample());
    }

    pub(crate) fn clear_everything<S: PieceSequence>() {
        let mut sequence = S::from_pieces(sample());
        let run = sequence.make_run(Vec::new());
        let (first, end) = (sequence.first(), sequence.end());
        let undo = sequence.replace(first, end, run).unwrap();

        assert_eq!(sequence.piece_count(), 0);
        assert_eq!(sequence.run_span(undo.data()), 9);
        assert_eq!(undo.begin(), sequence.end());

        sequence.replace(undo.begin, undo.end, undo.data).unwrap();
        assert_eq!(pieces_of(&sequence), sample());
    }

    pub(crate) fn backwards_range_is_rejected<S: PieceSequence>() {
        let mut sequence = S::from_pieces(sample());
        let begin = nth(&sequence, 2);
        let end = nth(&sequence, 1);

        let run = sequence.make_run(vec![Piece::append(0..1)]);
        let err = sequence.replace(begin, end, run).unwrap_err();
        assert!(matches!(
            err,
            InvariantViolation::InvalidRange | InvariantViolation::StaleMarker
        ));
        assert_eq!(pieces_of(&sequence), sample());
    }
}
