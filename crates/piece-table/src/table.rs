//! Piece table storage and its edit operations.
//!
//! Implements insertion, deletion and append over an immutable original
//! buffer and an append-only add buffer. Every edit is expressed as a single
//! call of the range-replace primitive and returns the [`UndoPack`] that
//! reverses it; [`PieceTable::apply`] feeds such a pack back in.

use tracing::{trace, warn};

use crate::buffer::{AppendBuffer, ReadBuffer};
use crate::error::{InvariantViolation, PieceTableError, Result};
use crate::lookup::locate;
use crate::piece::{BufferType, Piece};
use crate::sequence::{LinkedPieces, PieceSequence, UndoPack};

/// Piece Table - main storage structure
///
/// `S` picks the piece sequence strategy, `O` the original buffer and `A` the
/// append buffer. The defaults give a relocatable table over `char`s.
///
/// # Example
///
/// ```rust
/// use piece_table::TextTable;
///
/// let mut table = TextTable::from_text("Hello World");
/// let undo = table.delete_range_at(5, 1).unwrap();
/// assert_eq!(table.to_text(), "HelloWorld");
///
/// table.apply(undo).unwrap();
/// assert_eq!(table.to_text(), "Hello World");
/// ```
#[derive(Debug)]
pub struct PieceTable<S = LinkedPieces, O = Box<[char]>, A = Vec<char>> {
    /// Read-only original buffer
    original: O,
    /// Append-only add buffer
    additions: A,
    /// Pieces in document order
    pieces: S,
    /// Sum of piece lengths
    len: usize,
}

impl<S, O, A> PieceTable<S, O, A>
where
    S: PieceSequence,
    O: ReadBuffer,
    A: AppendBuffer<Item = O::Item> + Default,
{
    /// Create a new Piece Table whose document is the whole of `original`.
    pub fn new(original: O) -> Self {
        let len = original.len();
        let pieces = if len > 0 {
            vec![Piece::original(0..len)]
        } else {
            Vec::new()
        };

        Self {
            original,
            additions: A::default(),
            pieces: S::from_pieces(pieces),
            len,
        }
    }
}

impl<S, O, A> PieceTable<S, O, A>
where
    S: PieceSequence,
    O: ReadBuffer,
    A: AppendBuffer<Item = O::Item>,
{
    /// Whether the document is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Document length in elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Number of pieces the document is currently made of.
    pub fn piece_count(&self) -> usize {
        self.pieces.piece_count()
    }

    /// Size of the append buffer. It never shrinks, deleted text included.
    pub fn append_buffer_len(&self) -> usize {
        self.additions.len()
    }

    /// The original buffer.
    pub fn original(&self) -> &O {
        &self.original
    }

    /// The piece sequence.
    pub fn sequence(&self) -> &S {
        &self.pieces
    }

    /// Pieces in document order.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.pieces.iter()
    }

    /// Element at document index `idx`.
    pub fn get(&self, idx: usize) -> Option<&O::Item> {
        if idx >= self.len {
            return None;
        }

        let location = locate(&self.pieces, idx);
        let piece = self.pieces.get(location.cursor)?;
        let position = piece.start + location.offset;
        match piece.buffer_type {
            BufferType::Original => self.original.get(position),
            BufferType::Append => self.additions.get(position),
        }
    }

    fn slice_of(&self, piece: &Piece) -> Option<&[O::Item]> {
        match piece.buffer_type {
            BufferType::Original => self.original.slice(piece.span()),
            BufferType::Append => self.additions.slice(piece.span()),
        }
    }

    fn buffer_len(&self, buffer_type: BufferType) -> usize {
        match buffer_type {
            BufferType::Original => self.original.len(),
            BufferType::Append => self.additions.len(),
        }
    }

    /// Copy the whole document, in order, onto the end of `out`.
    pub fn copy_into(&self, out: &mut Vec<O::Item>) -> Result<()> {
        out.reserve(self.len);
        for piece in self.pieces.iter() {
            let items = self
                .slice_of(piece)
                .ok_or(InvariantViolation::PieceOutOfBounds {
                    start: piece.start,
                    end: piece.end(),
                    buffer_len: self.buffer_len(piece.buffer_type),
                })?;
            out.extend_from_slice(items);
        }
        Ok(())
    }

    /// Materialize the document into one contiguous vector.
    ///
    /// # Panics
    ///
    /// Panics if a piece references elements outside its buffer, which the
    /// edit operations never produce.
    pub fn to_vec(&self) -> Vec<O::Item> {
        let mut out = Vec::with_capacity(self.len);
        if let Err(err) = self.copy_into(&mut out) {
            panic!("piece table is corrupt: {err}");
        }
        out
    }

    /// Verify that pieces are non-empty, lie inside their buffers and sum up
    /// to the document length.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let mut total = 0;
        for piece in self.pieces.iter() {
            if piece.is_empty() {
                return Err(InvariantViolation::EmptyPiece);
            }
            let buffer_len = self.buffer_len(piece.buffer_type);
            if piece.end() > buffer_len {
                return Err(InvariantViolation::PieceOutOfBounds {
                    start: piece.start,
                    end: piece.end(),
                    buffer_len,
                });
            }
            total += piece.length;
        }

        if total != self.len {
            return Err(InvariantViolation::LengthMismatch {
                expected: self.len,
                actual: total,
            });
        }
        Ok(())
    }

    /// Remove every piece. The buffers keep their contents.
    pub fn clear(&mut self) -> Result<UndoPack<S>> {
        let run = self.pieces.make_run(Vec::new());
        let (first, end) = (self.pieces.first(), self.pieces.end());
        self.replace_range(first, end, run)
    }

    /// Insert one element at `idx`.
    pub fn insert_at(&mut self, idx: usize, element: O::Item) -> Result<UndoPack<S>> {
        self.insert_range_at(idx, std::slice::from_ref(&element))
    }

    /// Insert `items` so that the first of them ends up at `idx`.
    pub fn insert_range_at(&mut self, idx: usize, items: &[O::Item]) -> Result<UndoPack<S>> {
        self.check_range(idx, 0)?;
        if idx == self.len {
            return self.append_range(items);
        }

        let location = locate(&self.pieces, idx);
        if items.is_empty() {
            return self.replace_nothing_at(location.cursor);
        }

        if location.is_piece_boundary() {
            // Insertion between pieces, no split needed
            let new_piece = Piece::append(self.additions.append_range(items));
            let run = self.pieces.make_run(vec![new_piece]);
            return self.replace_range(location.cursor, location.cursor, run);
        }

        // Insert in the middle of the piece: replace it with left, new, right
        let target = *self
            .pieces
            .get(location.cursor)
            .ok_or(InvariantViolation::InvalidRange)?;
        let (left, right) = split(target, location.offset)?;
        let new_piece = Piece::append(self.additions.append_range(items));
        let run = self.pieces.make_run(vec![left, new_piece, right]);
        let next = self.pieces.next(location.cursor);
        self.replace_range(location.cursor, next, run)
    }

    /// Append one element at the end of the document.
    pub fn append(&mut self, element: O::Item) -> Result<UndoPack<S>> {
        self.append_range(std::slice::from_ref(&element))
    }

    /// Append `items` at the end of the document.
    pub fn append_range(&mut self, items: &[O::Item]) -> Result<UndoPack<S>> {
        let end = self.pieces.end();
        if items.is_empty() {
            return self.replace_nothing_at(end);
        }

        let new_piece = Piece::append(self.additions.append_range(items));
        let run = self.pieces.make_run(vec![new_piece]);
        self.replace_range(end, end, run)
    }

    /// Delete the element at `idx`.
    pub fn delete_at(&mut self, idx: usize) -> Result<UndoPack<S>> {
        self.delete_range_at(idx, 1)
    }

    /// Delete `count` elements starting at `idx`.
    ///
    /// Splits at most the first and the last touched piece and removes the
    /// whole span with one range replace, however many pieces it covers.
    pub fn delete_range_at(&mut self, idx: usize, count: usize) -> Result<UndoPack<S>> {
        self.check_range(idx, count)?;
        let location = locate(&self.pieces, idx);
        if count == 0 {
            return self.replace_nothing_at(location.cursor);
        }

        let begin = location.cursor;
        let mut cursor = begin;
        let mut remaining = count;
        let mut kept = Vec::with_capacity(2);

        // [ 0 ] - [ 1 ] - [ 2 ] - [ 3 ]
        //       [1a][1b]
        //        ^ kept outside the deleted run
        if !location.is_piece_boundary() {
            let piece = *self
                .pieces
                .get(cursor)
                .ok_or(InvariantViolation::InvalidRange)?;
            let (left, right) = split(piece, location.offset)?;
            kept.push(left);

            if remaining < right.length {
                // Delete in the middle of a single piece
                let (_, tail) = split(right, remaining)?;
                kept.push(tail);
                let next = self.pieces.next(cursor);
                let run = self.pieces.make_run(kept);
                return self.replace_range(begin, next, run);
            }

            remaining -= right.length;
            cursor = self.pieces.next(cursor);
        }

        // Skip the pieces that are deleted whole, cutting the last one if needed
        while remaining > 0 {
            let piece = *self
                .pieces
                .get(cursor)
                .ok_or(InvariantViolation::InvalidRange)?;

            if remaining < piece.length {
                let (_, tail) = split(piece, remaining)?;
                kept.push(tail);
                remaining = 0;
            } else {
                remaining -= piece.length;
            }
            cursor = self.pieces.next(cursor);
        }

        let run = self.pieces.make_run(kept);
        self.replace_range(begin, cursor, run)
    }

    /// Apply an undo record, restoring the pieces it holds.
    ///
    /// Returns the mirror record, which applied in turn redoes the edit.
    pub fn apply(&mut self, pack: UndoPack<S>) -> Result<UndoPack<S>> {
        let UndoPack { begin, end, data } = pack;
        self.replace_range(begin, end, data)
    }

    /// Drop an undo record that will never be applied.
    pub fn discard(&mut self, pack: UndoPack<S>) {
        self.pieces.release(pack.data);
    }

    fn check_range(&self, idx: usize, count: usize) -> Result<()> {
        match idx.checked_add(count) {
            Some(end) if end <= self.len => Ok(()),
            _ => Err(PieceTableError::OutOfRange {
                start: idx,
                end: idx.saturating_add(count),
                len: self.len,
            }),
        }
    }

    fn replace_nothing_at(&mut self, at: S::Cursor) -> Result<UndoPack<S>> {
        let run = self.pieces.make_run(Vec::new());
        self.replace_range(at, at, run)
    }

    fn replace_range(
        &mut self,
        begin: S::Cursor,
        end: S::Cursor,
        elements: S::Run,
    ) -> Result<UndoPack<S>> {
        let inserted = self.pieces.run_span(&elements);
        let pack = self
            .pieces
            .replace(begin, end, elements)
            .inspect_err(|err| warn!(%err, "range replace rejected"))?;
        let removed = self.pieces.run_span(&pack.data);

        self.len = self.len + inserted - removed;
        trace!(inserted, removed, len = self.len, "range replaced");
        Ok(pack)
    }
}

fn split(piece: Piece, offset: usize) -> Result<(Piece, Piece), InvariantViolation> {
    piece
        .split_at(offset)
        .ok_or(InvariantViolation::SplitOutOfBounds {
            offset,
            length: piece.length,
        })
}

impl<S, O, A> PieceTable<S, O, A>
where
    S: PieceSequence,
    O: ReadBuffer<Item = char> + FromIterator<char>,
    A: AppendBuffer<Item = char> + Default,
{
    /// Create a table over the characters of `text`.
    pub fn from_text(text: &str) -> Self {
        Self::new(text.chars().collect())
    }
}

impl<S, O, A> PieceTable<S, O, A>
where
    S: PieceSequence,
    O: ReadBuffer<Item = char>,
    A: AppendBuffer<Item = char>,
{
    /// Get the entire document content
    pub fn to_text(&self) -> String {
        self.to_vec().into_iter().collect()
    }
}
