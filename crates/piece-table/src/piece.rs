//! Pieces and the piece splitter.

use std::ops::Range;

/// Buffer type identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BufferType {
    /// Read-only original buffer
    Original,
    /// Append-only add buffer
    Append,
}

/// Piece structure: references a contiguous span in one backing buffer.
///
/// Pieces are never modified once created. Edits replace them wholesale,
/// either by splitting or through the range-replace primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    /// Buffer the span lives in
    pub buffer_type: BufferType,
    /// Start position in the corresponding buffer
    pub start: usize,
    /// Number of elements in the span
    pub length: usize,
}

impl Piece {
    /// Create a new Piece
    pub const fn new(buffer_type: BufferType, start: usize, length: usize) -> Self {
        Self {
            buffer_type,
            start,
            length,
        }
    }

    /// Piece covering `range` of the original buffer.
    pub fn original(range: Range<usize>) -> Self {
        Self::new(BufferType::Original, range.start, range.end - range.start)
    }

    /// Piece covering `range` of the append buffer.
    pub fn append(range: Range<usize>) -> Self {
        Self::new(BufferType::Append, range.start, range.end - range.start)
    }

    /// Whether the piece covers no elements.
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// One past the last buffer position covered by the piece.
    pub const fn end(&self) -> usize {
        self.start + self.length
    }

    /// Buffer span covered by the piece.
    pub const fn span(&self) -> Range<usize> {
        self.start..self.end()
    }

    /// Cut the piece into two contiguous pieces of the same buffer.
    ///
    /// `offset` is relative to the start of the piece and must fall strictly
    /// inside it; `None` is returned otherwise. The piece sequence is not
    /// touched, the caller splices the halves in place of `self`.
    pub const fn split_at(self, offset: usize) -> Option<(Piece, Piece)> {
        if offset == 0 || offset >= self.length {
            return None;
        }

        let left = Piece::new(self.buffer_type, self.start, offset);
        let right = Piece::new(self.buffer_type, self.start + offset, self.length - offset);
        Some((left, right))
    }
}
