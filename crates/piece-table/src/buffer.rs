//! Backing buffer contracts.
//!
//! A piece table reads from two buffers: the original buffer, fixed at
//! construction, and the append buffer, which only ever grows at its tail.
//! Neither buffer is rewritten in place, so a piece that references a span
//! stays valid for the lifetime of the table even after it is deleted from
//! the document.

use std::ops::Range;
use std::sync::Arc;

/// Read access shared by both backing buffers.
pub trait ReadBuffer {
    /// Element type stored in the buffer.
    type Item: Clone;

    /// Number of elements in the buffer.
    fn len(&self) -> usize;

    /// Whether the buffer holds no elements.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Element at `idx`, if any.
    fn get(&self, idx: usize) -> Option<&Self::Item>;

    /// Contiguous elements in `range`, if the range is in bounds.
    fn slice(&self, range: Range<usize>) -> Option<&[Self::Item]>;

    /// Copy `range` onto the end of `out`.
    ///
    /// Returns `false` and leaves `out` untouched when the range is out of bounds.
    fn copy_range_into(&self, range: Range<usize>, out: &mut Vec<Self::Item>) -> bool {
        match self.slice(range) {
            Some(items) => {
                out.extend_from_slice(items);
                true
            }
            None => false,
        }
    }
}

/// Tail-append capability of the append buffer.
///
/// Implementations must never shrink or rewrite existing elements.
pub trait AppendBuffer: ReadBuffer {
    /// Append `items` at the tail and return the span they now occupy.
    fn append_range(&mut self, items: &[Self::Item]) -> Range<usize>;
}

impl<T: Clone> ReadBuffer for Vec<T> {
    type Item = T;

    fn len(&self) -> usize {
        Vec::len(self)
    }

    fn get(&self, idx: usize) -> Option<&T> {
        self.as_slice().get(idx)
    }

    fn slice(&self, range: Range<usize>) -> Option<&[T]> {
        self.as_slice().get(range)
    }
}

impl<T: Clone> AppendBuffer for Vec<T> {
    fn append_range(&mut self, items: &[T]) -> Range<usize> {
        let start = self.len();
        self.extend_from_slice(items);
        start..self.len()
    }
}

impl<T: Clone> ReadBuffer for Box<[T]> {
    type Item = T;

    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    fn get(&self, idx: usize) -> Option<&T> {
        <[T]>::get(self, idx)
    }

    fn slice(&self, range: Range<usize>) -> Option<&[T]> {
        <[T]>::get(self, range)
    }
}

impl<T: Clone> ReadBuffer for Arc<[T]> {
    type Item = T;

    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    fn get(&self, idx: usize) -> Option<&T> {
        <[T]>::get(self, idx)
    }

    fn slice(&self, range: Range<usize>) -> Option<&[T]> {
        <[T]>::get(self, range)
    }
}
