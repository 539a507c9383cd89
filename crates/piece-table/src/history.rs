//! Undo/redo controller.
//!
//! [`UndoRedoBuffer`] owns a [`PieceTable`] together with two stacks of undo
//! records. Every edit pushes its record on the undo stack and throws away
//! the redo stack, so history is linear. Undo pops a record, applies it, and
//! keeps the mirror record it gets back on the redo stack; redo is the same
//! walk in the other direction.
//!
//! Undo records never leave this type.

use tracing::debug;

use crate::buffer::{AppendBuffer, ReadBuffer};
use crate::config::HistoryConfig;
use crate::error::{HistoryDirection, PieceTableError, Result};
use crate::piece::Piece;
use crate::sequence::{LinkedPieces, PieceSequence, UndoPack};
use crate::table::PieceTable;

/// A piece table with linear undo/redo history.
///
/// # Example
///
/// ```rust
/// use piece_table::TextBuffer;
///
/// let mut buffer = TextBuffer::from_text("Hello World");
/// buffer.delete_range_at(5, 1).unwrap();
/// buffer.append_text("!").unwrap();
/// assert_eq!(buffer.to_text(), "HelloWorld!");
///
/// buffer.undo().unwrap();
/// buffer.undo().unwrap();
/// assert_eq!(buffer.to_text(), "Hello World");
///
/// buffer.redo().unwrap();
/// assert_eq!(buffer.to_text(), "HelloWorld");
/// ```
#[derive(Debug)]
pub struct UndoRedoBuffer<S = LinkedPieces, O = Box<[char]>, A = Vec<char>>
where
    S: PieceSequence,
{
    table: PieceTable<S, O, A>,
    undo_stack: Vec<UndoPack<S>>,
    redo_stack: Vec<UndoPack<S>>,
    config: HistoryConfig,
    /// Clean point tracking. Uses `undo_stack.len()` as the saved position in the linear history.
    /// When `redo_stack` is non-empty, `clean_index` may be greater than `undo_stack.len()`.
    clean_index: Option<usize>,
}

impl<S, O, A> UndoRedoBuffer<S, O, A>
where
    S: PieceSequence,
    O: ReadBuffer,
    A: AppendBuffer<Item = O::Item> + Default,
{
    /// Create a buffer over `original` with unbounded history.
    pub fn new(original: O) -> Self {
        Self::with_config(original, HistoryConfig::default())
    }

    /// Create a buffer over `original` with the given history limits.
    pub fn with_config(original: O, config: HistoryConfig) -> Self {
        Self {
            table: PieceTable::new(original),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            config,
            clean_index: Some(0),
        }
    }
}

impl<S, O, A> UndoRedoBuffer<S, O, A>
where
    S: PieceSequence,
    O: ReadBuffer,
    A: AppendBuffer<Item = O::Item>,
{
    /// Whether the document is empty.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Document length in elements.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Element at document index `idx`.
    pub fn get(&self, idx: usize) -> Option<&O::Item> {
        self.table.get(idx)
    }

    /// Materialize the document into one contiguous vector.
    pub fn to_vec(&self) -> Vec<O::Item> {
        self.table.to_vec()
    }

    /// Copy the whole document onto the end of `out`.
    pub fn copy_into(&self, out: &mut Vec<O::Item>) -> Result<()> {
        self.table.copy_into(out)
    }

    /// Number of pieces the document is currently made of.
    pub fn piece_count(&self) -> usize {
        self.table.piece_count()
    }

    /// Size of the append buffer. Grows with every insertion and never shrinks.
    pub fn append_buffer_len(&self) -> usize {
        self.table.append_buffer_len()
    }

    /// Pieces in document order.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.table.pieces()
    }

    /// History limits in effect.
    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    /// Verify the structural invariants of the underlying piece table.
    pub fn check_invariants(&self) -> Result<()> {
        Ok(self.table.check_invariants()?)
    }

    /// Remove the whole document. Undoable like any other edit.
    pub fn clear(&mut self) -> Result<()> {
        self.edit(|table| table.clear())
    }

    /// Insert one element at `idx`.
    pub fn insert_at(&mut self, idx: usize, element: O::Item) -> Result<()> {
        self.edit(|table| table.insert_at(idx, element))
    }

    /// Insert `items` at `idx`.
    pub fn insert_range_at(&mut self, idx: usize, items: &[O::Item]) -> Result<()> {
        self.edit(|table| table.insert_range_at(idx, items))
    }

    /// Append one element.
    pub fn append(&mut self, element: O::Item) -> Result<()> {
        self.edit(|table| table.append(element))
    }

    /// Append `items`.
    pub fn append_range(&mut self, items: &[O::Item]) -> Result<()> {
        self.edit(|table| table.append_range(items))
    }

    /// Delete the element at `idx`.
    pub fn delete_at(&mut self, idx: usize) -> Result<()> {
        self.edit(|table| table.delete_at(idx))
    }

    /// Delete `count` elements starting at `idx`.
    pub fn delete_range_at(&mut self, idx: usize, count: usize) -> Result<()> {
        self.edit(|table| table.delete_range_at(idx, count))
    }

    /// Revert the most recent edit.
    pub fn undo(&mut self) -> Result<()> {
        let pack = self
            .undo_stack
            .pop()
            .ok_or(PieceTableError::EmptyHistory(HistoryDirection::Undo))?;
        let redo = self.table.apply(pack)?;
        self.redo_stack.push(redo);

        debug!(
            undo_depth = self.undo_stack.len(),
            redo_depth = self.redo_stack.len(),
            "undo"
        );
        Ok(())
    }

    /// Reapply the most recently undone edit.
    pub fn redo(&mut self) -> Result<()> {
        let pack = self
            .redo_stack
            .pop()
            .ok_or(PieceTableError::EmptyHistory(HistoryDirection::Redo))?;
        let undo = self.table.apply(pack)?;
        self.undo_stack.push(undo);

        debug!(
            undo_depth = self.undo_stack.len(),
            redo_depth = self.redo_stack.len(),
            "redo"
        );
        Ok(())
    }

    /// Can undo
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Can redo
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of edits that can be undone.
    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of edits that can be redone.
    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    /// Whether the document is at the state last marked clean.
    pub fn is_clean(&self) -> bool {
        self.clean_index == Some(self.undo_stack.len())
    }

    /// Mark the current state as clean, e.g. after saving.
    pub fn mark_clean(&mut self) {
        self.clean_index = Some(self.undo_stack.len());
    }

    fn edit<F>(&mut self, op: F) -> Result<()>
    where
        F: FnOnce(&mut PieceTable<S, O, A>) -> Result<UndoPack<S>>,
    {
        let pack = op(&mut self.table)?;
        self.discard_redo();
        self.undo_stack.push(pack);
        self.trim_history();

        debug!(
            undo_depth = self.undo_stack.len(),
            len = self.table.len(),
            "edit recorded"
        );
        Ok(())
    }

    fn discard_redo(&mut self) {
        if self.redo_stack.is_empty() {
            return;
        }

        // If clean point is in redo area, it becomes unreachable after clearing redo.
        if let Some(clean_index) = self.clean_index
            && clean_index > self.undo_stack.len()
        {
            self.clean_index = None;
        }

        debug!(discarded = self.redo_stack.len(), "redo branch discarded");
        for pack in self.redo_stack.drain(..) {
            self.table.discard(pack);
        }
    }

    fn trim_history(&mut self) {
        while self.config.exceeded_by(self.undo_stack.len()) {
            let oldest = self.undo_stack.remove(0);
            self.table.discard(oldest);
            self.clean_index = match self.clean_index {
                Some(0) | None => None,
                Some(clean_index) => Some(clean_index - 1),
            };
            debug!(max_depth = ?self.config.max_depth, "oldest undo record dropped");
        }
    }
}

impl<S, O, A> UndoRedoBuffer<S, O, A>
where
    S: PieceSequence,
    O: ReadBuffer<Item = char> + FromIterator<char>,
    A: AppendBuffer<Item = char> + Default,
{
    /// Create a buffer over the characters of `text`.
    pub fn from_text(text: &str) -> Self {
        Self::new(text.chars().collect())
    }

    /// Create a buffer over the characters of `text` with the given history limits.
    pub fn from_text_with_config(text: &str, config: HistoryConfig) -> Self {
        Self::with_config(text.chars().collect(), config)
    }
}

impl<S, O, A> UndoRedoBuffer<S, O, A>
where
    S: PieceSequence,
    O: ReadBuffer<Item = char>,
    A: AppendBuffer<Item = char>,
{
    /// Get the entire document content
    pub fn to_text(&self) -> String {
        self.table.to_text()
    }

    /// Insert the characters of `text` at character index `idx`.
    pub fn insert_text(&mut self, idx: usize, text: &str) -> Result<()> {
        let chars: Vec<char> = text.chars().collect();
        self.insert_range_at(idx, &chars)
    }

    /// Append the characters of `text`.
    pub fn append_text(&mut self, text: &str) -> Result<()> {
        let chars: Vec<char> = text.chars().collect();
        self.append_range(&chars)
    }
}
