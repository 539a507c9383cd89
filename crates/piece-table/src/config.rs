//! History configuration.

/// Limits applied by [`UndoRedoBuffer`](crate::UndoRedoBuffer) to its history.
///
/// ```rust
/// use piece_table::HistoryConfig;
///
/// assert_eq!(HistoryConfig::default().max_depth, None);
/// assert_eq!(HistoryConfig::with_max_depth(100).max_depth, Some(100));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Maximum number of undo records kept. `None` keeps every edit.
    ///
    /// When an edit pushes the undo stack past this depth, the oldest record
    /// is dropped and can no longer be undone.
    pub max_depth: Option<usize>,
}

impl HistoryConfig {
    /// Keep the whole history.
    pub const fn unbounded() -> Self {
        Self { max_depth: None }
    }

    /// Keep at most `max_depth` undo records.
    pub const fn with_max_depth(max_depth: usize) -> Self {
        Self {
            max_depth: Some(max_depth),
        }
    }

    /// Whether an undo stack of `depth` records exceeds the limit.
    pub fn exceeded_by(&self, depth: usize) -> bool {
        self.max_depth.is_some_and(|max| depth > max)
    }
}
