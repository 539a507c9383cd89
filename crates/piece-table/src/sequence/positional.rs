//! Positional piece sequence backed by a `Vec<Piece>`.
//!
//! Removed pieces are copied out by value, so every replace costs time
//! proportional to the touched range plus the tail shift. Markers are plain
//! indices, which only make sense for the exact state they were taken from.
//! Each replace therefore moves the sequence to a fresh generation, and
//! applying an undo record moves it back to the generation its pieces were cut
//! from. A [`StampedIndex`] from any other generation is refused.

use tracing::trace;

use super::{PieceSequence, UndoPack};
use crate::error::InvariantViolation;
use crate::piece::Piece;

/// Index into a [`PositionalPieces`] sequence, valid for one generation only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StampedIndex {
    index: usize,
    generation: u64,
}

impl StampedIndex {
    /// Position of the piece in the sequence.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Generation of the sequence the index was taken from.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Pieces copied out of, or about to be copied into, a [`PositionalPieces`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PositionalRun {
    pieces: Vec<Piece>,
    /// Generation of the state these pieces were removed from; `None` for new pieces.
    generation: Option<u64>,
}

impl PositionalRun {
    /// Pieces in the run.
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }
}

/// Piece sequence that supports only random-access insert and erase.
#[derive(Debug, Clone, Default)]
pub struct PositionalPieces {
    pieces: Vec<Piece>,
    generation: u64,
    next_generation: u64,
}

impl PositionalPieces {
    /// Current generation of the sequence.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    fn stamp(&self, index: usize) -> StampedIndex {
        StampedIndex {
            index,
            generation: self.generation,
        }
    }

    fn mint_generation(&mut self) -> u64 {
        self.next_generation += 1;
        self.next_generation
    }
}

impl PieceSequence for PositionalPieces {
    type Cursor = StampedIndex;
    type Run = PositionalRun;

    fn from_pieces(pieces: Vec<Piece>) -> Self {
        Self {
            pieces,
            generation: 0,
            next_generation: 0,
        }
    }

    fn piece_count(&self) -> usize {
        self.pieces.len()
    }

    fn first(&self) -> StampedIndex {
        self.stamp(0)
    }

    fn end(&self) -> StampedIndex {
        self.stamp(self.pieces.len())
    }

    fn next(&self, cursor: StampedIndex) -> StampedIndex {
        if cursor.generation != self.generation {
            return self.end();
        }
        self.stamp((cursor.index + 1).min(self.pieces.len()))
    }

    fn get(&self, cursor: StampedIndex) -> Option<&Piece> {
        if cursor.generation != self.generation {
            return None;
        }
        self.pieces.get(cursor.index)
    }

    fn iter(&self) -> impl Iterator<Item = &Piece> + '_ {
        self.pieces.iter()
    }

    fn make_run(&mut self, pieces: Vec<Piece>) -> PositionalRun {
        PositionalRun {
            pieces,
            generation: None,
        }
    }

    fn run_span(&self, run: &PositionalRun) -> usize {
        run.pieces.iter().map(|p| p.length).sum()
    }

    fn run_pieces(&self, run: &PositionalRun) -> Vec<Piece> {
        run.pieces.clone()
    }

    fn replace(
        &mut self,
        begin: StampedIndex,
        end: StampedIndex,
        elements: PositionalRun,
    ) -> Result<UndoPack<Self>, InvariantViolation> {
        if begin.generation != self.generation || end.generation != self.generation {
            return Err(InvariantViolation::StaleMarker);
        }
        if begin.index > end.index || end.index > self.pieces.len() {
            return Err(InvariantViolation::InvalidRange);
        }

        let inserted = elements.pieces.len();
        trace!(
            removed_pieces = end.index - begin.index,
            inserted_pieces = inserted,
            generation = self.generation,
            "copying piece range"
        );

        let removed: Vec<Piece> = self
            .pieces
            .splice(begin.index..end.index, elements.pieces)
            .collect();

        let previous = self.generation;
        self.generation = match elements.generation {
            Some(generation) => generation,
            None => self.mint_generation(),
        };

        Ok(UndoPack {
            begin: self.stamp(begin.index),
            end: self.stamp(begin.index + inserted),
            data: PositionalRun {
                pieces: removed,
                generation: Some(previous),
            },
        })
    }

    fn release(&mut self, _run: PositionalRun) {}
}
