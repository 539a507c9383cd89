//! Relocatable piece sequence: a doubly-linked list in a generational arena.
//!
//! Nodes live in a slot vector and link to each other by slot index. Slot 0
//! is the sentinel that closes the circular live list and doubles as the end
//! position. Removing a range unlinks its nodes as one detached chain without
//! touching their contents, and reinserting that chain relinks the very same
//! slots, so every [`NodeId`] held elsewhere keeps pointing at the same piece.
//!
//! Released slots go on a free list and bump their generation, which turns any
//! handle still referring to them into a detectable stale marker.

use tracing::trace;

use super::{PieceSequence, UndoPack};
use crate::error::InvariantViolation;
use crate::piece::Piece;

const SENTINEL: usize = 0;
const NIL: usize = usize::MAX;

/// Stable handle to a node of a [`LinkedPieces`] sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

impl NodeId {
    const END: NodeId = NodeId {
        index: SENTINEL,
        generation: 0,
    };

    /// Whether this handle denotes the end sentinel.
    pub fn is_end(&self) -> bool {
        *self == Self::END
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NodeState {
    /// Part of the live list.
    Linked,
    /// Part of a detached run owned by an undo record or an edit in flight.
    Detached,
    /// On the free list.
    Free,
}

#[derive(Debug, Clone)]
struct Node {
    piece: Piece,
    prev: usize,
    next: usize,
    generation: u32,
    state: NodeState,
}

/// Chain of detached nodes, moved in and out of the live list as a unit.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct LinkedRun {
    head: Option<usize>,
    tail: usize,
    count: usize,
    span: usize,
}

impl LinkedRun {
    /// Number of pieces in the run.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Whether the run holds no pieces.
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }
}

/// Piece sequence with O(1) relocation of node ranges.
#[derive(Debug, Clone)]
pub struct LinkedPieces {
    nodes: Vec<Node>,
    free: Vec<usize>,
    count: usize,
}

impl LinkedPieces {
    /// Create an empty sequence.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                piece: Piece::append(0..0),
                prev: SENTINEL,
                next: SENTINEL,
                generation: 0,
                state: NodeState::Linked,
            }],
            free: Vec::new(),
            count: 0,
        }
    }

    /// Number of slots currently allocated, live or detached.
    pub fn allocated_nodes(&self) -> usize {
        self.nodes.len() - 1 - self.free.len()
    }

    fn id(&self, index: usize) -> NodeId {
        NodeId {
            index,
            generation: self.nodes[index].generation,
        }
    }

    fn is_linked(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.index)
            .is_some_and(|node| node.generation == id.generation && node.state == NodeState::Linked)
    }

    fn alloc(&mut self, piece: Piece) -> usize {
        let node = Node {
            piece,
            prev: NIL,
            next: NIL,
            generation: 0,
            state: NodeState::Detached,
        };

        match self.free.pop() {
            Some(index) => {
                let generation = self.nodes[index].generation;
                self.nodes[index] = Node { generation, ..node };
                index
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }

    /// Walk `[begin, end)` and return its piece count and span.
    fn measure(&self, begin: usize, end: usize) -> Result<(usize, usize), InvariantViolation> {
        let mut count = 0;
        let mut span = 0;
        let mut current = begin;

        while current != end {
            if current == SENTINEL {
                return Err(InvariantViolation::InvalidRange);
            }
            let node = &self.nodes[current];
            count += 1;
            span += node.piece.length;
            current = node.next;
        }

        Ok((count, span))
    }

    fn mark_chain(&mut self, head: usize, tail: usize, state: NodeState) {
        let mut current = head;
        loop {
            let node = &mut self.nodes[current];
            node.state = state;
            if current == tail {
                break;
            }
            current = node.next;
        }
    }

    /// Unlink `[begin, end)` from the live list as a detached chain.
    fn unlink(&mut self, begin: usize, end: usize, count: usize, span: usize) -> LinkedRun {
        if begin == end {
            return LinkedRun::default();
        }

        let before = self.nodes[begin].prev;
        let last = self.nodes[end].prev;

        self.nodes[before].next = end;
        self.nodes[end].prev = before;
        self.nodes[begin].prev = NIL;
        self.nodes[last].next = NIL;
        self.mark_chain(begin, last, NodeState::Detached);
        self.count -= count;

        LinkedRun {
            head: Some(begin),
            tail: last,
            count,
            span,
        }
    }

    /// Link a detached chain in front of `end`. Returns the first linked slot.
    fn link_before(&mut self, end: usize, run: LinkedRun) -> usize {
        let Some(head) = run.head else {
            return end;
        };

        let before = self.nodes[end].prev;
        self.nodes[before].next = head;
        self.nodes[head].prev = before;
        self.nodes[run.tail].next = end;
        self.nodes[end].prev = run.tail;
        self.mark_chain(head, run.tail, NodeState::Linked);
        self.count += run.count;

        head
    }
}

impl Default for LinkedPieces {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceSequence for LinkedPieces {
    type Cursor = NodeId;
    type Run = LinkedRun;

    fn from_pieces(pieces: Vec<Piece>) -> Self {
        let mut sequence = Self::new();
        let run = sequence.make_run(pieces);
        sequence.link_before(SENTINEL, run);
        sequence
    }

    fn piece_count(&self) -> usize {
        self.count
    }

    fn first(&self) -> NodeId {
        self.id(self.nodes[SENTINEL].next)
    }

    fn end(&self) -> NodeId {
        NodeId::END
    }

    fn next(&self, cursor: NodeId) -> NodeId {
        if cursor.is_end() || !self.is_linked(cursor) {
            return NodeId::END;
        }
        self.id(self.nodes[cursor.index].next)
    }

    fn get(&self, cursor: NodeId) -> Option<&Piece> {
        if cursor.is_end() || !self.is_linked(cursor) {
            return None;
        }
        Some(&self.nodes[cursor.index].piece)
    }

    fn iter(&self) -> impl Iterator<Item = &Piece> + '_ {
        let mut current = self.nodes[SENTINEL].next;
        std::iter::from_fn(move || {
            if current == SENTINEL {
                return None;
            }
            let node = &self.nodes[current];
            current = node.next;
            Some(&node.piece)
        })
    }

    fn make_run(&mut self, pieces: Vec<Piece>) -> LinkedRun {
        let mut run = LinkedRun::default();

        for piece in pieces {
            let index = self.alloc(piece);
            match run.head {
                None => run.head = Some(index),
                Some(_) => {
                    self.nodes[run.tail].next = index;
                    self.nodes[index].prev = run.tail;
                }
            }
            run.tail = index;
            run.count += 1;
            run.span += piece.length;
        }

        run
    }

    fn run_span(&self, run: &LinkedRun) -> usize {
        run.span
    }

    fn run_pieces(&self, run: &LinkedRun) -> Vec<Piece> {
        let mut pieces = Vec::with_capacity(run.count);
        let mut current = run.head.unwrap_or(NIL);
        while current != NIL {
            let node = &self.nodes[current];
            pieces.push(node.piece);
            current = node.next;
        }
        pieces
    }

    fn replace(
        &mut self,
        begin: NodeId,
        end: NodeId,
        elements: LinkedRun,
    ) -> Result<UndoPack<Self>, InvariantViolation> {
        if !self.is_linked(begin) || !self.is_linked(end) {
            self.release(elements);
            return Err(InvariantViolation::StaleMarker);
        }

        let (count, span) = match self.measure(begin.index, end.index) {
            Ok(measured) => measured,
            Err(err) => {
                self.release(elements);
                return Err(err);
            }
        };

        trace!(
            removed_pieces = count,
            removed_span = span,
            inserted_pieces = elements.count,
            inserted_span = elements.span,
            "relocating piece range"
        );

        let removed = self.unlink(begin.index, end.index, count, span);
        let first_inserted = self.link_before(end.index, elements);

        Ok(UndoPack {
            begin: self.id(first_inserted),
            end,
            data: removed,
        })
    }

    fn release(&mut self, run: LinkedRun) {
        let mut current = run.head.unwrap_or(NIL);
        while current != NIL {
            let node = &mut self.nodes[current];
            let next = node.next;
            node.state = NodeState::Free;
            node.generation = node.generation.wrapping_add(1);
            node.prev = NIL;
            node.next = NIL;
            self.free.push(current);
            current = next;
        }
    }
}
