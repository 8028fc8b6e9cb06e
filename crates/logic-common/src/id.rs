//! Stable node identifiers.
//!
//! Every selectable node of a Logic tree carries a [`NodeId`]. Ids survive
//! structural edits of unrelated parts of the tree, so all analysis maps are
//! keyed by id rather than by position.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A unique identifier for a node within a program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Sequential allocator for [`NodeId`]s.
///
/// There is no process-wide counter: whoever builds or edits a tree owns a
/// generator and threads it through.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    next: u64,
}

impl IdGenerator {
    /// Create a generator whose first id is `#0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a generator that continues after `last`.
    ///
    /// `None` when `last` is already the largest id.
    pub fn starting_after(last: Option<NodeId>) -> Option<Self> {
        let next = match last {
            Some(id) => id.0.checked_add(1)?,
            None => 0,
        };
        Some(Self { next })
    }

    /// Allocate the next id. After `NodeId(u64::MAX)` the same id is
    /// returned again.
    pub fn fresh(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }

    /// How many ids [`fresh`](Self::fresh) hands out before it reaches
    /// `NodeId(u64::MAX)`.
    pub fn remaining(&self) -> u64 {
        u64::MAX - self.next
    }

    /// The id that the next call to [`fresh`](Self::fresh) will return.
    pub fn peek(&self) -> NodeId {
        NodeId(self.next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_sequential() {
        let mut ids = IdGenerator::new();
        assert_eq!(ids.fresh(), NodeId(0));
        assert_eq!(ids.fresh(), NodeId(1));
        assert_eq!(ids.peek(), NodeId(2));
    }

    #[test]
    fn starting_after_skips_existing_ids() {
        let mut ids = IdGenerator::starting_after(Some(NodeId(41))).unwrap();
        assert_eq!(ids.fresh(), NodeId(42));

        let mut empty = IdGenerator::starting_after(None).unwrap();
        assert_eq!(empty.fresh(), NodeId(0));
    }

    #[test]
    fn largest_id_has_no_successor() {
        assert!(IdGenerator::starting_after(Some(NodeId(u64::MAX))).is_none());

        let mut ids = IdGenerator::starting_after(Some(NodeId(u64::MAX - 2))).unwrap();
        assert_eq!(ids.remaining(), 1);
        assert_eq!(ids.fresh(), NodeId(u64::MAX - 1));
        assert_eq!(ids.remaining(), 0);
        assert_eq!(ids.fresh(), NodeId(u64::MAX));
        assert_eq!(ids.fresh(), NodeId(u64::MAX));
    }

    #[test]
    fn node_id_display() {
        assert_eq!(NodeId(7).to_string(), "#7");
    }
}
