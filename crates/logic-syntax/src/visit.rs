//! Tree traversal engine.
//!
//! [`reduce`] folds an accumulator over every node reachable from a root.
//! The callback steers the walk through the [`TraversalConfig`] it receives:
//!
//! - `stop_traversal` aborts the walk and returns the current accumulator.
//! - `ignore_children` (pre-order) skips the node's subtree.
//! - `needs_revisit_after_traversing_children` (pre-order) calls the callback
//!   a second time on the same node once its children are done, with
//!   [`TraversalConfig::is_revisit`] set. Analyses push state on the first
//!   visit and pop it on the revisit.
//!
//! Post-order walks children first and never revisits.

use logic_common::NodeId;

use crate::ast::{NodeRef, Program};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraversalOrder {
    Pre,
    Post,
}

/// Per-walk control flags shared between the engine and the callback.
#[derive(Debug, Clone)]
pub struct TraversalConfig {
    pub order: TraversalOrder,
    pub stop_traversal: bool,
    pub ignore_children: bool,
    pub needs_revisit_after_traversing_children: bool,
    is_revisit: bool,
}

impl TraversalConfig {
    pub fn new(order: TraversalOrder) -> Self {
        Self {
            order,
            stop_traversal: false,
            ignore_children: false,
            needs_revisit_after_traversing_children: false,
            is_revisit: false,
        }
    }

    pub fn pre_order() -> Self {
        Self::new(TraversalOrder::Pre)
    }

    pub fn post_order() -> Self {
        Self::new(TraversalOrder::Post)
    }

    /// Whether the current callback is the second visit of a node.
    pub fn is_revisit(&self) -> bool {
        self.is_revisit
    }

    fn reset_node_flags(&mut self) {
        self.ignore_children = false;
        self.needs_revisit_after_traversing_children = false;
        self.is_revisit = false;
    }
}

/// Fold `f` over every node reachable from `root`.
pub fn reduce<'a, A, F>(
    root: NodeRef<'a>,
    config: &mut TraversalConfig,
    initial: A,
    f: &mut F,
) -> A
where
    F: FnMut(A, NodeRef<'a>, &mut TraversalConfig) -> A,
{
    match config.order {
        TraversalOrder::Pre => reduce_pre(root, config, initial, f),
        TraversalOrder::Post => reduce_post(root, config, initial, f),
    }
}

fn reduce_pre<'a, A, F>(node: NodeRef<'a>, config: &mut TraversalConfig, acc: A, f: &mut F) -> A
where
    F: FnMut(A, NodeRef<'a>, &mut TraversalConfig) -> A,
{
    config.reset_node_flags();
    let mut acc = f(acc, node, config);
    if config.stop_traversal {
        return acc;
    }

    // Children reset the flags, so capture this node's requests first.
    let revisit = config.needs_revisit_after_traversing_children;
    if !config.ignore_children {
        for child in node.children() {
            acc = reduce_pre(child, config, acc, f);
            if config.stop_traversal {
                return acc;
            }
        }
    }

    if revisit {
        config.reset_node_flags();
        config.is_revisit = true;
        acc = f(acc, node, config);
        config.is_revisit = false;
    }
    acc
}

fn reduce_post<'a, A, F>(node: NodeRef<'a>, config: &mut TraversalConfig, acc: A, f: &mut F) -> A
where
    F: FnMut(A, NodeRef<'a>, &mut TraversalConfig) -> A,
{
    let mut acc = acc;
    for child in node.children() {
        acc = reduce_post(child, config, acc, f);
        if config.stop_traversal {
            return acc;
        }
    }
    config.reset_node_flags();
    f(acc, node, config)
}

impl Program {
    /// Fold over the whole program in the given order.
    pub fn reduce<'a, A, F>(&'a self, order: TraversalOrder, initial: A, mut f: F) -> A
    where
        F: FnMut(A, NodeRef<'a>, &mut TraversalConfig) -> A,
    {
        let mut config = TraversalConfig::new(order);
        reduce(NodeRef::Program(self), &mut config, initial, &mut f)
    }

    /// Find the node with the given id.
    pub fn find(&self, target: NodeId) -> Option<NodeRef<'_>> {
        self.reduce(TraversalOrder::Pre, None, |found, node, config| {
            if node.id() == target {
                config.stop_traversal = true;
                return Some(node);
            }
            found
        })
    }

    /// The largest id used anywhere in the tree.
    pub fn max_id(&self) -> Option<NodeId> {
        self.reduce(TraversalOrder::Post, None, |max: Option<NodeId>, node, _| {
            Some(max.map_or(node.id(), |max| max.max(node.id())))
        })
    }

    /// Number of nodes in the tree.
    pub fn node_count(&self) -> usize {
        self.reduce(TraversalOrder::Pre, 0, |count, _, _| count + 1)
    }
}
