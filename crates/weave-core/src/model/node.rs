//! Node identity shared by every graph the engine merges.
//!
//! A node is anything that can be placed in a fragment and ordered by the
//! linearizer: runtime actions and reversible sequence steps. Identity is a
//! process-unique `NodeId` allocated when the node is created; clones keep
//! it, so passing the same value to two fragments creates a join point.

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a graph node
///
/// Ids are never used for ordering, only for unifying nodes, so their values
/// may differ between two otherwise identical assemblies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    /// Allocate a fresh id
    pub fn fresh() -> Self {
        Self(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw value
    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A value that can be merged and linearized
pub trait Node: Clone {
    /// Identity used to unify the node across fragments
    fn node_id(&self) -> NodeId;

    /// Declared name, used for tie-breaking and diagnostics
    fn name(&self) -> &str;
}
