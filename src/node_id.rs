//! Lightweight unique identifier for nodes within a [`Pipeline`](crate::pipeline::Pipeline).
//!
//! Each [`Node`](crate::node::Node) inserted into the arena is assigned a
//! sequential `NodeId`. Ids only ever grow, so a node's parents always carry a
//! smaller id than the node itself.

/// Unique numeric identifier for a node in a pipeline graph.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct NodeId(u64);

impl NodeId {
    /// Create a new `NodeId` (used internally by the pipeline).
    pub(crate) fn new(v: u64) -> Self {
        Self(v)
    }

    /// Return the underlying numeric value.
    ///
    /// Useful mainly for debugging and plan explanations.
    pub fn raw(&self) -> u64 {
        self.0
    }
}
