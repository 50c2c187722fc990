use crate::node::Node;
use crate::node_id::NodeId;
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Arena holding the nodes and edges of one or more graphs.
///
/// Nodes are only ever appended. A [`Graph`](crate::Graph) is a handle to one
/// node in this arena; building on a graph inserts a new node and an edge from
/// each parent, leaving existing nodes untouched.
pub struct Pipeline {
    pub(crate) inner: Arc<Mutex<PipelineInner>>,
}

pub struct PipelineInner {
    pub next_id: u64,
    pub nodes: HashMap<NodeId, Node>,
    /// `(parent, child)` pairs in insertion order. A join's left parent is
    /// connected before its right parent.
    pub edges: Vec<(NodeId, NodeId)>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(PipelineInner {
                next_id: 0,
                nodes: HashMap::new(),
                edges: Vec::new(),
            })),
        }
    }
}

/// Clones share the same arena.
impl Clone for Pipeline {
    fn clone(&self) -> Self {
        Pipeline {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Pipeline {
    fn lock(&self) -> MutexGuard<'_, PipelineInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn insert_node(&self, node: Node) -> NodeId {
        let mut g = self.lock();
        let id = NodeId::new(g.next_id);
        g.next_id += 1;
        g.nodes.insert(id, node);
        id
    }

    pub(crate) fn connect(&self, from: NodeId, to: NodeId) {
        self.lock().edges.push((from, to));
    }

    /// Copy of the current nodes and edges.
    pub fn snapshot(&self) -> (HashMap<NodeId, Node>, Vec<(NodeId, NodeId)>) {
        let g = self.lock();
        (g.nodes.clone(), g.edges.clone())
    }

    /// Number of nodes in the arena.
    pub fn node_count(&self) -> usize {
        self.lock().nodes.len()
    }

    /// Whether both handles point at the same arena.
    pub fn same_as(&self, other: &Pipeline) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Copy the subgraph ending at `terminal` from `other` into this arena.
    ///
    /// Returns the id of the copied terminal. Importing from the same arena is
    /// a no-op.
    pub(crate) fn import(&self, other: &Pipeline, terminal: NodeId) -> NodeId {
        if self.same_as(other) {
            return terminal;
        }
        let (nodes, edges) = other.snapshot();

        let mut reachable = BTreeSet::new();
        let mut stack = vec![terminal];
        while let Some(id) = stack.pop() {
            if reachable.insert(id) {
                stack.extend(edges.iter().filter(|(_, to)| *to == id).map(|(from, _)| *from));
            }
        }

        // Ids grow monotonically, so ascending order inserts parents first.
        let mut mapping = HashMap::with_capacity(reachable.len());
        for id in &reachable {
            if let Some(node) = nodes.get(id) {
                mapping.insert(*id, self.insert_node(node.clone()));
            }
        }
        for (from, to) in &edges {
            if let (Some(f), Some(t)) = (mapping.get(from), mapping.get(to)) {
                self.connect(*f, *t);
            }
        }
        mapping.get(&terminal).copied().unwrap_or(terminal)
    }
}
