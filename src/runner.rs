//! Execution engine: turns a graph's terminal node into one lazy stream.
//!
//! The runner snapshots the arena, then resolves the terminal recursively:
//! a source node becomes a deferred lookup into [`Sources`], any other node
//! first resolves its parents in declaration order and hands their streams to
//! its [`Operation`](crate::node::Operation). Resolution only wires iterators;
//! no row is read until the caller pulls from the returned stream.
//!
//! A node shared by several branches is resolved once per branch, so each
//! branch gets its own fresh stream from the underlying sources.

use crate::error::GraphError;
use crate::node::Node;
use crate::node_id::NodeId;
use crate::pipeline::Pipeline;
use crate::row::Row;
use crate::sources::Sources;
use crate::stream::{Deferred, RowStream};
use anyhow::{bail, Result};
use std::collections::HashMap;
use tracing::{debug, trace};

type Edges = [(NodeId, NodeId)];

/// Parents of `id` in the order they were connected.
pub(crate) fn parents_of(edges: &Edges, id: NodeId) -> Vec<NodeId> {
    edges
        .iter()
        .filter(|(_, to)| *to == id)
        .map(|(from, _)| *from)
        .collect()
}

/// Build the lazy output stream of `terminal`.
///
/// # Errors
/// Fails only on a malformed arena (missing node or wrong parent count).
/// Unknown source names surface later, on the first pull from that source.
pub fn run_stream(p: &Pipeline, terminal: NodeId, sources: &Sources) -> Result<RowStream> {
    let (nodes, edges) = p.snapshot();
    debug!(
        terminal = terminal.raw(),
        nodes = nodes.len(),
        sources = sources.names().count(),
        "running graph"
    );
    resolve(&nodes, &edges, terminal, sources)
}

/// Run `terminal` and materialize its output, stopping at the first error.
pub fn run_collect(p: &Pipeline, terminal: NodeId, sources: &Sources) -> Result<Vec<Row>> {
    run_stream(p, terminal, sources)?.collect()
}

fn resolve(
    nodes: &HashMap<NodeId, Node>,
    edges: &Edges,
    id: NodeId,
    sources: &Sources,
) -> Result<RowStream> {
    let node = nodes.get(&id).ok_or(GraphError::MissingNode(id))?;
    match node {
        Node::Source { name } => {
            let factory = sources.get(name);
            let name = name.clone();
            trace!(node = id.raw(), source = %name, "wiring source");
            Ok(Box::new(Deferred::new(move || match factory {
                Some(f) => f(),
                None => Err(GraphError::UnknownSource { name }.into()),
            })))
        }
        Node::Op(op) => {
            let parents = parents_of(edges, id);
            if parents.len() != op.arity() {
                bail!(
                    "node {id:?} ({}) has {} parents, expected {}",
                    op.kind(),
                    parents.len(),
                    op.arity()
                );
            }
            let inputs = parents
                .into_iter()
                .map(|pid| resolve(nodes, edges, pid, sources))
                .collect::<Result<Vec<_>>>()?;
            trace!(node = id.raw(), op = %op.describe(), "wiring operation");
            op.apply(inputs)
        }
    }
}
