//! Human-readable description of the graph behind a terminal node.
//!
//! [`explain`] lists every node reachable from the terminal exactly once,
//! parents before children, with the node's description, its parent ids and
//! whether it buffers its whole input.

use crate::error::GraphError;
use crate::node::Node;
use crate::node_id::NodeId;
use crate::pipeline::Pipeline;
use crate::runner::parents_of;
use anyhow::Result;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt::{Display, Formatter, Result as FormatResult};

/// One node of an explained graph.
#[derive(Debug, Clone, Serialize)]
pub struct ExplainStep {
    /// Position in execution order, starting at 1.
    pub step: usize,
    /// Raw id of the node in its arena.
    pub node: u64,
    /// Node kind (`Source`, `Map`, `Reduce`, `Sort`, `Join`).
    pub kind: &'static str,
    pub description: String,
    /// Raw ids of the parent nodes, left side first.
    pub parents: Vec<u64>,
    /// Whether this node holds its whole input in memory.
    pub is_barrier: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Explanation {
    pub steps: Vec<ExplainStep>,
    /// Source names the graph reads from, in first-use order.
    pub sources: Vec<String>,
    pub barriers: usize,
}

impl Display for Explanation {
    fn fmt(&self, f: &mut Formatter<'_>) -> FormatResult {
        writeln!(f, "┌─ GRAPH ──────────────────────────────────────────────────────┐")?;
        writeln!(f, "│ Sources:   {}", self.sources.join(", "))?;
        writeln!(f, "│ Nodes:     {}", self.steps.len())?;
        writeln!(f, "│ Barriers:  {}", self.barriers)?;
        writeln!(f, "├─ STEPS ──────────────────────────────────────────────────────┤")?;
        for step in &self.steps {
            let barrier = if step.is_barrier { " [BARRIER]" } else { "" };
            let parents = step
                .parents
                .iter()
                .map(|p| format!("#{p}"))
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(f, "│ {:>3}. #{} {}{}", step.step, step.node, step.kind, barrier)?;
            writeln!(f, "│      {}", step.description)?;
            if !parents.is_empty() {
                writeln!(f, "│      inputs: {parents}")?;
            }
        }
        writeln!(f, "└──────────────────────────────────────────────────────────────┘")
    }
}

/// Explain the graph ending at `terminal`.
///
/// # Errors
/// Returns an error if the arena is missing a referenced node.
pub fn explain(p: &Pipeline, terminal: NodeId) -> Result<Explanation> {
    let (nodes, edges) = p.snapshot();
    let mut order = Vec::new();
    let mut seen = HashSet::new();
    visit(&nodes, &edges, terminal, &mut seen, &mut order)?;

    let mut sources = Vec::new();
    let mut steps = Vec::with_capacity(order.len());
    for (i, (id, node)) in order.into_iter().enumerate() {
        if let Node::Source { name } = node
            && !sources.contains(name)
        {
            sources.push(name.clone());
        }
        steps.push(ExplainStep {
            step: i + 1,
            node: id.raw(),
            kind: node.kind(),
            description: node.describe(),
            parents: parents_of(&edges, id).iter().map(NodeId::raw).collect(),
            is_barrier: node.is_barrier(),
        });
    }
    let barriers = steps.iter().filter(|s| s.is_barrier).count();
    Ok(Explanation {
        steps,
        sources,
        barriers,
    })
}

fn visit<'a>(
    nodes: &'a HashMap<NodeId, Node>,
    edges: &[(NodeId, NodeId)],
    id: NodeId,
    seen: &mut HashSet<NodeId>,
    order: &mut Vec<(NodeId, &'a Node)>,
) -> Result<()> {
    if !seen.insert(id) {
        return Ok(());
    }
    let node = nodes.get(&id).ok_or(GraphError::MissingNode(id))?;
    for parent in parents_of(edges, id) {
        visit(nodes, edges, parent, seen, order)?;
    }
    order.push((id, node));
    Ok(())
}
