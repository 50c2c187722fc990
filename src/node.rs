use crate::stream::RowStream;
use anyhow::Result;
use std::sync::Arc;

/// An execution primitive: consumes its parents' streams, returns one stream.
///
/// `apply` only wires iterators together. No row may be pulled before the
/// returned stream is itself pulled.
pub trait Operation: Send + Sync {
    fn apply(&self, inputs: Vec<RowStream>) -> Result<RowStream>;

    /// Number of parent streams `apply` expects.
    fn arity(&self) -> usize {
        1
    }

    /// Short node kind, e.g. `Map` or `Join`.
    fn kind(&self) -> &'static str;

    /// Human-readable description used by explain and logging.
    fn describe(&self) -> String;

    /// Whether the operation buffers its whole input before yielding.
    fn is_barrier(&self) -> bool {
        false
    }
}

#[derive(Clone)]
pub enum Node {
    /// Leaf reading from the source registered under `name` at run time.
    Source { name: String },

    /// Any operation with one or more parents.
    Op(Arc<dyn Operation>),
}

impl Node {
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Source { .. } => "Source",
            Node::Op(op) => op.kind(),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Node::Source { name } => format!("read source `{name}`"),
            Node::Op(op) => op.describe(),
        }
    }

    pub fn is_barrier(&self) -> bool {
        match self {
            Node::Source { .. } => false,
            Node::Op(op) => op.is_barrier(),
        }
    }
}

/// Last path segment of a type name, for describing strategies.
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
