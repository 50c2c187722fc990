//! Domain errors raised while executing a graph.
//!
//! Everything in the crate returns [`anyhow::Result`]; the variants below are
//! the failures callers may want to tell apart, and can be recovered from an
//! [`anyhow::Error`] with `downcast_ref::<GraphError>()`.

use crate::node_id::NodeId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// A mapper, reducer or joiner addressed a field the row does not have.
    #[error("row has no field `{field}`")]
    MissingField { field: String },

    /// The field exists but holds a value of another type.
    #[error("field `{field}` is not {expected}: {found}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        found: String,
    },

    /// `run` was given no factory for a source the graph reads from.
    #[error("no source named `{name}` was provided")]
    UnknownSource { name: String },

    /// The arena does not contain a node the graph refers to.
    #[error("missing node {0:?}")]
    MissingNode(NodeId),
}

impl GraphError {
    pub(crate) fn missing_field(field: &str) -> Self {
        Self::MissingField {
            field: field.to_string(),
        }
    }
}
