//! Fluent, immutable graph builder.
//!
//! A [`Graph`] is a handle to one node of a [`Pipeline`] arena. Every builder
//! method appends a node and returns a new handle, leaving `self` untouched, so
//! one graph can feed several branches:
//!
//! ```
//! use compgraph::*;
//! use serde_json::json;
//!
//! let words = Graph::from_source("docs")
//!     .map(LowerCase::new("text"))
//!     .map(Split::new("text"))
//!     .sort(&["text"]);
//! let counts = words.reduce(Count::new("count"), &["text"]);
//! let distinct = words.reduce(FirstReducer, &["text"]);
//!
//! let sources = Sources::new()
//!     .with_rows("docs", testing::rows(vec![json!({"text": "B a b"})]));
//! assert_eq!(counts.collect(&sources)?.len(), 2);
//! assert_eq!(distinct.collect(&sources)?.len(), 3);
//! # anyhow::Result::<()>::Ok(())
//! ```
//!
//! Nothing executes until [`Graph::run`] (lazy stream) or
//! [`Graph::collect`] (materialized rows) is called, and both can be called
//! any number of times.

use crate::explain::{explain, Explanation};
use crate::joiners::Joiner;
use crate::mappers::Mapper;
use crate::node::{Node, Operation};
use crate::node_id::NodeId;
use crate::operations::{ExternalSort, Join, Map, Reduce};
use crate::pipeline::Pipeline;
use crate::reducers::Reducer;
use crate::row::Row;
use crate::runner::{run_collect, run_stream};
use crate::sources::Sources;
use crate::stream::RowStream;
use anyhow::Result;
use std::sync::Arc;

#[derive(Clone)]
pub struct Graph {
    pub(crate) pipeline: Pipeline,
    pub(crate) id: NodeId,
}

fn owned_keys(keys: &[&str]) -> Vec<String> {
    keys.iter().map(|k| (*k).to_string()).collect()
}

impl Graph {
    /// Start a graph in a fresh arena, reading from the source `name`.
    pub fn from_source(name: impl Into<String>) -> Self {
        Self::from_source_in(&Pipeline::default(), name)
    }

    /// Start a graph in an existing arena, reading from the source `name`.
    pub fn from_source_in(p: &Pipeline, name: impl Into<String>) -> Self {
        let id = p.insert_node(Node::Source { name: name.into() });
        Self {
            pipeline: p.clone(),
            id,
        }
    }

    fn then(&self, op: Arc<dyn Operation>) -> Self {
        let id = self.pipeline.insert_node(Node::Op(op));
        self.pipeline.connect(self.id, id);
        Self {
            pipeline: self.pipeline.clone(),
            id,
        }
    }

    /// Apply `mapper` to every row.
    #[must_use]
    pub fn map<M: Mapper + 'static>(&self, mapper: M) -> Self {
        self.then(Arc::new(Map::new(Arc::new(mapper))))
    }

    /// Reduce contiguous groups of rows sharing `keys`.
    ///
    /// The input must already be grouped by `keys`; insert a [`sort`](Self::sort)
    /// first unless upstream order guarantees it.
    #[must_use]
    pub fn reduce<R: Reducer + 'static>(&self, reducer: R, keys: &[&str]) -> Self {
        self.then(Arc::new(Reduce::new(Arc::new(reducer), owned_keys(keys))))
    }

    /// Stable-sort all rows ascending by `keys`.
    #[must_use]
    pub fn sort(&self, keys: &[&str]) -> Self {
        self.then(Arc::new(ExternalSort::new(owned_keys(keys))))
    }

    /// Merge-join with `other` on `keys`; `self` is the left side.
    ///
    /// Both sides must be sorted by `keys`. If `other` lives in a different
    /// arena its nodes are copied into this one.
    #[must_use]
    pub fn join<J: Joiner + 'static>(&self, joiner: J, other: &Graph, keys: &[&str]) -> Self {
        let right = self.pipeline.import(&other.pipeline, other.id);
        let op: Arc<dyn Operation> = Arc::new(Join::new(Arc::new(joiner), owned_keys(keys)));
        let id = self.pipeline.insert_node(Node::Op(op));
        self.pipeline.connect(self.id, id);
        self.pipeline.connect(right, id);
        Self {
            pipeline: self.pipeline.clone(),
            id,
        }
    }

    /// Build the lazy output stream. No row is read before the first pull.
    ///
    /// # Errors
    /// Fails only if the arena is malformed. A missing source surfaces as an
    /// error item on the first pull from that source.
    pub fn run(&self, sources: &Sources) -> Result<RowStream> {
        run_stream(&self.pipeline, self.id, sources)
    }

    /// Run and collect every output row, stopping at the first error.
    pub fn collect(&self, sources: &Sources) -> Result<Vec<Row>> {
        run_collect(&self.pipeline, self.id, sources)
    }

    /// Describe the nodes this graph executes.
    pub fn explain(&self) -> Result<Explanation> {
        explain(&self.pipeline, self.id)
    }

    pub fn node_id(&self) -> NodeId {
        self.id
    }

    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }
}
