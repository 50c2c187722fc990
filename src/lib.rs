//! # compgraph
//!
//! A **lazy, single-process dataflow engine** over JSON-like rows. A
//! computation is described once as a graph of operations and executed any
//! number of times against named inputs.
//!
//! ## Key Features
//!
//! - **Declarative graph API** - chain `map`, `reduce`, `sort` and `join`
//! - **Lazy streaming** - rows flow one at a time; only sorting buffers
//! - **Pluggable strategies** - mappers, reducers and joiners are traits
//! - **Merge joins** - inner, left, right and outer over sorted inputs
//! - **Reusable graphs** - sources are bound per run, so a graph runs many times
//! - **Ready-made algorithms** - word count, inverted index, PMI, road speed
//! - **I/O** - JSON Lines (feature `io-jsonl`)
//!
//! ## Quick Start
//!
//! ```
//! use compgraph::*;
//! use serde_json::json;
//!
//! # fn main() -> anyhow::Result<()> {
//! let graph = Graph::from_source("docs")
//!     .map(FilterPunctuation::new("text"))
//!     .map(LowerCase::new("text"))
//!     .map(Split::new("text"))
//!     .sort(&["text"])
//!     .reduce(Count::new("count"), &["text"])
//!     .sort(&["count", "text"]);
//!
//! let sources = Sources::new().with_rows("docs", testing::rows(vec![json!({"text": "a b a"})]));
//! let out = graph.collect(&sources)?;
//! assert_eq!(out, testing::rows(vec![
//!     json!({"text": "b", "count": 1}),
//!     json!({"text": "a", "count": 2}),
//! ]));
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Concepts
//!
//! ### Rows
//!
//! A [`Row`] is an insertion-ordered `serde_json` object. [`RowExt`] adds
//! typed accessors that fail with [`GraphError`] instead of panicking.
//!
//! ### Graph
//!
//! A [`Graph`] is an immutable handle to one node of a [`Pipeline`] arena.
//! Builder methods return new handles, so one graph can feed several
//! branches. Joining graphs from different arenas copies the right-hand
//! side's nodes into the left arena.
//!
//! ### Sources
//!
//! [`Sources`] maps source names to factories that open a fresh row stream
//! per run. An unknown name is reported on the first pull, not at build time.
//!
//! ### Operations
//!
//! - **Map** - one row in, zero or more out ([`mappers`])
//! - **Reduce** - one call per contiguous key group ([`reducers`])
//! - **Sort** - stable ascending sort, the only buffering operation
//! - **Join** - merge join of two key-sorted inputs ([`joiners`])
//!
//! Reduce and Join expect their inputs grouped/sorted by the keys; they do
//! not sort for you.
//!
//! ## Errors
//!
//! Operations return `anyhow::Result`; field access failures carry a
//! [`GraphError`] as their root cause. Errors travel through streams as
//! `Err` items and stop the run at [`Graph::collect`].
//!
//! ## Feature Flags
//!
//! - `io-jsonl` (default) - JSON Lines readers and writers
//! - `cli` (default) - the `compgraph` binary

pub mod algorithms;
pub mod error;
pub mod explain;
pub mod graph;
pub mod io;
pub mod joiners;
pub mod mappers;
pub mod node;
pub mod node_id;
pub mod operations;
pub mod pipeline;
pub mod reducers;
pub mod row;
pub mod runner;
pub mod sources;
pub mod stream;
pub mod testing;

#[doc(hidden)]
pub use serde_json as __serde_json;

// General re-exports
pub use error::GraphError;
pub use explain::{ExplainStep, Explanation};
pub use graph::Graph;
pub use joiners::{InnerJoiner, Joiner, LeftJoiner, OuterJoiner, RightJoiner, Suffixes};
pub use mappers::{
    Apply, Filter, FilterPunctuation, Identity, LowerCase, Mapper, Product, Project, Split,
};
pub use node_id::NodeId;
pub use pipeline::Pipeline;
pub use reducers::{Count, FirstReducer, Reducer, Sum, TermFrequency, TopN};
pub use row::{GroupKey, Row, RowExt, compare_values};
pub use sources::Sources;
pub use stream::RowStream;

// Gated re-exports
#[cfg(feature = "io-jsonl")]
pub use io::jsonl::{read_jsonl_rows, write_jsonl_rows};
