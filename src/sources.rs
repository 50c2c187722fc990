//! Named row sources resolved when a graph runs.
//!
//! A graph only records source *names*. [`Sources`] maps each name to a
//! zero-argument factory that builds a fresh [`RowStream`] every time it is
//! called, which is what lets one graph run many times, or against different
//! inputs, without being rebuilt.
//!
//! ```
//! use compgraph::*;
//! use serde_json::json;
//!
//! let rows = compgraph::testing::rows(vec![json!({"text": "hello"})]);
//! let sources = Sources::new().with_rows("input", rows);
//! let out = Graph::from_source("input").collect(&sources)?;
//! assert_eq!(out.len(), 1);
//! # anyhow::Result::<()>::Ok(())
//! ```

use crate::row::Row;
use crate::stream::{stream_of, RowStream};
use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;

/// Factory producing a fresh stream for one source.
pub type SourceFn = Arc<dyn Fn() -> Result<RowStream> + Send + Sync>;

#[derive(Clone, Default)]
pub struct Sources {
    factories: HashMap<String, SourceFn>,
}

impl Sources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `factory` under `name`, replacing any previous entry.
    pub fn insert<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Result<RowStream> + Send + Sync + 'static,
    {
        self.factories.insert(name.into(), Arc::new(factory));
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with<F>(mut self, name: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Result<RowStream> + Send + Sync + 'static,
    {
        self.insert(name, factory);
        self
    }

    /// Serve a fixed set of in-memory rows, cloned on every run.
    #[must_use]
    pub fn with_rows(self, name: impl Into<String>, rows: Vec<Row>) -> Self {
        let rows = Arc::new(rows);
        self.with(name, move || Ok(stream_of(rows.as_ref().clone())))
    }

    pub fn get(&self, name: &str) -> Option<SourceFn> {
        self.factories.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }
}
