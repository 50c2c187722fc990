//! Helpers for writing tests against graphs.
//!
//! - **Builders**: [`row!`](crate::row!), [`into_row`] and [`rows`] turn
//!   `serde_json::json!` literals into [`Row`](crate::Row)s
//! - **Assertions**: compare collected output with readable failure messages
//!
//! ```
//! use compgraph::*;
//! use compgraph::testing::*;
//! use serde_json::json;
//!
//! let g = Graph::from_source("in").map(LowerCase::new("text"));
//! let sources = Sources::new().with_rows("in", rows(vec![json!({"text": "Hi"})]));
//!
//! assert_rows_equal(&g.collect(&sources)?, &[row!({"text": "hi"})]);
//! # anyhow::Result::<()>::Ok(())
//! ```

mod assertions;
mod builders;

pub use assertions::*;
pub use builders::*;
