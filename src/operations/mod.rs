//! The four generic operations a graph node can hold besides a source.
//!
//! Each one implements [`Operation`](crate::node::Operation) by wiring
//! iterators together; rows move only when the final stream is pulled.

mod join;
mod map;
mod reduce;
mod sort;

pub use join::Join;
pub use map::Map;
pub use reduce::Reduce;
pub use sort::ExternalSort;

use crate::stream::RowStream;
use anyhow::{bail, Result};

fn single_input(mut inputs: Vec<RowStream>, kind: &str) -> Result<RowStream> {
    if inputs.len() != 1 {
        bail!("{kind} expects exactly one input stream, got {}", inputs.len());
    }
    match inputs.pop() {
        Some(s) => Ok(s),
        None => bail!("{kind} received no input stream"),
    }
}

fn describe_keys(keys: &[String]) -> String {
    format!("[{}]", keys.join(", "))
}
