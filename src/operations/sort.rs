use super::{describe_keys, single_input};
use crate::node::Operation;
use crate::row::{GroupKey, Row, RowExt};
use crate::stream::{stream_of, Deferred, RowStream};
use anyhow::Result;
use tracing::debug;

/// Buffers the whole input, then yields it stable-sorted by `keys`.
///
/// The only operation that holds its entire input in memory. Nothing is read
/// until the first row is pulled.
pub struct ExternalSort {
    keys: Vec<String>,
}

impl ExternalSort {
    pub fn new(keys: Vec<String>) -> Self {
        Self { keys }
    }
}

impl Operation for ExternalSort {
    fn apply(&self, inputs: Vec<RowStream>) -> Result<RowStream> {
        let input = single_input(inputs, "sort")?;
        let keys = self.keys.clone();
        Ok(Box::new(Deferred::new(move || {
            let mut keyed: Vec<(GroupKey, Row)> = input
                .map(|row| row.map(|r| (r.group_key(&keys), r)))
                .collect::<Result<_>>()?;
            keyed.sort_by(|a, b| a.0.cmp(&b.0));
            debug!(rows = keyed.len(), ?keys, "sort buffered its input");
            Ok(stream_of(keyed.into_iter().map(|(_, r)| r).collect()))
        })))
    }

    fn kind(&self) -> &'static str {
        "Sort"
    }

    fn describe(&self) -> String {
        format!("sort by {}", describe_keys(&self.keys))
    }

    fn is_barrier(&self) -> bool {
        true
    }
}
