use super::{describe_keys, single_input};
use crate::node::Operation;
use crate::reducers::Reducer;
use crate::row::Row;
use crate::stream::{GroupCursor, RowStream};
use anyhow::Result;
use std::sync::Arc;
use tracing::trace;

/// Calls a [`Reducer`] once per contiguous key group.
///
/// The input must already be grouped by `keys`; a key that reappears after
/// another key starts a new group.
pub struct Reduce {
    reducer: Arc<dyn Reducer>,
    keys: Vec<String>,
}

impl Reduce {
    pub fn new(reducer: Arc<dyn Reducer>, keys: Vec<String>) -> Self {
        Self { reducer, keys }
    }
}

impl Operation for Reduce {
    fn apply(&self, inputs: Vec<RowStream>) -> Result<RowStream> {
        let input = single_input(inputs, "reduce")?;
        Ok(Box::new(ReduceStream {
            groups: GroupCursor::new(input, self.keys.clone()),
            reducer: Arc::clone(&self.reducer),
            keys: self.keys.clone(),
            current: None,
            done: false,
        }))
    }

    fn kind(&self) -> &'static str {
        "Reduce"
    }

    fn describe(&self) -> String {
        format!("reduce {} by {}", self.reducer.name(), describe_keys(&self.keys))
    }
}

struct ReduceStream {
    groups: GroupCursor,
    reducer: Arc<dyn Reducer>,
    keys: Vec<String>,
    /// Output of the reducer for the current group.
    current: Option<RowStream>,
    done: bool,
}

impl Iterator for ReduceStream {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.done {
                return None;
            }
            if let Some(out) = self.current.as_mut() {
                match out.next() {
                    Some(Ok(row)) => return Some(Ok(row)),
                    Some(Err(e)) => {
                        self.done = true;
                        return Some(Err(e));
                    }
                    None => self.current = None,
                }
            }
            match self.groups.advance() {
                Ok(Some(key)) => {
                    trace!(?key, "reducing group");
                    self.current = Some(self.reducer.reduce(&self.keys, self.groups.group()));
                }
                Ok(None) => self.done = true,
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
    }
}
