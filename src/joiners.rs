//! Strategies combining one left key group with one right key group.
//!
//! The [`Join`](crate::operations::Join) operation calls a [`Joiner`] for
//! every key present on either side; the side without that key gets an empty
//! group. Groups arrive as lazy streams and the joiner returns a lazy stream,
//! which the operation drains before moving either cursor. Strategies differ
//! only in what they emit when one side is empty:
//!
//! | strategy        | left empty        | right empty      | both present |
//! |-----------------|-------------------|------------------|--------------|
//! | [`InnerJoiner`] | nothing           | nothing          | merged pairs |
//! | [`LeftJoiner`]  | nothing           | left rows as-is  | merged pairs |
//! | [`RightJoiner`] | right rows as-is  | nothing          | merged pairs |
//! | [`OuterJoiner`] | right rows as-is  | left rows as-is  | merged pairs |
//!
//! Every strategy merges pairs through [`InnerJoiner`]: a non-key field
//! present on both rows becomes `field + left suffix` for the value of the
//! row merged first and `field + right suffix` for the other. [`RightJoiner`]
//! (and so [`OuterJoiner`]) merges with the sides swapped, so there the right
//! row's fields come first and take the left suffix.

use crate::row::Row;
use crate::stream::{Deferred, RowStream};
use anyhow::Result;
use std::iter;
use std::rc::Rc;

pub trait Joiner: Send + Sync {
    fn join(&self, keys: &[String], left: RowStream, right: RowStream) -> RowStream;

    /// Name shown in plan explanations.
    fn name(&self) -> String {
        crate::node::short_type_name::<Self>().to_string()
    }
}

/// Suffixes appended to colliding non-key fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Suffixes {
    pub left: String,
    pub right: String,
}

impl Default for Suffixes {
    fn default() -> Self {
        Self {
            left: "_1".to_string(),
            right: "_2".to_string(),
        }
    }
}

/// Emits one merged row per (left, right) pair.
#[derive(Clone, Debug, Default)]
pub struct InnerJoiner {
    suffixes: Suffixes,
}

impl InnerJoiner {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_suffixes(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            suffixes: Suffixes {
                left: left.into(),
                right: right.into(),
            },
        }
    }

    pub fn suffixes(&self) -> &Suffixes {
        &self.suffixes
    }

    fn merge(&self, keys: &[String], a: &Row, b: &Row) -> Row {
        let is_key = |f: &str| keys.iter().any(|k| k == f);
        let mut out = Row::with_capacity(a.len() + b.len());
        for (field, v) in a {
            if !is_key(field) && b.contains_key(field) {
                out.insert(format!("{field}{}", self.suffixes.left), v.clone());
            } else {
                out.insert(field.clone(), v.clone());
            }
        }
        for (field, v) in b {
            if is_key(field) && a.contains_key(field) {
                continue;
            }
            if !is_key(field) && a.contains_key(field) {
                out.insert(format!("{field}{}", self.suffixes.right), v.clone());
            } else {
                out.insert(field.clone(), v.clone());
            }
        }
        out
    }

}

/// Buffered right group paired with each row of a streamed left group.
struct Cross {
    joiner: InnerJoiner,
    keys: Vec<String>,
    right: Vec<Row>,
}

impl Cross {
    fn pairs(self: &Rc<Self>, left: Result<Row>) -> RowStream {
        match left {
            Ok(a) => {
                let cross = Rc::clone(self);
                Box::new(
                    (0..self.right.len())
                        .map(move |i| -> Result<Row> {
                            Ok(cross.joiner.merge(&cross.keys, &a, &cross.right[i]))
                        }),
                )
            }
            Err(e) => Box::new(iter::once(Err(e))),
        }
    }
}

impl Joiner for InnerJoiner {
    fn join(&self, keys: &[String], left: RowStream, right: RowStream) -> RowStream {
        let (joiner, keys) = (self.clone(), keys.to_vec());
        Box::new(Deferred::new(move || -> Result<RowStream> {
            let right: Vec<Row> = right.collect::<Result<_>>()?;
            if right.is_empty() {
                return Ok(Box::new(iter::empty()));
            }
            let cross = Rc::new(Cross { joiner, keys, right });
            Ok(Box::new(left.flat_map(move |a| cross.pairs(a))))
        }))
    }
}

/// Inner join that keeps left rows without a match.
#[derive(Clone, Debug, Default)]
pub struct LeftJoiner {
    inner: InnerJoiner,
}

impl LeftJoiner {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_suffixes(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            inner: InnerJoiner::with_suffixes(left, right),
        }
    }
}

impl Joiner for LeftJoiner {
    fn join(&self, keys: &[String], left: RowStream, right: RowStream) -> RowStream {
        let (inner, keys) = (self.inner.clone(), keys.to_vec());
        Box::new(Deferred::new(move || -> Result<RowStream> {
            let mut right = right.peekable();
            if right.peek().is_none() {
                return Ok(left);
            }
            Ok(inner.join(&keys, left, Box::new(right)))
        }))
    }
}

/// Inner join that keeps right rows without a match.
///
/// Matched pairs are merged with the right row first.
#[derive(Clone, Debug, Default)]
pub struct RightJoiner {
    inner: InnerJoiner,
}

impl RightJoiner {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_suffixes(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            inner: InnerJoiner::with_suffixes(left, right),
        }
    }
}

impl Joiner for RightJoiner {
    fn join(&self, keys: &[String], left: RowStream, right: RowStream) -> RowStream {
        let (inner, keys) = (self.inner.clone(), keys.to_vec());
        Box::new(Deferred::new(move || -> Result<RowStream> {
            let mut left = left.peekable();
            if left.peek().is_none() {
                return Ok(right);
            }
            Ok(inner.join(&keys, right, Box::new(left)))
        }))
    }
}

/// Inner join that keeps unmatched rows from both sides.
#[derive(Clone, Debug, Default)]
pub struct OuterJoiner {
    right: RightJoiner,
}

impl OuterJoiner {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_suffixes(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            right: RightJoiner::with_suffixes(left, right),
        }
    }
}

impl Joiner for OuterJoiner {
    fn join(&self, keys: &[String], left: RowStream, right: RowStream) -> RowStream {
        let (joiner, keys) = (self.right.clone(), keys.to_vec());
        Box::new(Deferred::new(move || -> Result<RowStream> {
            let mut right = right.peekable();
            if right.peek().is_none() {
                return Ok(left);
            }
            Ok(joiner.join(&keys, left, Box::new(right)))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(v: serde_json::Value) -> Row {
        v.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn merge_suffixes_only_colliding_non_key_fields() {
        let j = InnerJoiner::new();
        let keys = vec!["id".to_string()];
        let merged = j.merge(
            &keys,
            &row(json!({"id": 1, "x": "L", "a": 1})),
            &row(json!({"id": 1, "x": "R", "b": 2})),
        );
        assert_eq!(
            merged,
            row(json!({"id": 1, "x_1": "L", "a": 1, "x_2": "R", "b": 2}))
        );
    }

    fn stream(rows: Vec<serde_json::Value>) -> RowStream {
        Box::new(rows.into_iter().map(|v| Ok::<_, anyhow::Error>(row(v))))
    }

    #[test]
    fn right_joiner_merges_right_row_first() -> Result<()> {
        let keys = vec!["id".to_string()];
        let out: Vec<Row> = RightJoiner::new()
            .join(
                &keys,
                stream(vec![json!({"id": 1, "x": "L"})]),
                stream(vec![json!({"id": 1, "x": "R"})]),
            )
            .collect::<Result<_>>()?;
        assert_eq!(out, vec![row(json!({"id": 1, "x_1": "R", "x_2": "L"}))]);
        Ok(())
    }

    #[test]
    fn left_joiner_passes_left_rows_through_lazily() -> Result<()> {
        let keys = vec!["id".to_string()];
        let left = (0..).map(|i| Ok::<_, anyhow::Error>(row(json!({"id": 1, "i": i}))));
        let mut out = LeftJoiner::new().join(&keys, Box::new(left), Box::new(iter::empty()));
        assert_eq!(out.next().transpose()?, Some(row(json!({"id": 1, "i": 0}))));
        assert_eq!(out.next().transpose()?, Some(row(json!({"id": 1, "i": 1}))));
        Ok(())
    }

    #[test]
    fn custom_suffixes() {
        let j = InnerJoiner::with_suffixes("_left", "_right");
        let merged = j.merge(&[], &row(json!({"v": 1})), &row(json!({"v": 2})));
        assert_eq!(merged, row(json!({"v_left": 1, "v_right": 2})));
    }
}
