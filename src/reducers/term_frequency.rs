use super::Reducer;
use crate::row::{GroupKey, Row, RowExt};
use crate::stream::{RowStream, rows_when_pulled};
use anyhow::Result;
use serde_json::Value;
use std::collections::BTreeMap;

/// Relative frequency of each distinct value of `words_column` in a group.
///
/// For every distinct value, in first-seen order, emits the group's key
/// fields, the value, and `count / group size` in `result_column`.
#[derive(Clone, Debug)]
pub struct TermFrequency {
    words_column: String,
    result_column: String,
}

impl TermFrequency {
    pub fn new(words_column: impl Into<String>) -> Self {
        Self {
            words_column: words_column.into(),
            result_column: "tf".to_string(),
        }
    }

    #[must_use]
    pub fn into_column(mut self, result_column: impl Into<String>) -> Self {
        self.result_column = result_column.into();
        self
    }
}

impl Reducer for TermFrequency {
    fn reduce(&self, keys: &[String], rows: RowStream) -> RowStream {
        let this = self.clone();
        let keys = keys.to_vec();
        rows_when_pulled(move || this.frequencies(&keys, rows))
    }

    fn name(&self) -> String {
        format!("TermFrequency({} -> {})", self.words_column, self.result_column)
    }
}

impl TermFrequency {
    fn frequencies(&self, keys: &[String], rows: RowStream) -> Result<Vec<Row>> {
        let mut total: u64 = 0;
        let mut seen: BTreeMap<GroupKey, usize> = BTreeMap::new();
        let mut entries: Vec<(Row, u64)> = Vec::new();

        for row in rows {
            let row = row?;
            total += 1;
            let word = row.field(&self.words_column)?;
            match seen.get(&GroupKey(vec![word.clone()])) {
                Some(&idx) => entries[idx].1 += 1,
                None => {
                    let mut out = row.select(keys)?;
                    out.insert(self.words_column.clone(), word.clone());
                    seen.insert(GroupKey(vec![word.clone()]), entries.len());
                    entries.push((out, 1));
                }
            }
        }

        Ok(entries
            .into_iter()
            .map(|(mut out, count)| {
                out.insert(
                    self.result_column.clone(),
                    Value::from(count as f64 / total as f64),
                );
                out
            })
            .collect())
    }
}
