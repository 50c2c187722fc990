//! Bounded top-N selection per group.
//!
//! Keeps a min-heap of at most `n` rows keyed by the value of one field, so
//! memory per group is `O(n)` regardless of group size. Among equal values the
//! earlier row wins. Output is sorted descending by the field.

use super::Reducer;
use crate::row::{compare_values, Row, RowExt};
use crate::stream::{RowStream, rows_when_pulled};
use serde_json::Value;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;
use std::iter;

struct Ranked {
    value: Value,
    seq: usize,
    row: Row,
}

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ranked {}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_values(&self.value, &other.value).then_with(|| other.seq.cmp(&self.seq))
    }
}

#[derive(Clone, Debug)]
pub struct TopN {
    column: String,
    n: usize,
}

impl TopN {
    pub fn new(column: impl Into<String>, n: usize) -> Self {
        Self {
            column: column.into(),
            n,
        }
    }
}

impl Reducer for TopN {
    fn reduce(&self, _keys: &[String], rows: RowStream) -> RowStream {
        let (column, n) = (self.column.clone(), self.n);
        if n == 0 {
            return Box::new(iter::empty());
        }
        rows_when_pulled(move || {
            let mut heap: BinaryHeap<Reverse<Ranked>> = BinaryHeap::with_capacity(n + 1);
            for (seq, row) in rows.enumerate() {
                let row = row?;
                let value = row.field(&column)?.clone();
                let candidate = Ranked { value, seq, row };
                if heap.len() < n {
                    heap.push(Reverse(candidate));
                } else if heap.peek().is_some_and(|Reverse(min)| candidate > *min) {
                    heap.pop();
                    heap.push(Reverse(candidate));
                }
            }
            // Ascending order of `Reverse` is descending order of the ranked rows.
            Ok(heap
                .into_sorted_vec()
                .into_iter()
                .map(|Reverse(r)| r.row)
                .collect())
        })
    }

    fn name(&self) -> String {
        format!("TopN({}, {})", self.column, self.n)
    }
}
