use super::Reducer;
use crate::row::{Numeric, Row, RowExt};
use crate::stream::{RowStream, rows_when_pulled};
use serde_json::Value;

/// Passes every row of every group through unchanged.
///
/// Useful where a reduce stage is needed only for its grouping boundary.
#[derive(Clone, Copy, Debug, Default)]
pub struct FirstReducer;

impl Reducer for FirstReducer {
    fn reduce(&self, _keys: &[String], rows: RowStream) -> RowStream {
        rows
    }
}

/// Counts the rows of each group.
///
/// Emits the group's key fields plus `column` holding the count:
/// `{a: 1, b: 5}, {a: 1, b: 6}` grouped by `a` gives `{a: 1, count: 2}`.
#[derive(Clone, Debug)]
pub struct Count {
    column: String,
}

impl Count {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }
}

impl Reducer for Count {
    fn reduce(&self, keys: &[String], rows: RowStream) -> RowStream {
        let (keys, column) = (keys.to_vec(), self.column.clone());
        rows_when_pulled(move || {
            let mut out: Option<Row> = None;
            let mut count: u64 = 0;
            for row in rows {
                let row = row?;
                count += 1;
                if out.is_none() {
                    out = Some(row.select(&keys)?);
                }
            }
            let mut out = out.unwrap_or_default();
            out.insert(column, Value::from(count));
            Ok(vec![out])
        })
    }

    fn name(&self) -> String {
        format!("Count(-> {})", self.column)
    }
}

/// Sums a numeric field per group.
///
/// Emits the group's key fields plus `column` holding the sum. The sum stays
/// an integer while every addend is one.
#[derive(Clone, Debug)]
pub struct Sum {
    column: String,
}

impl Sum {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }
}

impl Reducer for Sum {
    fn reduce(&self, keys: &[String], rows: RowStream) -> RowStream {
        let (keys, column) = (keys.to_vec(), self.column.clone());
        rows_when_pulled(move || {
            let mut out: Option<Row> = None;
            let mut total = Numeric::Int(0);
            for row in rows {
                let row = row?;
                total = total.add(Numeric::from_field(&row, &column)?);
                if out.is_none() {
                    out = Some(row.select(&keys)?);
                }
            }
            let mut out = out.unwrap_or_default();
            out.insert(column, total.into_value());
            Ok(vec![out])
        })
    }

    fn name(&self) -> String {
        format!("Sum({})", self.column)
    }
}
