//! Row builders from JSON literals.

use crate::row::Row;
use serde_json::Value;

/// Build a [`Row`](crate::Row) from a `json!`-style object literal.
///
/// ```
/// use compgraph::row;
///
/// let r = row!({"id": 1, "name": "a"});
/// assert_eq!(r["id"], 1);
/// ```
///
/// # Panics
/// Panics if the literal is not an object.
#[macro_export]
macro_rules! row {
    ($($json:tt)+) => {
        $crate::testing::into_row($crate::__serde_json::json!($($json)+))
    };
}

/// Unwrap a JSON object into a row.
///
/// # Panics
/// Panics if `value` is not an object.
pub fn into_row(value: Value) -> Row {
    match value {
        Value::Object(row) => row,
        other => panic!("expected a JSON object for a row, got: {other}"),
    }
}

/// Convert a list of JSON objects into rows.
///
/// # Panics
/// Panics if any value is not an object.
pub fn rows(values: Vec<Value>) -> Vec<Row> {
    values.into_iter().map(into_row).collect()
}
