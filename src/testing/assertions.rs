//! Assertions over collected rows.

use crate::row::Row;
use std::collections::BTreeMap;

fn render(rows: &[Row]) -> String {
    rows.iter()
        .map(|r| format!("  {}", serde_json::Value::Object(r.clone())))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Assert that two row lists are equal in order and content.
///
/// Field order inside a row is ignored; `1` and `1.0` are different values.
///
/// # Panics
///
/// Panics if the lists differ in length or in any row.
pub fn assert_rows_equal(actual: &[Row], expected: &[Row]) {
    assert_eq!(
        actual.len(),
        expected.len(),
        "Row count mismatch: expected {}, got {}\nExpected:\n{}\nActual:\n{}",
        expected.len(),
        actual.len(),
        render(expected),
        render(actual)
    );
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert_eq!(
            a,
            e,
            "Row mismatch at index {i}\nExpected:\n{}\nActual:\n{}",
            render(expected),
            render(actual)
        );
    }
}

/// Canonical text of a row: fields sorted by name.
fn canonical(row: &Row) -> String {
    let sorted: BTreeMap<&String, &serde_json::Value> = row.iter().collect();
    serde_json::to_string(&sorted).unwrap_or_default()
}

/// Assert that two row lists hold the same rows, ignoring order.
///
/// Duplicates count: `[a, a]` and `[a]` differ.
///
/// # Panics
///
/// Panics if the multisets of rows differ.
pub fn assert_rows_unordered_equal(actual: &[Row], expected: &[Row]) {
    let mut counts: BTreeMap<String, isize> = BTreeMap::new();
    for r in actual {
        *counts.entry(canonical(r)).or_default() += 1;
    }
    for r in expected {
        *counts.entry(canonical(r)).or_default() -= 1;
    }
    let extra: Vec<_> = counts.iter().filter(|(_, n)| **n > 0).map(|(k, _)| k).collect();
    let missing: Vec<_> = counts.iter().filter(|(_, n)| **n < 0).map(|(k, _)| k).collect();
    if !extra.is_empty() || !missing.is_empty() {
        panic!(
            "Row content mismatch:\n  Missing rows: {missing:?}\n  Extra rows: {extra:?}\nExpected:\n{}\nActual:\n{}",
            render(expected),
            render(actual)
        );
    }
}

/// Assert that every row satisfies `predicate`.
///
/// # Panics
///
/// Panics naming the first row that fails.
pub fn assert_all_rows(rows: &[Row], predicate: impl Fn(&Row) -> bool) {
    if let Some((i, r)) = rows.iter().enumerate().find(|(_, r)| !predicate(r)) {
        panic!(
            "Row at index {i} does not satisfy predicate: {}",
            serde_json::Value::Object(r.clone())
        );
    }
}
