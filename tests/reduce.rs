use anyhow::Result;
use compgraph::testing::*;
use compgraph::*;
use serde_json::{Value, json};

fn run_reduce<R: Reducer + 'static>(reducer: R, keys: &[&str], input: Vec<Value>) -> Result<Vec<Row>> {
    let sources = Sources::new().with_rows("in", rows(input));
    Graph::from_source("in").reduce(reducer, keys).collect(&sources)
}

/// Reads only the first row of each group.
struct Head;

impl Reducer for Head {
    fn reduce(&self, _keys: &[String], rows: RowStream) -> RowStream {
        Box::new(rows.take(1))
    }
}

#[test]
fn count_emits_keys_and_count() -> Result<()> {
    let out = run_reduce(
        Count::new("count"),
        &["a"],
        vec![json!({"a": 1, "b": 5}), json!({"a": 1, "b": 6}), json!({"a": 2, "b": 7})],
    )?;
    assert_rows_equal(&out, &rows(vec![json!({"a": 1, "count": 2}), json!({"a": 2, "count": 1})]));
    Ok(())
}

#[test]
fn groups_are_contiguous_runs_not_global() -> Result<()> {
    let out = run_reduce(
        Count::new("n"),
        &["k"],
        vec![json!({"k": 1}), json!({"k": 1}), json!({"k": 2}), json!({"k": 1})],
    )?;
    let counts: Vec<_> = out.iter().map(|r| r["n"].clone()).collect();
    assert_eq!(counts, vec![json!(2), json!(1), json!(1)]);
    Ok(())
}

#[test]
fn empty_key_list_reduces_everything_at_once() -> Result<()> {
    let out = run_reduce(Sum::new("v"), &[], vec![json!({"v": 1}), json!({"v": 2}), json!({"v": 3})])?;
    assert_rows_equal(&out, &[row!({"v": 6})]);
    Ok(())
}

#[test]
fn empty_input_yields_no_groups() -> Result<()> {
    assert!(run_reduce(Count::new("n"), &["k"], vec![])?.is_empty());
    Ok(())
}

#[test]
fn missing_key_fields_group_together_as_null() -> Result<()> {
    let out = run_reduce(
        Head,
        &["k"],
        vec![json!({"x": 1}), json!({"k": null}), json!({"k": 1})],
    )?;
    assert_rows_equal(&out, &rows(vec![json!({"x": 1}), json!({"k": 1})]));
    Ok(())
}

#[test]
fn integer_and_float_keys_compare_equal() -> Result<()> {
    let out = run_reduce(Count::new("n"), &["k"], vec![json!({"k": 1}), json!({"k": 1.0})])?;
    assert_eq!(out.len(), 1);
    assert_eq!(out[0]["n"], json!(2));
    Ok(())
}

#[test]
fn sum_is_order_independent_and_typed() -> Result<()> {
    let forward = run_reduce(Sum::new("v"), &["k"], vec![json!({"k": "a", "v": 1}), json!({"k": "a", "v": 2.5})])?;
    let backward = run_reduce(Sum::new("v"), &["k"], vec![json!({"k": "a", "v": 2.5}), json!({"k": "a", "v": 1})])?;
    assert_eq!(forward[0]["v"].as_f64(), Some(3.5));
    assert_rows_equal(&forward, &backward);

    let ints = run_reduce(Sum::new("v"), &["k"], vec![json!({"k": "a", "v": 4}), json!({"k": "a", "v": 5})])?;
    assert_eq!(ints[0]["v"], json!(9));
    Ok(())
}

#[test]
fn sum_fails_on_non_numeric_field() {
    let err = run_reduce(Sum::new("v"), &[], vec![json!({"v": "x"})]).expect_err("not a number");
    assert!(err.downcast_ref::<GraphError>().is_some());
}

#[test]
fn top_n_keeps_highest_values() -> Result<()> {
    let out = run_reduce(
        TopN::new("score", 1),
        &["k"],
        vec![json!({"k": 1, "score": 5}), json!({"k": 1, "score": 9})],
    )?;
    assert_rows_equal(&out, &[row!({"k": 1, "score": 9})]);
    Ok(())
}

#[test]
fn top_n_orders_descending_and_prefers_earlier_ties() -> Result<()> {
    let out = run_reduce(
        TopN::new("s", 3),
        &["k"],
        vec![
            json!({"k": 1, "s": 2, "tag": "a"}),
            json!({"k": 1, "s": 7, "tag": "b"}),
            json!({"k": 1, "s": 2, "tag": "c"}),
            json!({"k": 1, "s": 2, "tag": "d"}),
            json!({"k": 1, "s": 4, "tag": "e"}),
            json!({"k": 2, "s": 1, "tag": "f"}),
        ],
    )?;
    let tags: Vec<_> = out.iter().map(|r| r["tag"].clone()).collect();
    assert_eq!(tags, vec![json!("b"), json!("e"), json!("a"), json!("f")]);
    Ok(())
}

#[test]
fn top_n_of_zero_emits_nothing() -> Result<()> {
    assert!(run_reduce(TopN::new("s", 0), &[], vec![json!({"s": 1})])?.is_empty());
    Ok(())
}

#[test]
fn term_frequency_in_first_seen_order() -> Result<()> {
    let out = run_reduce(
        TermFrequency::new("w"),
        &["doc"],
        vec![
            json!({"doc": 1, "w": "b"}),
            json!({"doc": 1, "w": "a"}),
            json!({"doc": 1, "w": "b"}),
            json!({"doc": 1, "w": "b"}),
            json!({"doc": 2, "w": "a"}),
        ],
    )?;
    assert_rows_equal(
        &out,
        &rows(vec![
            json!({"doc": 1, "w": "b", "tf": 0.75}),
            json!({"doc": 1, "w": "a", "tf": 0.25}),
            json!({"doc": 2, "w": "a", "tf": 1.0}),
        ]),
    );
    Ok(())
}

#[test]
fn first_reducer_passes_groups_through() -> Result<()> {
    let input = vec![json!({"k": 1, "v": "x"}), json!({"k": 1, "v": "y"}), json!({"k": 2, "v": "z"})];
    assert_rows_equal(&run_reduce(FirstReducer, &["k"], input.clone())?, &rows(input));
    Ok(())
}

#[test]
fn unread_group_rows_are_skipped() -> Result<()> {
    let out = run_reduce(
        Head,
        &["k"],
        vec![json!({"k": 1, "i": 0}), json!({"k": 1, "i": 1}), json!({"k": 2, "i": 2}), json!({"k": 2, "i": 3})],
    )?;
    assert_rows_equal(&out, &rows(vec![json!({"k": 1, "i": 0}), json!({"k": 2, "i": 2})]));
    Ok(())
}
