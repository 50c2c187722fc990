use anyhow::Result;
use compgraph::testing::*;
use compgraph::*;
use serde_json::{Value, json};

fn run_map<M: Mapper + 'static>(mapper: M, input: Vec<Value>) -> Result<Vec<Row>> {
    let sources = Sources::new().with_rows("in", rows(input));
    Graph::from_source("in").map(mapper).collect(&sources)
}

#[test]
fn filter_punctuation_strips_ascii_punctuation_only() -> Result<()> {
    let out = run_map(
        FilterPunctuation::new("text"),
        vec![json!({"text": "Hello, world! It's «fine»."})],
    )?;
    assert_rows_equal(&out, &[row!({"text": "Hello world Its «fine»"})]);
    Ok(())
}

#[test]
fn lower_case_keeps_other_fields() -> Result<()> {
    let out = run_map(LowerCase::new("text"), vec![json!({"id": 7, "text": "MiXeD"})])?;
    assert_rows_equal(&out, &[row!({"id": 7, "text": "mixed"})]);
    Ok(())
}

#[test]
fn split_fans_out_copies_in_order() -> Result<()> {
    let out = run_map(
        Split::new("text"),
        vec![json!({"id": 1, "text": "one two"}), json!({"id": 2, "text": "three"})],
    )?;
    assert_rows_equal(
        &out,
        &rows(vec![
            json!({"id": 1, "text": "one"}),
            json!({"id": 1, "text": "two"}),
            json!({"id": 2, "text": "three"}),
        ]),
    );
    Ok(())
}

#[test]
fn split_separates_on_single_characters() -> Result<()> {
    let out = run_map(Split::new("t").with_separator(';'), vec![json!({"t": "a;;b;"})])?;
    let pieces: Vec<_> = out.iter().map(|r| r["t"].clone()).collect();
    assert_eq!(pieces, vec![json!("a"), json!(""), json!("b")]);

    let empty = run_map(Split::new("t"), vec![json!({"t": ""})])?;
    assert!(empty.is_empty());
    Ok(())
}

#[test]
fn default_split_treats_control_separators_as_whitespace() -> Result<()> {
    let out = run_map(Split::new("t"), vec![json!({"t": "a\u{1c}b"})])?;
    assert_rows_equal(&out, &rows(vec![json!({"t": "a"}), json!({"t": "b"})]));
    Ok(())
}

#[test]
fn product_stays_integral_for_integer_factors() -> Result<()> {
    let out = run_map(
        Product::new(["a", "b"]),
        vec![json!({"a": 2, "b": 3}), json!({"a": 2, "b": 1.5})],
    )?;
    assert_eq!(out[0]["product"], json!(6));
    assert!(out[0]["product"].is_i64() || out[0]["product"].is_u64());
    assert_eq!(out[1]["product"].as_f64(), Some(3.0));
    Ok(())
}

#[test]
fn product_into_named_column() -> Result<()> {
    let out = run_map(
        Product::new(["speed", "time"]).into_column("distance"),
        vec![json!({"speed": 4, "time": 5})],
    )?;
    assert_rows_equal(&out, &[row!({"speed": 4, "time": 5, "distance": 20})]);
    Ok(())
}

#[test]
fn filter_keeps_matching_rows() -> Result<()> {
    let out = run_map(
        Filter::new(|r: &Row| Ok(r.i64_field("n")? % 2 == 0)),
        (0..6).map(|n| json!({ "n": n })).collect(),
    )?;
    let kept: Vec<_> = out.iter().map(|r| r["n"].clone()).collect();
    assert_eq!(kept, vec![json!(0), json!(2), json!(4)]);
    Ok(())
}

#[test]
fn filter_predicate_errors_reach_collect() {
    let err = run_map(
        Filter::new(|r: &Row| Ok(r.i64_field("n")? > 0)),
        vec![json!({"n": 1}), json!({"m": 2})],
    )
    .expect_err("row without `n` must fail the filter");
    assert_eq!(
        err.downcast_ref::<GraphError>(),
        Some(&GraphError::MissingField { field: "n".into() })
    );
}

#[test]
fn project_keeps_listed_fields_in_order() -> Result<()> {
    let out = run_map(
        Project::new(["b", "a"]),
        vec![json!({"a": 1, "b": 2, "c": 3})],
    )?;
    let fields: Vec<_> = out[0].keys().cloned().collect();
    assert_eq!(fields, vec!["b".to_string(), "a".to_string()]);
    Ok(())
}

#[test]
fn project_fails_on_missing_field() {
    let err = run_map(Project::new(["a", "z"]), vec![json!({"a": 1})])
        .expect_err("missing field must fail");
    assert!(matches!(
        err.downcast_ref::<GraphError>(),
        Some(GraphError::MissingField { field }) if field == "z"
    ));
}

#[test]
fn apply_stores_result_or_edits_in_place() -> Result<()> {
    let stored = run_map(
        Apply::new("len", |r: &Row| Ok(json!(r.str_field("s")?.len()))),
        vec![json!({"s": "abcd"})],
    )?;
    assert_rows_equal(&stored, &[row!({"s": "abcd", "len": 4})]);

    let edited = run_map(
        Apply::in_place(|r: &mut Row| {
            r.remove("secret");
            Ok(())
        }),
        vec![json!({"id": 1, "secret": "x"})],
    )?;
    assert_rows_equal(&edited, &[row!({"id": 1})]);
    Ok(())
}

#[test]
fn text_mappers_reject_non_string_fields() {
    let err = run_map(LowerCase::new("text"), vec![json!({"text": 5})])
        .expect_err("number is not text");
    assert!(matches!(
        err.downcast_ref::<GraphError>(),
        Some(GraphError::TypeMismatch { field, .. }) if field == "text"
    ));
}

#[test]
fn identity_passes_rows_through() -> Result<()> {
    let input = vec![json!({"a": [1, 2]}), json!({"b": {"c": null}})];
    assert_rows_equal(&run_map(Identity, input.clone())?, &rows(input));
    Ok(())
}
