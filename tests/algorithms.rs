#[macro_use]
mod macros;

use anyhow::Result;
use compgraph::algorithms::*;
use compgraph::testing::*;
use compgraph::*;
use serde_json::json;
use std::f64::consts::{LN_2, PI};

#[test]
fn word_count_orders_by_count_then_word() -> Result<()> {
    let g = word_count_graph("docs", "text", "count");
    let sources = Sources::new().with_rows("docs", rows(vec![json!({"text": "a b a"})]));
    assert_rows_equal(
        &g.collect(&sources)?,
        &rows(vec![json!({"text": "b", "count": 1}), json!({"text": "a", "count": 2})]),
    );
    Ok(())
}

#[test]
fn word_count_normalizes_case_and_punctuation() -> Result<()> {
    let g = word_count_graph("docs", "body", "n");
    let sources = Sources::new().with_rows(
        "docs",
        rows(vec![
            json!({"body": "Hello, hello world!"}),
            json!({"body": "WORLD? hello."}),
        ]),
    );
    assert_rows_equal(
        &g.collect(&sources)?,
        &rows(vec![json!({"body": "world", "n": 2}), json!({"body": "hello", "n": 3})]),
    );
    Ok(())
}

#[test]
fn inverted_index_scores_by_tf_idf() -> Result<()> {
    let g = inverted_index_graph("docs", &InvertedIndexParams::default());
    let sources = Sources::new().with_rows(
        "docs",
        rows(vec![
            json!({"doc_id": 1, "text": "Hello, world!"}),
            json!({"doc_id": 2, "text": "hello rust"}),
        ]),
    );
    let out = g.collect(&sources)?;

    let keys: Vec<_> = out
        .iter()
        .map(|r| (r["doc_id"].clone(), r["text"].clone()))
        .collect();
    assert_eq!(
        keys,
        vec![
            (json!(1), json!("hello")),
            (json!(1), json!("world")),
            (json!(2), json!("hello")),
            (json!(2), json!("rust")),
        ]
    );
    let scores: Vec<f64> = out.iter().map(|r| num!(r, "tf_idf")).collect();
    assert_approx_eq!(scores[0], 0.0);
    assert_approx_eq!(scores[1], 0.5 * LN_2);
    assert_approx_eq!(scores[2], 0.0);
    assert_approx_eq!(scores[3], 0.5 * LN_2);
    assert!(out.iter().all(|r| r.len() == 3));
    Ok(())
}

#[test]
fn inverted_index_keeps_top_documents_per_word() -> Result<()> {
    let params = InvertedIndexParams {
        n: 1,
        ..InvertedIndexParams::default()
    };
    let g = inverted_index_graph("docs", &params);
    let sources = Sources::new().with_rows(
        "docs",
        rows(vec![
            json!({"doc_id": "a", "text": "cat"}),
            json!({"doc_id": "b", "text": "cat dog dog"}),
            json!({"doc_id": "c", "text": "bird"}),
        ]),
    );
    let out = g.collect(&sources)?;
    let cats: Vec<_> = out.iter().filter(|r| r["text"] == "cat").collect();
    assert_eq!(cats.len(), 1);
    assert_eq!(cats[0]["doc_id"], "a");
    Ok(())
}

#[test]
fn pmi_ranks_words_within_each_document() -> Result<()> {
    let g = pmi_graph("docs", &PmiParams::default());
    let sources = Sources::new().with_rows(
        "docs",
        rows(vec![
            json!({"doc_id": 1, "text": "apple apple banana banana"}),
            json!({"doc_id": 2, "text": "Apple apple cherry tiny tiny"}),
        ]),
    );
    let out = g.collect(&sources)?;

    let keys: Vec<_> = out
        .iter()
        .map(|r| (r["doc_id"].clone(), r["text"].clone()))
        .collect();
    assert_eq!(
        keys,
        vec![
            (json!(1), json!("banana")),
            (json!(1), json!("apple")),
            (json!(2), json!("apple")),
        ]
    );
    assert_approx_eq!(num!(out[0], "pmi"), 1.5f64.ln());
    assert_approx_eq!(num!(out[1], "pmi"), 0.75f64.ln());
    assert_approx_eq!(num!(out[2], "pmi"), 1.5f64.ln());
    Ok(())
}

#[test]
fn haversine_of_one_degree_of_latitude() {
    let d = haversine_km((0.0, 0.0), (0.0, 1.0));
    assert_approx_eq!(d, 6373.0 * PI / 180.0, 1e-6);
    assert_approx_eq!(haversine_km((37.6, 55.7), (37.6, 55.7)), 0.0);
}

#[test]
fn road_speed_by_weekday_and_hour() -> Result<()> {
    let g = road_speed_graph("times", "lengths", &RoadSpeedParams::default());
    let sources = Sources::new()
        .with_rows(
            "times",
            rows(vec![
                // Friday 11:xx, 60 s and 120 s over the same edge.
                json!({"edge_id": 7, "enter_time": "20171020T112238.723000", "leave_time": "20171020T112338.723000"}),
                json!({"edge_id": 7, "enter_time": "20171020T115000", "leave_time": "20171020T115200"}),
                // Sunday 09:xx.
                json!({"edge_id": 7, "enter_time": "20171022T090000", "leave_time": "20171022T090100"}),
            ]),
        )
        .with_rows(
            "lengths",
            rows(vec![json!({"edge_id": 7, "start": [0.0, 0.0], "end": [0.0, 1.0]})]),
        );

    let out = g.collect(&sources)?;
    let length = 6373.0 * PI / 180.0;

    assert_eq!(out.len(), 2);
    assert_eq!(out[0]["weekday"], "Fri");
    assert_eq!(out[0]["hour"], 11);
    assert_approx_eq!(num!(out[0], "speed"), 2.0 * length / 180.0 * 3600.0, 1e-6);
    assert_eq!(out[1]["weekday"], "Sun");
    assert_eq!(out[1]["hour"], 9);
    assert_approx_eq!(num!(out[1], "speed"), length / 60.0 * 3600.0, 1e-6);
    Ok(())
}

#[test]
fn road_speed_rejects_malformed_timestamps() {
    let g = road_speed_graph("times", "lengths", &RoadSpeedParams::default());
    let sources = Sources::new()
        .with_rows(
            "times",
            rows(vec![json!({"edge_id": 1, "enter_time": "yesterday", "leave_time": "today"})]),
        )
        .with_rows(
            "lengths",
            rows(vec![json!({"edge_id": 1, "start": [0.0, 0.0], "end": [1.0, 1.0]})]),
        );
    let err = g.collect(&sources).expect_err("timestamps do not parse");
    assert!(format!("{err:#}").contains("parse timestamp"));
}

#[test]
fn algorithm_graphs_rerun_identically() -> Result<()> {
    let g = word_count_graph("docs", "text", "count");
    let sources = Sources::new().with_rows("docs", rows(vec![json!({"text": "x y z x"})]));
    assert_rows_equal(&g.collect(&sources)?, &g.collect(&sources)?);
    Ok(())
}
