use crate::graph::Graph;
use crate::joiners::InnerJoiner;
use crate::mappers::{Apply, Filter, FilterPunctuation, LowerCase, Product, Project, Split};
use crate::reducers::{Count, TermFrequency, TopN};
use crate::row::{Row, RowExt};
use anyhow::Result;
use serde_json::Value;

/// Normalized words: punctuation stripped, lowercased, one row per word.
fn tokenize(input: &str, text_column: &str) -> Graph {
    Graph::from_source(input)
        .map(FilterPunctuation::new(text_column))
        .map(LowerCase::new(text_column))
        .map(Split::new(text_column))
}

/// Count every word in `text_column` across all rows.
///
/// Output rows are `{text_column, count_column}`, sorted by count and then by
/// word.
pub fn word_count_graph(input: &str, text_column: &str, count_column: &str) -> Graph {
    tokenize(input, text_column)
        .sort(&[text_column])
        .reduce(Count::new(count_column), &[text_column])
        .sort(&[count_column, text_column])
}

#[derive(Clone, Debug)]
pub struct InvertedIndexParams {
    pub doc_column: String,
    pub text_column: String,
    pub result_column: String,
    /// Documents kept per word.
    pub n: usize,
}

impl Default for InvertedIndexParams {
    fn default() -> Self {
        Self {
            doc_column: "doc_id".to_string(),
            text_column: "text".to_string(),
            result_column: "tf_idf".to_string(),
            n: 3,
        }
    }
}

fn ln_ratio(row: &Row, num: &str, den: &str) -> Result<Value> {
    Ok(Value::from((row.f64_field(num)? / row.f64_field(den)?).ln()))
}

/// For every word, the `n` documents where its tf-idf is highest.
///
/// tf is the word's share of the document's words; idf is
/// `ln(total documents / documents containing the word)`. Output rows are
/// `{doc_column, text_column, result_column}` sorted by document, then word.
pub fn inverted_index_graph(input: &str, params: &InvertedIndexParams) -> Graph {
    let doc = params.doc_column.as_str();
    let text = params.text_column.as_str();
    let result = params.result_column.as_str();

    let words = tokenize(input, text).sort(&[doc, text]);

    let doc_count = words
        .reduce(Count::new("docs"), &[doc])
        .reduce(Count::new("docs"), &[]);

    let idf = words
        .reduce(Count::new("count"), &[doc, text])
        .sort(&[text])
        .reduce(Count::new("count_doc"), &[text])
        .join(InnerJoiner::new(), &doc_count, &[]);

    words
        .sort(&[doc])
        .reduce(TermFrequency::new(text), &[doc])
        .sort(&[text])
        .join(InnerJoiner::new(), &idf, &[text])
        .map(Apply::new(result, |row: &Row| ln_ratio(row, "docs", "count_doc")))
        .map(Product::new(["tf", result]).into_column(result))
        .reduce(TopN::new(result, params.n), &[text])
        .map(Project::new([doc, text, result]))
        .sort(&[doc, text])
}

#[derive(Clone, Debug)]
pub struct PmiParams {
    pub doc_column: String,
    pub text_column: String,
    pub result_column: String,
    /// Words kept per document.
    pub n: usize,
}

impl Default for PmiParams {
    fn default() -> Self {
        Self {
            doc_column: "doc_id".to_string(),
            text_column: "text".to_string(),
            result_column: "pmi".to_string(),
            n: 10,
        }
    }
}

/// For every document, the `n` words with the highest pointwise mutual
/// information `ln(tf in document / tf in corpus)`.
///
/// Only words longer than four characters that occur at least twice in a
/// document take part. Output rows are `{doc_column, text_column,
/// result_column}` grouped by document, highest score first.
pub fn pmi_graph(input: &str, params: &PmiParams) -> Graph {
    let doc = params.doc_column.as_str();
    let text = params.text_column.as_str();
    let result = params.result_column.as_str();

    let words = tokenize(input, text).sort(&[doc, text]);

    let filter_text = params.text_column.clone();
    let frequent = words
        .reduce(Count::new("count"), &[doc, text])
        .map(Filter::new(move |row: &Row| {
            Ok(row.i64_field("count")? >= 2 && row.str_field(&filter_text)?.chars().count() > 4)
        }));

    let kept = words.join(InnerJoiner::new(), &frequent, &[doc, text]);

    let corpus_tf = kept
        .reduce(TermFrequency::new(text).into_column("tf_sum"), &[])
        .sort(&[text]);

    kept.reduce(TermFrequency::new(text).into_column("tf_doc"), &[doc])
        .sort(&[text])
        .join(InnerJoiner::new(), &corpus_tf, &[text])
        .map(Apply::new(result, |row: &Row| ln_ratio(row, "tf_doc", "tf_sum")))
        .map(Project::new([doc, text, result]))
        .sort(&[doc, result])
        .reduce(TopN::new(result, params.n), &[doc])
}
