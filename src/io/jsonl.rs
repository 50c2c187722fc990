//! JSON Lines row I/O.
//!
//! - [`read_jsonl_rows`]: lazy reader, one row per non-blank line
//! - [`write_jsonl_rows`]: writes a row stream, one compact object per line
//! - [`Sources::with_jsonl`]: registers a file as a source, re-opened per run
//! - [`Graph::write_jsonl`]: runs a graph straight into a file
//!
//! # Notes
//! - Blank and whitespace-only lines are skipped on read.
//! - A line that is not a JSON object fails with its 1-based line number.
//! - Fields are written in insertion order.

use crate::graph::Graph;
use crate::row::Row;
use crate::sources::Sources;
use crate::stream::RowStream;
use anyhow::{Context, Result, anyhow};
use serde_json::Value;
use std::fs::{File, create_dir_all};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Parse one JSONL line into a row.
fn parse_row(line: &str, line_no: usize, path: &Path) -> Result<Row> {
    let v: Value = serde_json::from_str(line)
        .with_context(|| format!("parse JSONL line {} in {}: {}", line_no, path.display(), line))?;
    match v {
        Value::Object(row) => Ok(row),
        other => Err(anyhow!(
            "JSONL line {} in {} is not an object: {}",
            line_no,
            path.display(),
            other
        )),
    }
}

/// Open `path` and lazily yield its rows.
///
/// # Errors
/// Opening the file fails eagerly; read and parse errors are yielded as
/// items with the offending line number.
pub fn read_jsonl_rows(path: impl AsRef<Path>) -> Result<RowStream> {
    let path: PathBuf = path.as_ref().to_path_buf();
    let f = File::open(&path).with_context(|| format!("open {}", path.display()))?;
    let reader = BufReader::new(f);
    Ok(Box::new(reader.lines().enumerate().filter_map(
        move |(idx, line)| match line {
            Err(e) => Some(Err(anyhow::Error::new(e)
                .context(format!("read line {} in {}", idx + 1, path.display())))),
            Ok(line) if line.trim().is_empty() => None,
            Ok(line) => Some(parse_row(&line, idx + 1, &path)),
        },
    )))
}

/// Write every row of `rows` to `path`, creating parent directories.
///
/// Stops at the first error item. Returns the number of rows written.
pub fn write_jsonl_rows<I>(path: impl AsRef<Path>, rows: I) -> Result<usize>
where
    I: IntoIterator<Item = Result<Row>>,
{
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        create_dir_all(parent).with_context(|| format!("mkdir -p {}", parent.display()))?;
    }
    let f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    let mut w = BufWriter::new(f);
    let mut n = 0usize;
    for row in rows {
        let row = row?;
        serde_json::to_writer(&mut w, &row)
            .with_context(|| format!("serialize row #{} to {}", n, path.display()))?;
        w.write_all(b"\n")?;
        n += 1;
    }
    w.flush()?;
    Ok(n)
}

impl Sources {
    /// Register a JSONL file as source `name`; the file is re-opened per run.
    #[must_use]
    pub fn with_jsonl(self, name: impl Into<String>, path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        self.with(name, move || read_jsonl_rows(&path))
    }
}

impl Graph {
    /// Run the graph and write its output to a JSONL file.
    /// Returns the number of rows written.
    pub fn write_jsonl(&self, sources: &Sources, path: impl AsRef<Path>) -> Result<usize> {
        write_jsonl_rows(path, self.run(sources)?)
    }
}
