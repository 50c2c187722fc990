//! Text mappers used by the word-oriented algorithm graphs.

use super::Mapper;
use crate::row::{Row, RowExt};
use anyhow::Result;
use serde_json::Value;

/// Removes ASCII punctuation from a string field.
#[derive(Clone, Debug)]
pub struct FilterPunctuation {
    column: String,
}

impl FilterPunctuation {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }
}

impl Mapper for FilterPunctuation {
    fn map(&self, mut row: Row) -> Result<Vec<Row>> {
        let cleaned: String = row
            .str_field(&self.column)?
            .chars()
            .filter(|c| !c.is_ascii_punctuation())
            .collect();
        row.insert(self.column.clone(), Value::String(cleaned));
        Ok(vec![row])
    }

    fn name(&self) -> String {
        format!("FilterPunctuation({})", self.column)
    }
}

/// Lowercases a string field.
#[derive(Clone, Debug)]
pub struct LowerCase {
    column: String,
}

impl LowerCase {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
        }
    }
}

impl Mapper for LowerCase {
    fn map(&self, mut row: Row) -> Result<Vec<Row>> {
        let lowered = row.str_field(&self.column)?.to_lowercase();
        row.insert(self.column.clone(), Value::String(lowered));
        Ok(vec![row])
    }

    fn name(&self) -> String {
        format!("LowerCase({})", self.column)
    }
}

#[derive(Clone, Copy, Debug)]
enum Separator {
    Whitespace,
    Char(char),
}

impl Separator {
    fn matches(self, c: char) -> bool {
        match self {
            // Unicode whitespace plus the ASCII information separators.
            Separator::Whitespace => c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c),
            Separator::Char(s) => c == s,
        }
    }
}

/// Splits a string field into one row per piece.
///
/// Every separator character ends a piece, so two adjacent separators yield
/// an empty piece between them. The piece after the last separator is
/// emitted only when non-empty. Without an explicit separator each
/// whitespace character separates, and so do the ASCII file, group, record
/// and unit separators (`\x1c` to `\x1f`).
#[derive(Clone, Debug)]
pub struct Split {
    column: String,
    separator: Separator,
}

impl Split {
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            separator: Separator::Whitespace,
        }
    }

    #[must_use]
    pub fn with_separator(mut self, separator: char) -> Self {
        self.separator = Separator::Char(separator);
        self
    }

    fn pieces<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let mut out = Vec::new();
        let mut start = 0;
        for (i, c) in text.char_indices() {
            if self.separator.matches(c) {
                out.push(&text[start..i]);
                start = i + c.len_utf8();
            }
        }
        if start != text.len() {
            out.push(&text[start..]);
        }
        out
    }
}

impl Mapper for Split {
    fn map(&self, row: Row) -> Result<Vec<Row>> {
        let text = row.str_field(&self.column)?;
        Ok(self
            .pieces(text)
            .into_iter()
            .map(|piece| {
                let mut out = row.clone();
                out.insert(self.column.clone(), Value::String(piece.to_string()));
                out
            })
            .collect())
    }

    fn name(&self) -> String {
        match self.separator {
            Separator::Whitespace => format!("Split({})", self.column),
            Separator::Char(c) => format!("Split({} on {c:?})", self.column),
        }
    }
}
