use super::Mapper;
use crate::row::{Numeric, Row, RowExt};
use anyhow::Result;
use serde_json::Value;

/// Yields every row unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct Identity;

impl Mapper for Identity {
    fn map(&self, row: Row) -> Result<Vec<Row>> {
        Ok(vec![row])
    }
}

type Predicate = Box<dyn Fn(&Row) -> Result<bool> + Send + Sync>;

/// Keeps a row iff the predicate holds.
///
/// A predicate error becomes an error item of the stream.
pub struct Filter {
    predicate: Predicate,
}

impl Filter {
    pub fn new<P>(predicate: P) -> Self
    where
        P: Fn(&Row) -> Result<bool> + Send + Sync + 'static,
    {
        Self {
            predicate: Box::new(predicate),
        }
    }
}

impl Mapper for Filter {
    fn map(&self, row: Row) -> Result<Vec<Row>> {
        if (self.predicate)(&row)? {
            Ok(vec![row])
        } else {
            Ok(Vec::new())
        }
    }
}

/// Keeps exactly the listed fields, in the listed order.
///
/// A row lacking any listed field is an error, not a silently narrower row.
#[derive(Clone, Debug)]
pub struct Project {
    columns: Vec<String>,
}

impl Project {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }
}

impl Mapper for Project {
    fn map(&self, row: Row) -> Result<Vec<Row>> {
        Ok(vec![row.select(&self.columns)?])
    }

    fn name(&self) -> String {
        format!("Project({})", self.columns.join(", "))
    }
}

/// Stores the product of several numeric fields in `result_column`.
///
/// The product stays an integer while every factor is one.
#[derive(Clone, Debug)]
pub struct Product {
    columns: Vec<String>,
    result_column: String,
}

impl Product {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            result_column: "product".to_string(),
        }
    }

    #[must_use]
    pub fn into_column(mut self, result_column: impl Into<String>) -> Self {
        self.result_column = result_column.into();
        self
    }
}

impl Mapper for Product {
    fn map(&self, mut row: Row) -> Result<Vec<Row>> {
        let mut acc = Numeric::Int(1);
        for c in &self.columns {
            acc = acc.mul(Numeric::from_field(&row, c)?);
        }
        row.insert(self.result_column.clone(), acc.into_value());
        Ok(vec![row])
    }

    fn name(&self) -> String {
        format!("Product({} -> {})", self.columns.join(" * "), self.result_column)
    }
}

type StoreFn = Box<dyn Fn(&Row) -> Result<Value> + Send + Sync>;
type InPlaceFn = Box<dyn Fn(&mut Row) -> Result<()> + Send + Sync>;

enum ApplyFn {
    Store { column: String, func: StoreFn },
    InPlace(InPlaceFn),
}

/// Runs an arbitrary function over each row, yielding the row once.
///
/// [`Apply::new`] stores the function's result in a field;
/// [`Apply::in_place`] lets the function edit the row directly.
pub struct Apply {
    func: ApplyFn,
}

impl Apply {
    pub fn new<F>(result_column: impl Into<String>, func: F) -> Self
    where
        F: Fn(&Row) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            func: ApplyFn::Store {
                column: result_column.into(),
                func: Box::new(func),
            },
        }
    }

    pub fn in_place<F>(func: F) -> Self
    where
        F: Fn(&mut Row) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            func: ApplyFn::InPlace(Box::new(func)),
        }
    }
}

impl Mapper for Apply {
    fn map(&self, mut row: Row) -> Result<Vec<Row>> {
        match &self.func {
            ApplyFn::Store { column, func } => {
                let v = func(&row)?;
                row.insert(column.clone(), v);
            }
            ApplyFn::InPlace(func) => func(&mut row)?,
        }
        Ok(vec![row])
    }

    fn name(&self) -> String {
        match &self.func {
            ApplyFn::Store { column, .. } => format!("Apply(-> {column})"),
            ApplyFn::InPlace(_) => "Apply(in place)".to_string(),
        }
    }
}
