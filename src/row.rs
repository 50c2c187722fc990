//! Schema-less rows and the value ordering used for grouping and sorting.
//!
//! A [`Row`] is an insertion-ordered JSON object. Fields are read through the
//! [`RowExt`] accessors, which fail with a [`GraphError`] instead of
//! defaulting when a field is absent or holds the wrong type.
//!
//! Values are totally ordered by [`compare_values`]:
//! `null < bool < number < string < array < object`. Numbers compare by
//! numeric value regardless of integer/float representation, so `1` and `1.0`
//! land in the same group.

use crate::error::GraphError;
use anyhow::Result;
use ordered_float::OrderedFloat;
use serde_json::{Map, Number, Value};
use std::cmp::Ordering;

/// One record: field name to dynamically typed value.
pub type Row = Map<String, Value>;

/// Typed, failing accessors over a [`Row`].
pub trait RowExt {
    /// Borrow a field, failing with [`GraphError::MissingField`] when absent.
    fn field(&self, name: &str) -> Result<&Value>;

    /// Mutably borrow a field, failing when absent.
    fn field_mut(&mut self, name: &str) -> Result<&mut Value>;

    /// Borrow a string field.
    fn str_field(&self, name: &str) -> Result<&str>;

    /// Read a numeric field as `f64`.
    fn f64_field(&self, name: &str) -> Result<f64>;

    /// Read an integer field.
    fn i64_field(&self, name: &str) -> Result<i64>;

    /// Extract the grouping key for `keys`. Missing fields become `null`.
    fn group_key(&self, keys: &[String]) -> GroupKey;

    /// Copy the listed fields, in order, into a new row.
    ///
    /// Fails on the first missing field.
    fn select(&self, columns: &[String]) -> Result<Row>;
}

impl RowExt for Row {
    fn field(&self, name: &str) -> Result<&Value> {
        self.get(name)
            .ok_or_else(|| GraphError::missing_field(name).into())
    }

    fn field_mut(&mut self, name: &str) -> Result<&mut Value> {
        self.get_mut(name)
            .ok_or_else(|| GraphError::missing_field(name).into())
    }

    fn str_field(&self, name: &str) -> Result<&str> {
        let v = self.field(name)?;
        v.as_str()
            .ok_or_else(|| type_mismatch(name, "a string", v).into())
    }

    fn f64_field(&self, name: &str) -> Result<f64> {
        let v = self.field(name)?;
        v.as_f64()
            .ok_or_else(|| type_mismatch(name, "a number", v).into())
    }

    fn i64_field(&self, name: &str) -> Result<i64> {
        let v = self.field(name)?;
        v.as_i64()
            .ok_or_else(|| type_mismatch(name, "an integer", v).into())
    }

    fn group_key(&self, keys: &[String]) -> GroupKey {
        GroupKey(
            keys.iter()
                .map(|k| self.get(k).cloned().unwrap_or(Value::Null))
                .collect(),
        )
    }

    fn select(&self, columns: &[String]) -> Result<Row> {
        let mut out = Row::with_capacity(columns.len());
        for c in columns {
            out.insert(c.clone(), self.field(c)?.clone());
        }
        Ok(out)
    }
}

pub(crate) fn type_mismatch(field: &str, expected: &'static str, found: &Value) -> GraphError {
    GraphError::TypeMismatch {
        field: field.to_string(),
        expected,
        found: found.to_string(),
    }
}

/// The values of a row's grouping fields, in key order.
///
/// Equality and ordering follow [`compare_values`] field by field.
#[derive(Clone, Debug, Default)]
pub struct GroupKey(pub Vec<Value>);

impl PartialEq for GroupKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for GroupKey {}

impl PartialOrd for GroupKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GroupKey {
    fn cmp(&self, other: &Self) -> Ordering {
        compare_seq(&self.0, &other.0)
    }
}

fn type_rank(v: &Value) -> u8 {
    match v {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

fn compare_numbers(a: &Number, b: &Number) -> Ordering {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x.cmp(&y);
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x.cmp(&y);
    }
    let x = OrderedFloat(a.as_f64().unwrap_or(f64::NAN));
    let y = OrderedFloat(b.as_f64().unwrap_or(f64::NAN));
    x.cmp(&y)
}

fn compare_seq(a: &[Value], b: &[Value]) -> Ordering {
    for (x, y) in a.iter().zip(b) {
        match compare_values(x, y) {
            Ordering::Equal => {}
            other => return other,
        }
    }
    a.len().cmp(&b.len())
}

/// Total order over JSON values used by sort, reduce and join.
pub fn compare_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Null, Value::Null) => Ordering::Equal,
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        (Value::Number(x), Value::Number(y)) => compare_numbers(x, y),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Array(x), Value::Array(y)) => compare_seq(x, y),
        (Value::Object(x), Value::Object(y)) => {
            for ((ka, va), (kb, vb)) in x.iter().zip(y.iter()) {
                match ka.cmp(kb).then_with(|| compare_values(va, vb)) {
                    Ordering::Equal => {}
                    other => return other,
                }
            }
            x.len().cmp(&y.len())
        }
        _ => type_rank(a).cmp(&type_rank(b)),
    }
}

/// Integer-preserving arithmetic over numeric field values.
///
/// Stays integral while every operand is an integer and the result fits in
/// `i64`; falls back to `f64` otherwise.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Numeric {
    Int(i64),
    Float(f64),
}

impl Numeric {
    pub(crate) fn from_field(row: &Row, name: &str) -> Result<Self> {
        let v = row.field(name)?;
        match v {
            Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(Self::Int(i)),
                None => Ok(Self::Float(n.as_f64().unwrap_or(f64::NAN))),
            },
            _ => Err(type_mismatch(name, "a number", v).into()),
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Self::Int(i) => i as f64,
            Self::Float(f) => f,
        }
    }

    pub(crate) fn add(self, other: Self) -> Self {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a
                .checked_add(b)
                .map_or_else(|| Self::Float(a as f64 + b as f64), Self::Int),
            (a, b) => Self::Float(a.as_f64() + b.as_f64()),
        }
    }

    pub(crate) fn mul(self, other: Self) -> Self {
        match (self, other) {
            (Self::Int(a), Self::Int(b)) => a
                .checked_mul(b)
                .map_or_else(|| Self::Float(a as f64 * b as f64), Self::Int),
            (a, b) => Self::Float(a.as_f64() * b.as_f64()),
        }
    }

    pub(crate) fn into_value(self) -> Value {
        match self {
            Self::Int(i) => Value::from(i),
            Self::Float(f) => Value::from(f),
        }
    }
}
