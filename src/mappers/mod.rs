//! Per-row strategies for the [`Map`](crate::operations::Map) operation.
//!
//! A [`Mapper`] receives one owned row and returns zero, one or many output
//! rows. Returning nothing filters the row out; returning several splits it.
//! Mappers that emit more than one row must clone the input for each output.
//!
//! Built-ins:
//! - text: [`FilterPunctuation`], [`LowerCase`], [`Split`]
//! - general: [`Identity`], [`Filter`], [`Project`], [`Product`], [`Apply`]

pub mod basic;
pub mod text;

pub use basic::*;
pub use text::*;

use crate::row::Row;
use anyhow::Result;

pub trait Mapper: Send + Sync {
    fn map(&self, row: Row) -> Result<Vec<Row>>;

    /// Name shown in plan explanations.
    fn name(&self) -> String {
        crate::node::short_type_name::<Self>().to_string()
    }
}
