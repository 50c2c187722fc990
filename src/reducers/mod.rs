//! Per-group strategies for the [`Reduce`](crate::operations::Reduce) operation.
//!
//! A [`Reducer`] is called once per contiguous key group with the grouping
//! field names and a lazy stream over the group's rows, and returns a lazy
//! stream of output rows. The operation drains that output before moving to
//! the next group; group rows the reducer never read are skipped then.
//!
//! ## Built-ins
//! - [`FirstReducer`] - passes each group through unchanged
//! - [`Count`] - one row per group with the row count
//! - [`Sum`] - one row per group with the sum of a numeric field
//! - [`TopN`] - the `n` rows with the largest value of a field
//! - [`TermFrequency`] - relative frequency of each distinct value of a field

pub mod basic;
pub mod term_frequency;
pub mod topn;

pub use basic::{Count, FirstReducer, Sum};
pub use term_frequency::TermFrequency;
pub use topn::TopN;

use crate::stream::RowStream;

pub trait Reducer: Send + Sync {
    /// Output rows for one group. `rows` stops at the end of the group and
    /// stops yielding once the operation moves on.
    fn reduce(&self, keys: &[String], rows: RowStream) -> RowStream;

    /// Name shown in plan explanations.
    fn name(&self) -> String {
        crate::node::short_type_name::<Self>().to_string()
    }
}
