//! Ready-made graphs built only from the core operations.
//!
//! - [`word_count_graph`] - occurrences of each word across all rows
//! - [`inverted_index_graph`] - top documents per word by tf-idf
//! - [`pmi_graph`] - top words per document by pointwise mutual information
//! - [`road_speed_graph`] - average road speed by weekday and hour
//!
//! Every graph is a plain [`Graph`](crate::Graph): it is run with
//! [`Sources`](crate::Sources) naming its inputs and can be run repeatedly.

mod roads;
mod words;

pub use roads::{RoadSpeedParams, haversine_km, road_speed_graph};
pub use words::{
    InvertedIndexParams, PmiParams, inverted_index_graph, pmi_graph, word_count_graph,
};
