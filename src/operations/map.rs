use super::single_input;
use crate::mappers::Mapper;
use crate::node::Operation;
use crate::stream::RowStream;
use anyhow::Result;
use std::sync::Arc;

/// Applies a [`Mapper`] to every row and flattens the results in order.
pub struct Map {
    mapper: Arc<dyn Mapper>,
}

impl Map {
    pub fn new(mapper: Arc<dyn Mapper>) -> Self {
        Self { mapper }
    }
}

impl Operation for Map {
    fn apply(&self, inputs: Vec<RowStream>) -> Result<RowStream> {
        let input = single_input(inputs, "map")?;
        let mapper = Arc::clone(&self.mapper);
        Ok(Box::new(input.flat_map(move |row| {
            match row.and_then(|r| mapper.map(r)) {
                Ok(rows) => rows.into_iter().map(Ok).collect::<Vec<_>>(),
                Err(e) => vec![Err(e)],
            }
        })))
    }

    fn kind(&self) -> &'static str {
        "Map"
    }

    fn describe(&self) -> String {
        format!("map {}", self.mapper.name())
    }
}
