use super::db::{LeafOverride, TableOverride};
use crate::{Error, Result};

use indexmap::IndexMap;
use serde::de::DeserializeOwned;

/// Per-backend override blocks attached to a schema node.
///
/// Blocks are keyed by backend name (`mysql`, `sqlite`) and stay untyped
/// until a compiler asks for the shape it understands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    blocks: IndexMap<String, serde_json::Value>,
}

impl Overrides {
    pub fn insert(&mut self, backend: impl Into<String>, block: serde_json::Value) {
        self.blocks.insert(backend.into(), block);
    }

    pub fn get(&self, backend: &str) -> Option<&serde_json::Value> {
        self.blocks.get(backend)
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// The column override for `backend`, or an empty one.
    pub fn leaf(&self, backend: &str) -> Result<LeafOverride> {
        self.typed(backend)
    }

    /// The table override for `backend`, or an empty one.
    pub fn table(&self, backend: &str) -> Result<TableOverride> {
        self.typed(backend)
    }

    fn typed<T: DeserializeOwned + Default>(&self, backend: &str) -> Result<T> {
        match self.blocks.get(backend) {
            None => Ok(T::default()),
            Some(block) => serde_json::from_value(block.clone()).map_err(|err| {
                Error::from(err).context(Error::invalid_schema(format!(
                    "malformed `__{backend}__` block"
                )))
            }),
        }
    }
}
