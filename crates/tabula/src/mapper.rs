//! Record mappers: the compiled tree that moves tree values in and out of
//! tables.
//!
//! A [`ParentMapper`] stores the scalar fields of a record in one row keyed
//! by the record identifier. A [`LeveledMapper`] stores a list or map,
//! possibly nested, as one row per element under `_parent`, with a level
//! column per nesting layer. Records nested in either become child mappers,
//! so schemas of any depth compile into a finite tree of tables.

mod leveled;
pub use leveled::LeveledMapper;

mod lineage;
use lineage::Lineage;

mod parent;
pub use parent::ParentMapper;

mod scope;
use scope::Scope;

use crate::{Error, Result, Revision, Table, Transaction, Value};

use async_recursion::async_recursion;
use std::sync::Arc;
use tabula_core::schema::Node;

/// Row identifier column of tables that need one.
pub(crate) const ID: &str = "_id";

/// Identifier of the owning record.
pub(crate) const PARENT: &str = "_parent";

/// Element column of leaf-terminated leveled tables.
pub(crate) const VALUE: &str = "_value";

/// Marks a record element for deletion on write.
pub(crate) const DELETE: &str = "_delete";

#[derive(Debug)]
pub enum Mapper {
    Parent(ParentMapper),
    Leveled(LeveledMapper),
}

impl Mapper {
    /// Compile the mapper for a nested field.
    fn compile(field: &str, node: &Node, scope: &Scope) -> Result<Mapper> {
        match node {
            Node::Leaf(_) => Err(Error::invalid_schema(format!(
                "`{field}` is a leaf and belongs in its record's table"
            ))),
            Node::Record(record) => ParentMapper::child(field, record, scope).map(Mapper::Parent),
            Node::List(_) | Node::Map(_) => {
                LeveledMapper::new(field, node, scope).map(Mapper::Leveled)
            }
        }
    }

    /// Read the value stored under `id`, `Null` when there is none.
    #[async_recursion]
    pub async fn get(&self, id: &Value) -> Result<Value> {
        tracing::trace!(mapper = self.name(), ?id, "get");
        match self {
            Mapper::Parent(mapper) => mapper.get(id).await,
            Mapper::Leveled(mapper) => mapper.get(id).await,
        }
    }

    /// Root identifiers whose value matches `criteria`.
    #[async_recursion]
    pub async fn filter(&self, criteria: &Value) -> Result<Vec<Value>> {
        tracing::trace!(mapper = self.name(), ?criteria, "filter");
        match self {
            Mapper::Parent(mapper) => mapper.filter(criteria).await,
            Mapper::Leveled(mapper) => mapper.filter(criteria).await,
        }
    }

    /// Queue a whole overwrite of the value under `id`.
    #[async_recursion]
    pub async fn set(
        &self,
        id: &Value,
        value: &Value,
        batch: &mut Transaction,
    ) -> Result<Option<Revision>> {
        tracing::trace!(mapper = self.name(), ?id, "set");
        match self {
            Mapper::Parent(mapper) => mapper.set(id, value, batch).await,
            Mapper::Leveled(mapper) => mapper.set(id, value, batch).await,
        }
    }

    /// Queue a partial overwrite of the value under `id`.
    #[async_recursion]
    pub async fn update(
        &self,
        id: &Value,
        value: &Value,
        batch: &mut Transaction,
    ) -> Result<Option<Revision>> {
        tracing::trace!(mapper = self.name(), ?id, "update");
        match self {
            Mapper::Parent(mapper) => mapper.update(id, value, batch).await,
            Mapper::Leveled(mapper) => mapper.update(id, value, batch).await,
        }
    }

    /// Queue removal of the value under `id`, returning what was there.
    #[async_recursion]
    pub async fn delete(&self, id: &Value, batch: &mut Transaction) -> Result<Option<Value>> {
        tracing::trace!(mapper = self.name(), ?id, "delete");
        match self {
            Mapper::Parent(mapper) => mapper.delete(id, batch).await,
            Mapper::Leveled(mapper) => mapper.delete(id, batch).await,
        }
    }

    /// Name of the table this mapper stores under, or would for a record
    /// without scalar fields.
    pub fn name(&self) -> &str {
        match self {
            Mapper::Parent(mapper) => mapper.name(),
            Mapper::Leveled(mapper) => mapper.table().name(),
        }
    }

    /// Every table this mapper and its descendants own.
    pub fn tables(&self) -> Vec<Arc<Table>> {
        match self {
            Mapper::Parent(mapper) => mapper.tables(),
            Mapper::Leveled(mapper) => mapper.tables(),
        }
    }
}

/// Create every table in `tables`, skipping those that exist.
pub(crate) async fn install(tables: &[Arc<Table>]) -> Result<()> {
    for table in tables {
        tracing::debug!(table = table.name(), "install");
        table.create().await?;
    }
    Ok(())
}

/// Drop every table in `tables`, descendants first.
pub(crate) async fn uninstall(tables: &[Arc<Table>]) -> Result<()> {
    for table in tables.iter().rev() {
        tracing::debug!(table = table.name(), "uninstall");
        table.drop_table().await?;
    }
    Ok(())
}

/// Reject field names that collide with generated columns.
fn check_field(table: &str, field: &str, key: &str) -> Result<()> {
    let level = |prefix: &str| {
        field
            .strip_prefix(prefix)
            .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
    };

    if field == key || [ID, PARENT, VALUE, DELETE].contains(&field) || level("_a_") || level("_h_")
    {
        return Err(Error::invalid_schema(format!(
            "field `{field}` of `{table}` collides with a generated column"
        )));
    }
    Ok(())
}
