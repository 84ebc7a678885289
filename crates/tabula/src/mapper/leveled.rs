mod shape;
use shape::{Level, LevelKind, Shape};

use super::{check_field, lineage, Lineage, Mapper, Scope, DELETE, ID, PARENT, VALUE};
use crate::{
    err, table::Conflict, Error, Query, Result, Revision, Row, Table, Transaction, Value,
};

use indexmap::{IndexMap, IndexSet};
use std::sync::Arc;
use tabula_core::schema::{
    db::{Column, Index, IndexKind},
    Kind, Leaf, Node, Record,
};
use tabula_sql::stmt::Direction;

/// Added to a list position while rows move, so permuted positions never
/// collide with rows that have not moved yet.
const POSITION_OFFSET: i64 = 1 << 30;

/// An element row matched or created by a record write, waiting for its
/// nested fields to be written.
struct Pending {
    key: String,
    row_id: Value,
    row: Row,
    fields: IndexMap<String, Revision>,
    created: bool,
}

/// Maps a list or map field, nested to any depth, to one row per element.
///
/// Rows carry the owner's identifier in `_parent` and one position column
/// per nesting level: `_a_<depth>` for list indexes, `_h_<depth>` for map
/// keys. Leaf elements live in `_value`. Record elements get an `_id` and
/// store their scalar fields as columns, their nested containers in child
/// mappers keyed by that `_id`.
#[derive(Debug)]
pub struct LeveledMapper {
    table: Arc<Table>,
    shape: Shape,

    /// Scalar fields of record elements.
    columns: Vec<String>,

    children: IndexMap<String, Mapper>,
    lineage: Lineage,
}

impl LeveledMapper {
    pub(super) fn new(field: &str, node: &Node, scope: &Scope) -> Result<LeveledMapper> {
        let name = format!("{}_{field}", scope.name);

        let mut levels = vec![];
        let mut level_leaves = vec![];
        let mut inner = node;
        let (leaf, record) = loop {
            match inner {
                Node::List(list) => {
                    levels.push(Level::new(levels.len(), LevelKind::List));
                    level_leaves.push(Leaf::new(Kind::Uint));
                    inner = &list.child;
                }
                Node::Map(map) => {
                    levels.push(Level::new(levels.len(), LevelKind::Map));
                    level_leaves.push(map.key.clone().required());
                    inner = &map.child;
                }
                Node::Leaf(leaf) => break (Some(leaf), None),
                Node::Record(record) => break (None, Some(record)),
            }
        };

        let mut base = scope.spec(name);
        base.key = record.map(|_| ID.to_string());
        let mut index = vec![PARENT.to_string()];
        index.extend(levels.iter().map(|level| level.column.clone()));
        base.indexes
            .push(Index::new("parent_index", IndexKind::Unique, index));

        let (spec, flavor) = scope.resolve(base, node.overrides())?;
        let backend = flavor.name();

        let mut columns = vec![];
        if record.is_some() {
            columns.push(Column::new(ID, &Leaf::new(Kind::Uuid), backend)?);
        }
        columns.push(Column::new(PARENT, &scope.key_leaf.clone().required(), backend)?);
        for (level, leaf) in levels.iter().zip(&level_leaves) {
            columns.push(Column::new(&level.column, leaf, backend)?);
        }

        if let Some(leaf) = leaf {
            columns.push(Column::new(VALUE, leaf, backend)?);
        }

        let mut scalars = vec![];
        let mut nested = vec![];
        for (field, node) in record.into_iter().flat_map(Record::fields) {
            check_field(&spec.name, field, ID)?;
            match node {
                Node::Leaf(leaf) => {
                    columns.push(
                        Column::new(field, leaf, backend)
                            .map_err(|err| err.context(err!("field `{field}`")))?,
                    );
                    scalars.push(field.to_string());
                }
                node => nested.push((field, node)),
            }
        }

        let table = Arc::new(Table::new(&scope.db, spec, columns)?);

        let mut children = IndexMap::new();
        if !nested.is_empty() {
            let child_scope = scope.nested(
                table.spec(),
                ID,
                Leaf::new(Kind::Uuid),
                scope.lineage.through(table.clone()),
            );
            for (field, node) in nested {
                children.insert(field.to_string(), Mapper::compile(field, node, &child_scope)?);
            }
        }

        Ok(LeveledMapper {
            table,
            shape: Shape {
                levels,
                record: record.is_some(),
            },
            columns: scalars,
            children,
            lineage: scope.lineage.clone(),
        })
    }

    pub fn table(&self) -> &Arc<Table> {
        &self.table
    }

    pub fn children(&self) -> &IndexMap<String, Mapper> {
        &self.children
    }

    pub fn tables(&self) -> Vec<Arc<Table>> {
        let mut tables = vec![self.table.clone()];
        for child in self.children.values() {
            tables.extend(child.tables());
        }
        tables
    }

    /// Rebuild the field value stored under `id`. A field with no elements
    /// reads back as an empty list or map.
    pub async fn get(&self, id: &Value) -> Result<Value> {
        let mut rows = self.rows(id).await?;

        for row in &mut rows {
            let row_id = row.get(ID).cloned().unwrap_or_default();
            for (field, child) in &self.children {
                let value = child.get(&row_id).await?;
                if !value.is_empty() {
                    row.insert(field.clone(), value);
                }
            }
        }

        Ok(self.shape.elevate(rows))
    }

    /// Root identifiers with an element matching `criteria`.
    ///
    /// Leaf elements are matched against the criteria directly; record
    /// elements take criteria per field.
    pub async fn filter(&self, criteria: &Value) -> Result<Vec<Value>> {
        let mut own = Row::new();
        let mut sets = vec![];

        if !self.shape.record {
            own.insert(VALUE.to_string(), criteria.clone());
        } else {
            let Value::Map(criteria) = criteria else {
                return Err(Error::invalid_filter_key(
                    self.table.name(),
                    format!("{criteria:?}"),
                ));
            };
            for (field, value) in criteria {
                if field == ID || self.columns.contains(field) {
                    own.insert(field.clone(), value.clone());
                } else if let Some(child) = self.children.get(field) {
                    sets.push(child.filter(value).await?);
                } else {
                    return Err(Error::invalid_filter_key(self.table.name(), field));
                }
            }
        }

        if !own.is_empty() {
            let query = Query::new().distinct().fields([PARENT]).filter(own);
            let parents = self
                .table
                .select(&query)
                .await?
                .into_iter()
                .filter_map(|mut row| row.swap_remove(PARENT))
                .collect();
            sets.insert(0, self.lineage.resolve(parents).await?);
        }

        Ok(lineage::intersect(sets))
    }

    /// Queue a write making `value` the whole field under `id`. Record
    /// elements not mentioned in `value` are deleted.
    pub async fn set(
        &self,
        id: &Value,
        value: &Value,
        batch: &mut Transaction,
    ) -> Result<Option<Revision>> {
        self.write(id, value, true, batch).await
    }

    /// Queue a write of the elements in `value`. Record elements not
    /// mentioned are kept; leaf elements are always replaced as a whole.
    pub async fn update(
        &self,
        id: &Value,
        value: &Value,
        batch: &mut Transaction,
    ) -> Result<Option<Revision>> {
        self.write(id, value, false, batch).await
    }

    async fn write(
        &self,
        id: &Value,
        value: &Value,
        replace: bool,
        batch: &mut Transaction,
    ) -> Result<Option<Revision>> {
        if value.is_null() {
            let old = self.delete(id, batch).await?;
            return Ok(old.map(|old| Revision::changed(old, Value::Null)));
        }

        let incoming = self.shape.flatten(value)?;
        if self.shape.record {
            self.write_records(id, value, incoming, replace, batch).await
        } else {
            self.write_values(id, incoming, batch).await
        }
    }

    /// Leaf elements: replace every row when anything differs.
    async fn write_values(
        &self,
        id: &Value,
        incoming: Vec<Row>,
        batch: &mut Transaction,
    ) -> Result<Option<Revision>> {
        let incoming: Vec<Row> = incoming
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|(column, value)| {
                        let value = self.table.normalize(&column, &value);
                        (column, value)
                    })
                    .collect()
            })
            .collect();

        let mut current = self.rows(id).await?;
        for row in &mut current {
            row.swap_remove(PARENT);
        }

        if same_rows(&current, &incoming) {
            return Ok(None);
        }

        batch.delete(&self.table, &self.parent_filter(id))?;
        for row in &incoming {
            batch.insert(&self.table, &self.with_parent(id, row), &Conflict::Error)?;
        }

        Ok(Some(Revision::changed(
            self.elevate_or_null(current),
            self.elevate_or_null(incoming),
        )))
    }

    /// Record elements: match rows by `_id` and queue only the differences.
    async fn write_records(
        &self,
        id: &Value,
        value: &Value,
        incoming: Vec<Row>,
        replace: bool,
        batch: &mut Transaction,
    ) -> Result<Option<Revision>> {
        let existing: IndexMap<String, Row> = self
            .rows(id)
            .await?
            .into_iter()
            .filter_map(|row| Some((row.get(ID)?.key_string()?, row)))
            .collect();

        let mut seen = IndexSet::new();
        let mut deletes: IndexMap<String, Value> = IndexMap::new();
        let mut updates = vec![];
        let mut inserts = vec![];
        let mut moved_ids = vec![];
        let mut moved_columns = IndexSet::new();
        let mut pending = vec![];

        for row in incoming {
            if let Some(field) = row.keys().find(|field| !self.accepts(field)) {
                return Err(err!("`{}` has no field `{field}`", self.table.name()));
            }

            let deleted = row
                .get(DELETE)
                .is_some_and(|flag| !matches!(flag, Value::Null | Value::Bool(false)));
            let row_key = row
                .get(ID)
                .filter(|id| !id.is_null())
                .and_then(Value::key_string);

            let Some((key, old)) = row_key.as_ref().and_then(|key| existing.get_key_value(key))
            else {
                if deleted {
                    continue;
                }

                let key = match row_key.clone() {
                    Some(key) => key,
                    None => self.table.new_identifier().await?,
                };
                let row_id = Value::String(key.clone());

                let mut insert = Row::from_iter([(ID.to_string(), row_id.clone())]);
                insert.insert(PARENT.to_string(), id.clone());
                for column in self.shape.columns().chain(self.columns.iter().map(String::as_str)) {
                    if let Some(value) = row.get(column) {
                        insert.insert(column.to_string(), value.clone());
                    }
                }
                inserts.push(insert);
                pending.push(Pending {
                    key,
                    row_id,
                    row,
                    fields: IndexMap::new(),
                    created: true,
                });
                continue;
            };

            seen.insert(key.clone());
            let row_id = old.get(ID).cloned().unwrap_or_default();

            if deleted {
                deletes.insert(key.clone(), row_id);
                continue;
            }

            let mut changes = Row::new();
            let mut moved = false;
            for level in &self.shape.levels {
                let position = row.get(&level.column).cloned().unwrap_or_default();
                let position = self.table.normalize(&level.column, &position);
                if old.get(&level.column) == Some(&position) {
                    continue;
                }

                match (level.kind, position.as_i64()) {
                    (LevelKind::List, Some(position)) => {
                        let parked = Value::I64(position + POSITION_OFFSET);
                        changes.insert(level.column.clone(), parked);
                        moved_columns.insert(level.column.clone());
                        moved = true;
                    }
                    _ => {
                        changes.insert(level.column.clone(), position);
                    }
                }
            }
            if moved {
                moved_ids.push(row_id.clone());
            }

            let mut fields = IndexMap::new();
            for column in &self.columns {
                let Some(value) = row.get(column) else {
                    continue;
                };
                let value = self.table.normalize(column, value);
                let before = old.get(column).cloned().unwrap_or_default();
                if before != value {
                    changes.insert(column.clone(), value.clone());
                    fields.insert(column.clone(), Revision::changed(before, value));
                }
            }

            if !changes.is_empty() {
                updates.push((row_id.clone(), changes));
            }
            pending.push(Pending {
                key: key.clone(),
                row_id,
                row,
                fields,
                created: false,
            });
        }

        if replace {
            for (key, old) in &existing {
                if !seen.contains(key) {
                    deletes.insert(key.clone(), old.get(ID).cloned().unwrap_or_default());
                }
            }
        }

        let mut revisions = IndexMap::new();
        let mut removed = IndexMap::new();

        // deletes first, so moved and new rows find their positions free
        for (key, row_id) in &deletes {
            batch.delete(&self.table, &self.id_filter(row_id))?;

            let mut old = existing.get(key).cloned().unwrap_or_default();
            for (field, child) in &self.children {
                if let Some(value) = child.delete(row_id, batch).await? {
                    old.insert(field.clone(), value);
                }
            }

            let mut record = self.record_of(&old);
            for field in self.children.keys() {
                if let Some(value) = old.get(field) {
                    record.insert(field.clone(), value.clone());
                }
            }
            revisions.insert(key.clone(), Revision::changed(Value::Map(record), Value::Null));
            removed.insert(key.clone(), old);
        }

        for (row_id, changes) in &updates {
            batch.update(&self.table, changes, &self.id_filter(row_id))?;
        }

        for insert in &inserts {
            batch.insert(&self.table, insert, &Conflict::Error)?;
        }

        if !moved_ids.is_empty() {
            let columns: Vec<String> = moved_columns.into_iter().collect();
            let sql = self
                .table
                .settle_positions_statement(&columns, POSITION_OFFSET, &moved_ids)?;
            batch.raw(&self.table, sql);
        }

        for mut pending in pending {
            for (field, child) in &self.children {
                let Some(value) = pending.row.get(field) else {
                    continue;
                };
                let revision = if replace || pending.created {
                    child.set(&pending.row_id, value, batch).await?
                } else {
                    child.update(&pending.row_id, value, batch).await?
                };
                if let Some(revision) = revision {
                    pending.fields.insert(field.clone(), revision);
                }
            }

            let revision = if pending.created {
                let mut record = self.record_of(&pending.row);
                for field in self.children.keys() {
                    if let Some(value) = pending.row.get(field).filter(|v| !v.is_empty()) {
                        record.insert(field.clone(), value.clone());
                    }
                }
                Some(Revision::changed(Value::Null, Value::Map(record)))
            } else {
                let total = self.columns.len() + self.children.len();
                Revision::collapse(pending.fields, total, false)
            };

            if let Some(revision) = revision {
                revisions.insert(pending.key, revision);
            }
        }

        if revisions.is_empty() {
            return Ok(None);
        }

        // the field went from nothing to something, or the other way round
        if existing.is_empty() {
            return Ok(Some(Revision::changed(Value::Null, value.clone())));
        }
        if deletes.len() == existing.len() && inserts.is_empty() {
            let rows = existing
                .keys()
                .filter_map(|key| removed.swap_remove(key))
                .collect();
            return Ok(Some(Revision::changed(self.shape.elevate(rows), Value::Null)));
        }

        Ok(Some(Revision::Fields(revisions)))
    }

    /// Queue removal of every element under `id`, returning the old value.
    pub async fn delete(&self, id: &Value, batch: &mut Transaction) -> Result<Option<Value>> {
        let mut rows = self.rows(id).await?;
        if rows.is_empty() {
            return Ok(None);
        }

        batch.delete(&self.table, &self.parent_filter(id))?;

        for row in &mut rows {
            let row_id = row.get(ID).cloned().unwrap_or_default();
            for (field, child) in &self.children {
                if let Some(value) = child.delete(&row_id, batch).await? {
                    row.insert(field.clone(), value);
                }
            }
        }

        Ok(Some(self.shape.elevate(rows)))
    }

    /// Stored rows under `id`, ordered by position.
    async fn rows(&self, id: &Value) -> Result<Vec<Row>> {
        let mut query = Query::new().filter(self.parent_filter(id));
        for column in self.shape.columns() {
            query = query.order_by(column, Direction::Asc);
        }
        self.table.select(&query).await
    }

    fn accepts(&self, field: &str) -> bool {
        field == ID
            || field == DELETE
            || self.shape.columns().any(|column| column == field)
            || self.columns.iter().any(|column| column == field)
            || self.children.contains_key(field)
    }

    /// The scalar fields of an element row, without nulls.
    fn record_of(&self, row: &Row) -> Row {
        self.columns
            .iter()
            .filter_map(|column| {
                let value = row.get(column).filter(|value| !value.is_null())?;
                Some((column.clone(), value.clone()))
            })
            .collect()
    }

    fn elevate_or_null(&self, rows: Vec<Row>) -> Value {
        if rows.is_empty() {
            Value::Null
        } else {
            self.shape.elevate(rows)
        }
    }

    fn parent_filter(&self, id: &Value) -> Row {
        Row::from_iter([(PARENT.to_string(), id.clone())])
    }

    fn id_filter(&self, row_id: &Value) -> Row {
        Row::from_iter([(ID.to_string(), row_id.clone())])
    }

    fn with_parent(&self, id: &Value, row: &Row) -> Row {
        let mut values = self.parent_filter(id);
        values.extend(row.iter().map(|(k, v)| (k.clone(), v.clone())));
        values
    }
}

/// Element rows are unique per position, so two row sets hold the same
/// elements exactly when they match as sets. Stored map rows come back in
/// key order while incoming ones keep the caller's order.
fn same_rows(current: &[Row], incoming: &[Row]) -> bool {
    current.len() == incoming.len() && incoming.iter().all(|row| current.contains(row))
}
