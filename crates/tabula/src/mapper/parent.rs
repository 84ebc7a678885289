use super::{check_field, lineage, Lineage, Mapper, Scope};
use crate::{
    err, table::Conflict, Db, Error, Query, Result, Revision, Row, Table, Transaction, Value,
};

use indexmap::IndexMap;
use std::sync::Arc;
use tabula_core::schema::{db::Column, Node, Record};

/// Maps a record: scalar fields to one row keyed by the record identifier,
/// nested containers to child mappers addressed by the same identifier.
///
/// A record without scalar fields owns no table.
#[derive(Debug)]
pub struct ParentMapper {
    table: Option<Arc<Table>>,
    name: String,
    key: String,

    /// Scalar fields, in declaration order.
    columns: Vec<String>,

    children: IndexMap<String, Mapper>,
    lineage: Lineage,
}

impl ParentMapper {
    /// Compile the mapper for a top-level record stored in table `name`.
    pub fn root(db: &Db, name: &str, record: &Record) -> Result<ParentMapper> {
        let scope = Scope::root(db, name);
        ParentMapper::build(name.to_string(), record, &scope)
    }

    pub(super) fn child(field: &str, record: &Record, scope: &Scope) -> Result<ParentMapper> {
        ParentMapper::build(format!("{}_{field}", scope.name), record, scope)
    }

    fn build(name: String, record: &Record, scope: &Scope) -> Result<ParentMapper> {
        let mut base = scope.spec(name);
        base.key = Some(scope.key.clone());
        let (spec, flavor) = scope.resolve(base, &record.overrides)?;
        let key = spec.key.clone().unwrap_or_else(|| scope.key.clone());
        let backend = flavor.name();

        let mut columns = vec![Column::new(&key, &scope.key_leaf.clone().required(), backend)?];
        let mut nested = vec![];
        for (field, node) in record.fields() {
            check_field(&spec.name, field, &key)?;
            match node {
                Node::Leaf(leaf) => columns.push(
                    Column::new(field, leaf, backend)
                        .map_err(|err| err.context(err!("field `{field}`")))?,
                ),
                node => nested.push((field, node)),
            }
        }

        let scalars: Vec<String> = columns[1..].iter().map(|c| c.name.clone()).collect();
        let child_scope = scope.nested(&spec, &key, scope.key_leaf.clone(), scope.lineage.clone());
        let name = spec.name.clone();

        let table = if scalars.is_empty() {
            None
        } else {
            Some(Arc::new(Table::new(&scope.db, spec, columns)?))
        };

        let mut children = IndexMap::new();
        for (field, node) in nested {
            children.insert(field.to_string(), Mapper::compile(field, node, &child_scope)?);
        }

        Ok(ParentMapper {
            table,
            name,
            key,
            columns: scalars,
            children,
            lineage: scope.lineage.clone(),
        })
    }

    /// The table holding the scalar fields, if the record has any.
    pub fn table(&self) -> Option<&Arc<Table>> {
        self.table.as_ref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The column holding record identifiers.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn children(&self) -> &IndexMap<String, Mapper> {
        &self.children
    }

    pub fn tables(&self) -> Vec<Arc<Table>> {
        let mut tables: Vec<_> = self.table.iter().cloned().collect();
        for child in self.children.values() {
            tables.extend(child.tables());
        }
        tables
    }

    pub async fn install(&self) -> Result<()> {
        super::install(&self.tables()).await
    }

    pub async fn uninstall(&self) -> Result<()> {
        super::uninstall(&self.tables()).await
    }

    /// The record stored under `id`, or `Null`.
    pub async fn get(&self, id: &Value) -> Result<Value> {
        let mut record = match &self.table {
            Some(table) => self.row(table, id).await?.unwrap_or_default(),
            None => Row::new(),
        };

        for (field, child) in &self.children {
            let value = child.get(id).await?;
            if !value.is_empty() {
                record.insert(field.clone(), value);
            }
        }

        Ok(if record.is_empty() {
            Value::Null
        } else {
            Value::Map(record)
        })
    }

    /// Root identifiers of the records matching every criterion.
    pub async fn filter(&self, criteria: &Value) -> Result<Vec<Value>> {
        let Value::Map(criteria) = criteria else {
            return Err(Error::invalid_filter_key(&self.name, format!("{criteria:?}")));
        };

        let mut own = Row::new();
        let mut sets = vec![];
        for (field, value) in criteria {
            if self.columns.contains(field) {
                own.insert(field.clone(), value.clone());
            } else if let Some(child) = self.children.get(field) {
                sets.push(child.filter(value).await?);
            } else {
                return Err(Error::invalid_filter_key(&self.name, field));
            }
        }

        if let Some(table) = self.table.as_ref().filter(|_| !own.is_empty()) {
            let query = Query::new().distinct().fields([&self.key]).filter(own);
            let ids = table
                .select(&query)
                .await?
                .into_iter()
                .filter_map(|mut row| row.swap_remove(&self.key))
                .collect();
            sets.insert(0, self.lineage.resolve(ids).await?);
        }

        Ok(lineage::intersect(sets))
    }

    /// Queue the fields present in `value` for `id`. Nested containers are
    /// replaced as a whole.
    pub async fn set(
        &self,
        id: &Value,
        value: &Value,
        batch: &mut Transaction,
    ) -> Result<Option<Revision>> {
        self.write(id, value, true, batch).await
    }

    /// Like [`set`](Self::set), but nested containers keep elements the
    /// value does not mention.
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
        let values = match value {
            Value::Null => {
                let old = self.delete(id, batch).await?;
                return Ok(old.map(|old| Revision::changed(old, Value::Null)));
            }
            Value::Map(values) => values,
            other => return Err(err!("`{}` expects a record, got {other:?}", self.name)),
        };

        if let Some(field) = values
            .keys()
            .find(|field| !self.columns.contains(field) && !self.children.contains_key(*field))
        {
            return Err(err!("`{}` has no field `{field}`", self.name));
        }

        let mut fields = IndexMap::new();

        // whether the record is known to be new; records with a table are
        // only known to be new once their row was looked up and not found
        let mut fresh = self.table.is_none();

        if let Some(table) = &self.table {
            let present: Row = self
                .columns
                .iter()
                .filter_map(|column| {
                    let value = values.get(column)?;
                    Some((column.clone(), table.normalize(column, value)))
                })
                .collect();

            if !present.is_empty() {
                match self.row(table, id).await? {
                    None => {
                        fresh = true;
                        let mut insert = Row::from_iter([(self.key.clone(), id.clone())]);
                        insert.extend(present.clone());
                        batch.insert(table, &insert, &Conflict::Error)?;

                        for (column, value) in present.into_iter().filter(|(_, v)| !v.is_null()) {
                            fields.insert(column, Revision::changed(Value::Null, value));
                        }
                    }
                    Some(current) => {
                        let mut changes = Row::new();
                        for (column, value) in present {
                            let old = current.get(&column).cloned().unwrap_or_default();
                            if old != value {
                                changes.insert(column.clone(), value.clone());
                                fields.insert(column, Revision::changed(old, value));
                            }
                        }
                        batch.update(table, &changes, &self.key_filter(id))?;
                    }
                }
            }
        }

        for (field, child) in &self.children {
            let Some(value) = values.get(field) else {
                continue;
            };
            let revision = if replace {
                child.set(id, value, batch).await?
            } else {
                child.update(id, value, batch).await?
            };
            if let Some(revision) = revision {
                fields.insert(field.clone(), revision);
            }
        }

        Ok(Revision::collapse(
            fields,
            self.columns.len() + self.children.len(),
            fresh,
        ))
    }

    /// Queue removal of the record under `id`, returning it.
    pub async fn delete(&self, id: &Value, batch: &mut Transaction) -> Result<Option<Value>> {
        let mut old = Row::new();

        if let Some(table) = &self.table {
            if let Some(row) = self.row(table, id).await? {
                old.extend(row);
                batch.delete(table, &self.key_filter(id))?;
            }
        }

        for (field, child) in &self.children {
            if let Some(value) = child.delete(id, batch).await? {
                old.insert(field.clone(), value);
            }
        }

        Ok((!old.is_empty()).then_some(Value::Map(old)))
    }

    /// The scalar fields stored for `id`, without nulls.
    async fn row(&self, table: &Table, id: &Value) -> Result<Option<Row>> {
        let query = Query::new()
            .fields(&self.columns)
            .filter(self.key_filter(id))
            .limit(1);

        Ok(table.select(&query).await?.into_iter().next().map(|row| {
            row.into_iter()
                .filter(|(_, value)| !value.is_null())
                .collect()
        }))
    }

    fn key_filter(&self, id: &Value) -> Row {
        Row::from_iter([(self.key.clone(), id.clone())])
    }
}
