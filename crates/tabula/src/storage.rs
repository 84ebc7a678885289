use crate::{
    cache::{Cache, Cached},
    mapper::ParentMapper,
    Db, Query, Record, Result, Revision, Row, Transaction, Value,
};

use std::sync::Arc;
use tabula_core::schema::db::{Revisions, TableSpec};

/// Top-level access to the records of one schema.
///
/// Records are addressed by string identifiers. Every write runs as one
/// batch through the root [`ParentMapper`] and, when the root table keeps
/// revisions, appends the revision row in the same batch.
#[derive(Debug)]
pub struct Storage {
    db: Db,
    name: String,
    root: ParentMapper,
    cache: Option<Arc<dyn Cache>>,
}

impl Storage {
    pub fn new(db: &Db, name: &str, record: &Record) -> Result<Storage> {
        Ok(Storage {
            db: db.clone(),
            name: name.to_string(),
            root: ParentMapper::root(db, name, record)?,
            cache: None,
        })
    }

    pub fn with_cache(mut self, cache: impl Cache) -> Storage {
        self.cache = Some(Arc::new(cache));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &ParentMapper {
        &self.root
    }

    pub async fn install(&self) -> Result<()> {
        self.root.install().await
    }

    pub async fn uninstall(&self) -> Result<()> {
        self.root.uninstall().await
    }

    /// A fresh identifier from the root table's host.
    pub async fn uuid(&self) -> Result<String> {
        match self.root.table() {
            Some(table) => table.new_identifier().await,
            None => self.db.new_identifier(TableSpec::DEFAULT_HOST).await,
        }
    }

    /// Store a new record, returning its identifier.
    ///
    /// The identifier is taken from the record's key field when present,
    /// otherwise generated.
    pub async fn add(&self, mut value: Row, revision_info: &Row) -> Result<String> {
        let id = match value
            .shift_remove(self.root.key())
            .as_ref()
            .and_then(Value::key_string)
        {
            Some(id) => id,
            None => self.uuid().await?,
        };
        let key = Value::from(&id);

        let mut batch = Transaction::new();
        let value = Value::Map(value);
        self.root.set(&key, &value, &mut batch).await?;
        self.queue_revision(
            &key,
            &Revision::changed(Value::Null, value),
            revision_info,
            &mut batch,
        )?;
        batch.execute(&self.db).await?;
        tracing::debug!(storage = %self.name, %id, "add");

        self.refresh(&id).await?;
        Ok(id)
    }

    /// The record stored under `id`.
    pub async fn fetch(&self, id: &str) -> Result<Option<Row>> {
        let mut records = self.fetch_many(&[id.to_string()]).await?;
        Ok(records.pop().flatten())
    }

    /// The records stored under `ids`, in the same order, `None` for ids
    /// with no record.
    pub async fn fetch_many(&self, ids: &[String]) -> Result<Vec<Option<Row>>> {
        let cached = match &self.cache {
            Some(cache) => cache.fetch(ids).await?,
            None => vec![Cached::Unknown; ids.len()],
        };

        let mut records = Vec::with_capacity(ids.len());
        let mut missing = vec![];
        for (id, cached) in ids.iter().zip(cached) {
            let record = match cached {
                Cached::Hit(record) => Some(record),
                Cached::Missing => None,
                Cached::Unknown => {
                    let record = self.root.get(&Value::from(id)).await?.into_map();
                    match (&self.cache, &record) {
                        (Some(cache), Some(record)) => cache.store(id, record).await?,
                        (Some(_), None) => missing.push(id.clone()),
                        (None, _) => {}
                    }
                    record
                }
            };
            records.push(record);
        }

        if let (Some(cache), false) = (&self.cache, missing.is_empty()) {
            cache.mark_missing(&missing).await?;
        }

        Ok(records)
    }

    /// Whether anything is stored under `id`. A record written with only
    /// nested fields has no root row, so a missing row falls back to a
    /// full read.
    pub async fn exists(&self, id: &str) -> Result<bool> {
        if let Some(table) = self.root.table() {
            let query = Query::new()
                .fields([self.root.key()])
                .eq(self.root.key(), id)
                .limit(1);
            if !table.select(&query).await?.is_empty() {
                return Ok(true);
            }
        }

        Ok(!self.root.get(&Value::from(id)).await?.is_empty())
    }

    /// Identifiers of the records matching every criterion.
    pub async fn filter(&self, criteria: &Row) -> Result<Vec<String>> {
        Ok(self
            .root
            .filter(&Value::Map(criteria.clone()))
            .await?
            .iter()
            .filter_map(Value::key_string)
            .collect())
    }

    /// Write `value` to the record under `id`, returning what changed.
    ///
    /// `replace` overwrites nested lists and maps as a whole; otherwise
    /// record elements not mentioned in `value` are kept.
    pub async fn save(
        &self,
        id: &str,
        value: &Row,
        replace: bool,
        revision_info: &Row,
    ) -> Result<Option<Revision>> {
        if value.is_empty() {
            return Ok(None);
        }

        let key = Value::from(id);
        let value = Value::Map(value.clone());
        let mut batch = Transaction::new();
        let revision = if replace {
            self.root.set(&key, &value, &mut batch).await?
        } else {
            self.root.update(&key, &value, &mut batch).await?
        };

        if let Some(revision) = &revision {
            self.queue_revision(&key, revision, revision_info, &mut batch)?;
        }
        batch.execute(&self.db).await?;
        tracing::debug!(storage = %self.name, %id, changed = revision.is_some(), "save");

        if revision.is_some() {
            self.refresh(id).await?;
        }
        Ok(revision)
    }

    /// Delete the record under `id`, returning it.
    pub async fn remove(&self, id: &str, revision_info: &Row) -> Result<Option<Row>> {
        let key = Value::from(id);
        let mut batch = Transaction::new();
        let old = self.root.delete(&key, &mut batch).await?;

        if let Some(old) = &old {
            self.queue_revision(
                &key,
                &Revision::changed(old.clone(), Value::Null),
                revision_info,
                &mut batch,
            )?;
            batch.execute(&self.db).await?;
            tracing::debug!(storage = %self.name, %id, "remove");
        }

        if let Some(cache) = &self.cache {
            cache.mark_missing(&[id.to_string()]).await?;
        }
        Ok(old.and_then(Value::into_map))
    }

    /// Append a revision row for `id` outside of any write.
    pub async fn revision_add(&self, id: &str, items: &Row) -> Result<()> {
        match self.root.table() {
            Some(table) => table.add_revision(&Value::from(id), items).await,
            None => Err(crate::Error::revisions_disabled(self.root.name())),
        }
    }

    fn queue_revision(
        &self,
        key: &Value,
        revision: &Revision,
        revision_info: &Row,
        batch: &mut Transaction,
    ) -> Result<()> {
        let Some(table) = self.root.table().filter(|t| t.spec().revisions_enabled()) else {
            return Ok(());
        };

        let mut items = revision.to_row();
        if let Revisions::Required(fields) = &table.spec().revisions {
            for field in fields {
                if let Some(value) = revision_info.get(field) {
                    items.insert(field.clone(), value.clone());
                }
            }
        }
        batch.revision(table, key, &items)
    }

    async fn refresh(&self, id: &str) -> Result<()> {
        let Some(cache) = &self.cache else {
            return Ok(());
        };
        match self.root.get(&Value::from(id)).await?.into_map() {
            Some(record) => cache.store(id, &record).await,
            None => cache.mark_missing(&[id.to_string()]).await,
        }
    }
}
