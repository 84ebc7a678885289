use crate::{table::Conflict, Db, Result, Row, Table, Value};

use tabula_core::driver::{operation, Operation};

use indexmap::IndexMap;

/// Statements queued by one logical write.
///
/// Mappers only queue; nothing reaches a backend until [`execute`] runs the
/// whole batch inside one backend transaction per host.
///
/// [`execute`]: Transaction::execute
#[derive(Debug, Default)]
pub struct Transaction {
    entries: Vec<Entry>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub host: String,
    pub table: String,
    pub action: Action,
    pub sql: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Insert,
    Update,
    Delete,
    Revision,
    Raw,
}

impl Transaction {
    pub fn new() -> Transaction {
        Transaction::default()
    }

    pub fn insert(&mut self, table: &Table, values: &Row, conflict: &Conflict) -> Result<()> {
        let sql = table.insert_statement(values, conflict)?;
        self.push(table, Action::Insert, sql);
        Ok(())
    }

    pub fn update(&mut self, table: &Table, values: &Row, filter: &Row) -> Result<()> {
        if values.is_empty() {
            return Ok(());
        }
        let sql = table.update_statement(values, filter)?;
        self.push(table, Action::Update, sql);
        Ok(())
    }

    pub fn delete(&mut self, table: &Table, filter: &Row) -> Result<()> {
        let sql = table.delete_statement(filter)?;
        self.push(table, Action::Delete, sql);
        Ok(())
    }

    /// Queue a revision row for the record keyed by `key`.
    pub fn revision(&mut self, table: &Table, key: &Value, items: &Row) -> Result<()> {
        let sql = table.revision_statement(key, items)?;
        self.push(table, Action::Revision, sql);
        Ok(())
    }

    /// Queue a statement built outside the gateway.
    pub fn raw(&mut self, table: &Table, sql: impl Into<String>) {
        self.push(table, Action::Raw, sql.into());
    }

    pub fn extend(&mut self, other: Transaction) {
        self.entries.extend(other.entries);
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run every queued statement, in queue order, returning the number of
    /// statements executed.
    ///
    /// Statements for one host commit or roll back together. A batch that
    /// spans several hosts runs one transaction per host, in the order the
    /// hosts were first used, and is not atomic across them.
    pub async fn execute(self, db: &Db) -> Result<u64> {
        if self.entries.is_empty() {
            return Ok(0);
        }

        let mut by_host: IndexMap<String, Vec<String>> = IndexMap::new();
        for entry in self.entries {
            by_host.entry(entry.host).or_default().push(entry.sql);
        }

        let mut executed = 0;
        for (host, statements) in by_host {
            let count = statements.len();
            tracing::debug!(host = %host, statements = count, "commit batch");

            let op = Operation::Transaction(operation::Transaction { statements });
            if let Err(err) = db.exec(&host, op).await {
                tracing::warn!(host = %host, %err, "batch rolled back");
                return Err(err);
            }
            executed += count as u64;
        }

        Ok(executed)
    }

    fn push(&mut self, table: &Table, action: Action, sql: String) {
        self.entries.push(Entry {
            host: table.host().to_string(),
            table: table.name().to_string(),
            action,
            sql,
        });
    }
}
