mod builder;
pub use builder::Builder;

mod connect;

use tabula_core::{
    driver::{Driver, Flavor, Operation, Response},
    Error, Result, Row, Value,
};
use tabula_sql::codec;

use indexmap::IndexMap;
use std::sync::Arc;

/// Registry of named backend hosts.
///
/// Every table names the host its statements run on. `Db` is cheap to clone
/// and immutable once built.
#[derive(Debug, Clone)]
pub struct Db {
    hosts: Arc<IndexMap<String, Arc<dyn Driver>>>,
}

impl Db {
    pub fn builder() -> Builder {
        Builder::default()
    }

    /// The driver registered for `host`.
    pub fn driver(&self, host: &str) -> Result<&Arc<dyn Driver>> {
        self.hosts.get(host).ok_or_else(|| Error::unknown_host(host))
    }

    pub fn flavor(&self, host: &str) -> Result<Flavor> {
        Ok(self.driver(host)?.flavor())
    }

    pub fn hosts(&self) -> impl Iterator<Item = &str> {
        self.hosts.keys().map(String::as_str)
    }

    /// Run a statement, returning the number of affected rows.
    pub async fn execute(&self, sql: impl Into<String>, host: &str) -> Result<u64> {
        self.exec(host, Operation::Execute(sql.into()))
            .await?
            .into_count()
    }

    /// Run a query, returning its rows.
    pub async fn query(&self, sql: impl Into<String>, host: &str) -> Result<Vec<Row>> {
        self.exec(host, Operation::Query(sql.into()))
            .await?
            .into_values()
    }

    /// Run an insert, returning the key the backend generated.
    pub async fn insert(&self, sql: impl Into<String>, host: &str) -> Result<Value> {
        self.exec(host, Operation::Insert(sql.into()))
            .await?
            .into_key()
    }

    /// A fresh row identifier from the backend.
    pub async fn new_identifier(&self, host: &str) -> Result<String> {
        match self.exec(host, Operation::NewIdentifier).await?.into_key()? {
            Value::String(id) => Ok(id),
            other => other
                .key_string()
                .ok_or_else(|| Error::invalid_result(format!("bad identifier {other:?}"))),
        }
    }

    /// Escape `value` for a single-quoted literal on `host`.
    pub fn escape(&self, value: &str, host: &str) -> Result<String> {
        Ok(codec::escape_string(self.flavor(host)?, value))
    }

    pub(crate) async fn exec(&self, host: &str, op: Operation) -> Result<Response> {
        let driver = self.driver(host)?;
        tracing::debug!(host, ?op, "exec");
        driver.exec(op).await
    }
}
