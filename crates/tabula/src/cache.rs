//! The seam a record cache plugs into.
//!
//! [`Storage`](crate::Storage) consults the cache before the mapper tree and
//! fills it after reads and writes. No implementation ships with the crate.

use crate::{Result, Row};

use async_trait::async_trait;
use std::fmt::Debug;

/// What a cache knows about one identifier.
#[derive(Debug, Clone, PartialEq)]
pub enum Cached {
    Hit(Row),

    /// The record is known not to exist.
    Missing,

    /// The cache has no entry.
    Unknown,
}

#[async_trait]
pub trait Cache: Debug + Send + Sync + 'static {
    /// Look up `ids`, answering one entry per id in the same order.
    async fn fetch(&self, ids: &[String]) -> Result<Vec<Cached>>;

    async fn store(&self, id: &str, record: &Row) -> Result<()>;

    /// Remember that `ids` have no record.
    async fn mark_missing(&self, ids: &[String]) -> Result<()>;
}
