pub mod cache;
pub use cache::{Cache, Cached};

pub mod db;
pub use db::Db;

pub mod mapper;
pub use mapper::{LeveledMapper, Mapper, ParentMapper};

mod revision;
pub use revision::Revision;

mod storage;
pub use storage::Storage;

pub mod table;
pub use table::{Conflict, Query, Table};

mod transaction;
pub use transaction::Transaction;

pub use tabula_core::{
    bail, err,
    schema::{self, Kind, Leaf, Node, Record},
    Error, Literal, Result, Row, Value,
};

#[cfg(test)]
mod test_util;
