use crate::Db;

use tabula_driver_sqlite::Sqlite;

/// A database with one in-memory SQLite host registered as the default.
pub(crate) fn sqlite() -> Db {
    Db::builder()
        .driver("_", Sqlite::in_memory().unwrap())
        .build()
        .unwrap()
}
