mod exec_log;
pub use exec_log::ExecLog;

mod logging_driver;
pub use logging_driver::{DriverOp, LoggingDriver};

pub use tabula::Value;

use tabula::Db;
use tabula_driver_sqlite::Sqlite;

/// A database whose default host is a fresh in-memory SQLite wrapped in a
/// [`LoggingDriver`], together with the handle to its log.
pub fn setup() -> (Db, ExecLog) {
    let _ = env_logger::builder().is_test(true).try_init();

    let driver = LoggingDriver::new(Sqlite::in_memory().unwrap());
    let log = driver.exec_log();
    let db = Db::builder().driver("_", driver).build().unwrap();
    (db, log)
}

/// Build a [`Value`] from a JSON literal.
#[macro_export]
macro_rules! value {
    ($($json:tt)+) => {
        $crate::Value::from(::serde_json::json!($($json)+))
    };
}

/// Drop the `_id` fields row-backed record elements carry, recursively.
pub fn strip_ids(value: Value) -> Value {
    match value {
        Value::List(items) => Value::List(items.into_iter().map(strip_ids).collect()),
        Value::Map(row) => Value::Map(
            row.into_iter()
                .filter(|(name, _)| name != "_id")
                .map(|(name, value)| (name, strip_ids(value)))
                .collect(),
        ),
        other => other,
    }
}
