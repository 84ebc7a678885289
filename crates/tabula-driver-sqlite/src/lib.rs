mod value;

use rusqlite::Connection;
use std::{
    path::{Path, PathBuf},
    sync::{Mutex, MutexGuard},
};
use tabula_core::{
    async_trait,
    driver::{Driver, Flavor, Operation, Response},
    Error, Result, Row,
};
use url::Url;

/// SQLite backend over a single `rusqlite` connection.
#[derive(Debug)]
pub struct Sqlite {
    location: Location,
    connection: Mutex<Connection>,
}

#[derive(Debug, Clone)]
enum Location {
    File(PathBuf),
    InMemory,
}

impl Sqlite {
    /// Open a database from a `sqlite::memory:` or `sqlite:<path>` URL.
    pub fn new(url: impl Into<String>) -> Result<Sqlite> {
        let url_str = url.into();
        let url = Url::parse(&url_str).map_err(Error::driver)?;

        if url.scheme() != "sqlite" {
            return Err(Error::from_args(format_args!(
                "connection URL does not have a `sqlite` scheme; url={url_str}"
            )));
        }

        if url.path() == ":memory:" {
            Sqlite::in_memory()
        } else {
            Sqlite::open(url.path())
        }
    }

    /// Create an in-memory SQLite database
    pub fn in_memory() -> Result<Sqlite> {
        let connection = Connection::open_in_memory().map_err(Error::driver)?;
        Ok(Sqlite {
            location: Location::InMemory,
            connection: Mutex::new(connection),
        })
    }

    /// Open a SQLite database at the specified file path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Sqlite> {
        let connection = Connection::open(path.as_ref()).map_err(Error::driver)?;
        Ok(Sqlite {
            location: Location::File(path.as_ref().to_path_buf()),
            connection: Mutex::new(connection),
        })
    }

    pub fn url(&self) -> String {
        match &self.location {
            Location::InMemory => "sqlite::memory:".to_string(),
            Location::File(path) => format!("sqlite:{}", path.display()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.connection
            .lock()
            .map_err(|_| Error::from_args(format_args!("sqlite connection poisoned")))
    }
}

#[async_trait]
impl Driver for Sqlite {
    fn flavor(&self) -> Flavor {
        Flavor::Sqlite
    }

    async fn exec(&self, op: Operation) -> Result<Response> {
        let mut connection = self.lock()?;

        match op {
            Operation::Execute(sql) => {
                let count = connection.execute(&sql, []).map_err(Error::driver)?;
                Ok(Response::count(count as u64))
            }
            Operation::Query(sql) => Ok(Response::values(query(&connection, &sql)?)),
            Operation::Insert(sql) => {
                connection.execute(&sql, []).map_err(Error::driver)?;
                Ok(Response::key(connection.last_insert_rowid()))
            }
            Operation::Session(statements) => {
                let mut rows = vec![];
                for sql in &statements {
                    rows = query(&connection, sql)?;
                }
                Ok(Response::values(rows))
            }
            Operation::Transaction(transaction) => {
                // Dropping an uncommitted transaction rolls it back
                let tx = connection.transaction().map_err(Error::driver)?;
                let mut count = 0;
                for sql in &transaction.statements {
                    count += tx.execute(sql, []).map_err(Error::driver)? as u64;
                }
                tx.commit().map_err(Error::driver)?;
                Ok(Response::count(count))
            }
            Operation::NewIdentifier => Ok(Response::key(uuid::Uuid::new_v4().to_string())),
        }
    }
}

fn query(connection: &Connection, sql: &str) -> Result<Vec<Row>> {
    let mut stmt = connection.prepare(sql).map_err(Error::driver)?;
    let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();

    let mut rows = stmt.query([]).map_err(Error::driver)?;
    let mut ret = vec![];

    while let Some(row) = rows.next().map_err(Error::driver)? {
        let mut record = Row::with_capacity(names.len());
        for (index, name) in names.iter().enumerate() {
            let value = row.get_ref(index).map_err(Error::driver)?;
            record.insert(name.clone(), value::from_sql(value));
        }
        ret.push(record);
    }

    Ok(ret)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_core::{driver::operation::Transaction, Value};

    #[tokio::test]
    async fn query_returns_named_columns() {
        let db = Sqlite::new("sqlite::memory:").unwrap();
        db.exec(Operation::Execute(
            "CREATE TABLE t (a integer, b text)".into(),
        ))
        .await
        .unwrap();

        let key = db
            .exec(Operation::Insert("INSERT INTO t (a, b) VALUES (1, 'x')".into()))
            .await
            .unwrap()
            .into_key()
            .unwrap();
        assert_eq!(key, Value::I64(1));

        let rows = db
            .exec(Operation::Query("SELECT a, b FROM t".into()))
            .await
            .unwrap()
            .into_values()
            .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["a"], Value::I64(1));
        assert_eq!(rows[0]["b"], Value::from("x"));
    }

    #[tokio::test]
    async fn failed_transaction_rolls_back() {
        let db = Sqlite::in_memory().unwrap();
        db.exec(Operation::Execute(
            "CREATE TABLE t (a integer PRIMARY KEY)".into(),
        ))
        .await
        .unwrap();

        let res = db
            .exec(
                Transaction::new(vec![
                    "INSERT INTO t (a) VALUES (1)".into(),
                    "INSERT INTO t (a) VALUES (1)".into(),
                ])
                .into(),
            )
            .await;
        assert!(res.unwrap_err().is_driver());

        let rows = db
            .exec(Operation::Query("SELECT * FROM t".into()))
            .await
            .unwrap()
            .into_values()
            .unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn rejects_other_schemes() {
        assert!(Sqlite::new("mysql://localhost/test").is_err());
        assert_eq!(Sqlite::in_memory().unwrap().url(), "sqlite::memory:");
    }
}
