mod value;

use mysql_async::{prelude::Queryable, Conn, Pool};
use tabula_core::{
    async_trait,
    driver::{Driver, Flavor, Operation, Response},
    Error, Result, Row,
};
use url::Url;

/// MySQL backend over a `mysql_async` connection pool.
#[derive(Debug)]
pub struct MySQL {
    pool: Pool,
}

impl MySQL {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let url_str = url.into();
        let url = Url::parse(&url_str).map_err(Error::driver)?;

        if url.scheme() != "mysql" {
            return Err(Error::from_args(format_args!(
                "connection url does not have a `mysql` scheme; url={url}"
            )));
        }

        if url.host_str().is_none() {
            return Err(Error::from_args(format_args!(
                "missing host in connection URL; url={url}"
            )));
        }

        let opts = mysql_async::Opts::from_url(url.as_ref()).map_err(Error::driver)?;
        let opts = mysql_async::OptsBuilder::from_opts(opts).client_found_rows(true);

        Ok(Self {
            pool: Pool::new(opts),
        })
    }

    async fn conn(&self) -> Result<Conn> {
        self.pool.get_conn().await.map_err(Error::driver)
    }
}

impl From<Pool> for MySQL {
    fn from(pool: Pool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Driver for MySQL {
    fn flavor(&self) -> Flavor {
        Flavor::Mysql
    }

    async fn exec(&self, op: Operation) -> Result<Response> {
        let mut conn = self.conn().await?;

        match op {
            Operation::Execute(sql) => {
                conn.query_drop(sql).await.map_err(Error::driver)?;
                Ok(Response::count(conn.affected_rows()))
            }
            Operation::Query(sql) => Ok(Response::values(query(&mut conn, &sql).await?)),
            Operation::Insert(sql) => {
                conn.query_drop(sql).await.map_err(Error::driver)?;
                let key = conn.last_insert_id().unwrap_or_default();
                Ok(Response::key(key as i64))
            }
            Operation::Session(statements) => {
                let mut rows = vec![];
                for sql in &statements {
                    rows = query(&mut conn, sql).await?;
                }
                Ok(Response::values(rows))
            }
            Operation::Transaction(transaction) => {
                conn.query_drop("START TRANSACTION")
                    .await
                    .map_err(Error::driver)?;

                let mut count = 0;
                for sql in &transaction.statements {
                    if let Err(err) = conn.query_drop(sql).await {
                        conn.query_drop("ROLLBACK").await.map_err(Error::driver)?;
                        return Err(Error::driver(err));
                    }
                    count += conn.affected_rows();
                }

                conn.query_drop("COMMIT").await.map_err(Error::driver)?;
                Ok(Response::count(count))
            }
            Operation::NewIdentifier => {
                let id: Option<String> = conn
                    .query_first("SELECT UUID()")
                    .await
                    .map_err(Error::driver)?;
                match id {
                    Some(id) => Ok(Response::key(id)),
                    None => Err(Error::invalid_result("UUID() returned no row")),
                }
            }
        }
    }
}

async fn query(conn: &mut Conn, sql: &str) -> Result<Vec<Row>> {
    let rows: Vec<mysql_async::Row> = conn.query(sql).await.map_err(Error::driver)?;

    let mut ret = Vec::with_capacity(rows.len());
    for row in rows {
        let columns = row.columns();
        let values = row.unwrap();

        let record = columns
            .iter()
            .zip(values)
            .map(|(column, value)| (column.name_str().into_owned(), value::from_sql(value)))
            .collect();
        ret.push(record);
    }

    Ok(ret)
}
