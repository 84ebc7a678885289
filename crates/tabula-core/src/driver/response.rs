use crate::{Error, Result, Row, Value};

#[derive(Debug)]
pub struct Response {
    pub rows: Rows,
}

#[derive(Debug)]
pub enum Rows {
    /// Number of rows impacted by the operation
    Count(u64),

    /// Rows returned by a query
    Values(Vec<Row>),

    /// A key generated by the backend
    Key(Value),
}

impl Response {
    pub fn count(count: u64) -> Response {
        Response {
            rows: Rows::Count(count),
        }
    }

    pub fn values(rows: Vec<Row>) -> Response {
        Response {
            rows: Rows::Values(rows),
        }
    }

    pub fn key(key: impl Into<Value>) -> Response {
        Response {
            rows: Rows::Key(key.into()),
        }
    }

    pub fn into_count(self) -> Result<u64> {
        match self.rows {
            Rows::Count(count) => Ok(count),
            other => Err(Error::invalid_result(format!(
                "expected a row count, got {other:?}"
            ))),
        }
    }

    pub fn into_values(self) -> Result<Vec<Row>> {
        match self.rows {
            Rows::Values(rows) => Ok(rows),
            other => Err(Error::invalid_result(format!(
                "expected rows, got {other:?}"
            ))),
        }
    }

    pub fn into_key(self) -> Result<Value> {
        match self.rows {
            Rows::Key(key) => Ok(key),
            other => Err(Error::invalid_result(format!(
                "expected a generated key, got {other:?}"
            ))),
        }
    }
}

impl Rows {
    pub fn is_count(&self) -> bool {
        matches!(self, Rows::Count(_))
    }

    pub fn is_values(&self) -> bool {
        matches!(self, Rows::Values(_))
    }
}
