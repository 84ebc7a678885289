use crate::{Row, Value};

use tabula_sql::stmt::{Direction, Limit};

/// A select against one [`Table`](super::Table).
///
/// Field and column names are checked against the table when the query is
/// compiled, not when it is built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    pub distinct: bool,

    /// Columns to return; empty selects every column.
    pub fields: Vec<String>,

    /// Criteria in the form accepted by [`Table::select`](super::Table::select).
    pub filter: Row,

    pub group_by: Vec<String>,
    pub order_by: Vec<(String, Direction)>,
    pub limit: Option<Limit>,
}

impl Query {
    pub fn new() -> Query {
        Query::default()
    }

    pub fn distinct(mut self) -> Query {
        self.distinct = true;
        self
    }

    pub fn fields<I, S>(mut self, fields: I) -> Query
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn filter(mut self, filter: Row) -> Query {
        self.filter = filter;
        self
    }

    /// Add one criterion to the filter.
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Query {
        self.filter.insert(field.into(), value.into());
        self
    }

    pub fn group_by<I, S>(mut self, fields: I) -> Query
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.group_by = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Query {
        self.order_by.push((field.into(), direction));
        self
    }

    pub fn limit(mut self, max: u64) -> Query {
        self.limit = Some(Limit::max(max));
        self
    }

    pub fn range(mut self, start: u64, max: u64) -> Query {
        self.limit = Some(Limit::range(start, max));
        self
    }
}
