use super::*;

#[derive(Debug, Clone, PartialEq)]
pub struct Select {
    pub distinct: bool,

    /// Selected columns. Empty selects every column.
    pub fields: Vec<String>,

    pub from: Name,
    pub filter: Option<Expr>,
    pub group_by: Vec<String>,
    pub order_by: Vec<(String, Direction)>,
    pub limit: Option<Limit>,
}

/// `LIMIT max` or `LIMIT start, max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit {
    pub start: Option<u64>,
    pub max: u64,
}

impl Select {
    pub fn new(from: Name) -> Select {
        Select {
            distinct: false,
            fields: vec![],
            from,
            filter: None,
            group_by: vec![],
            order_by: vec![],
            limit: None,
        }
    }
}

impl Limit {
    pub fn max(max: u64) -> Limit {
        Limit { start: None, max }
    }

    pub fn range(start: u64, max: u64) -> Limit {
        Limit {
            start: Some(start),
            max,
        }
    }
}

impl From<Select> for Statement {
    fn from(value: Select) -> Self {
        Self::Select(value)
    }
}
