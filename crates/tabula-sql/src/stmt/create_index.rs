use super::*;

use tabula_core::schema::db::IndexColumn;

/// A standalone `CREATE INDEX`, for flavors that can not declare plain
/// indexes inside `CREATE TABLE`.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateIndex {
    pub name: String,
    pub on: Name,
    pub columns: Vec<IndexColumn>,
    pub unique: bool,
}

impl From<CreateIndex> for Statement {
    fn from(value: CreateIndex) -> Self {
        Self::CreateIndex(value)
    }
}
