use super::*;

use tabula_core::schema::db::Index;

#[derive(Debug, Clone, PartialEq)]
pub struct CreateTable {
    /// Name of the table
    pub name: Name,

    /// Column definitions, primary key first
    pub columns: Vec<ColumnDef>,

    /// Primary key column
    pub primary_key: Option<String>,

    /// Indexes declared inline where the flavor allows it
    pub indexes: Vec<Index>,

    pub engine: String,
    pub charset: String,
    pub collate: String,
}

impl From<CreateTable> for Statement {
    fn from(value: CreateTable) -> Self {
        Self::CreateTable(value)
    }
}
