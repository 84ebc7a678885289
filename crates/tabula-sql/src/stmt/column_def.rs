use tabula_core::schema::db::{self, Column};

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDef {
    pub name: String,
    pub ty: db::Type,
    pub nullable: bool,

    /// Replaces the `NULL` / `NOT NULL` clause.
    pub opts: Option<String>,

    pub primary_key: bool,
    pub auto_increment: bool,
}

impl ColumnDef {
    pub fn from_column(column: &Column) -> ColumnDef {
        ColumnDef {
            name: column.name.clone(),
            ty: column.ty.clone(),
            nullable: column.nullable,
            opts: column.opts.clone(),
            primary_key: false,
            auto_increment: false,
        }
    }
}
