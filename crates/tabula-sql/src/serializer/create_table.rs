use super::{Comma, Formatter, Ident, ToSql};

use crate::stmt;

use tabula_core::{
    driver::Flavor,
    schema::db::{Direction, Index, IndexColumn, IndexKind},
};

struct ColumnsWithConstraints<'a>(&'a stmt::CreateTable);

struct InlineIndex<'a>(&'a Index);

struct IndexedColumn<'a>(&'a IndexColumn);

impl ToSql for &stmt::CreateTable {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let name = &self.name;
        let columns = ColumnsWithConstraints(self);

        fmt!(f, "CREATE TABLE IF NOT EXISTS " name " (" columns ")");

        if f.serializer.flavor == Flavor::Mysql {
            let (engine, charset, collate) = (&self.engine, &self.charset, &self.collate);
            fmt!(
                f,
                " ENGINE=" engine " DEFAULT CHARSET=" charset " COLLATE=" collate
            );
        }
    }
}

impl ToSql for ColumnsWithConstraints<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let stmt = self.0;
        let flavor = f.serializer.flavor;

        fmt!(f, Comma(&stmt.columns));

        let inline_pk = flavor.is_sqlite() && stmt.columns.iter().any(|c| c.auto_increment);
        if let (Some(pk), false) = (&stmt.primary_key, inline_pk) {
            fmt!(f, ", PRIMARY KEY (" Ident(pk) ")");
        }

        for index in &stmt.indexes {
            // Plain SQLite indexes are created by separate statements
            if flavor.is_sqlite() && index.kind != IndexKind::Unique {
                continue;
            }
            fmt!(f, ", " InlineIndex(index));
        }
    }
}

impl ToSql for InlineIndex<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let index = self.0;

        if f.serializer.flavor.is_sqlite() {
            let columns = Comma(index.columns.iter().map(|c| Ident(&c.name)));
            fmt!(f, "UNIQUE (" columns ")");
            return;
        }

        let kind = match index.kind {
            IndexKind::Plain => "INDEX ",
            IndexKind::Unique => "UNIQUE INDEX ",
            IndexKind::Fulltext => "FULLTEXT INDEX ",
            IndexKind::Spatial => "SPATIAL INDEX ",
        };
        let columns = Comma(index.columns.iter().map(IndexedColumn));

        fmt!(f, kind Ident(&index.name) " (" columns ")");
    }
}

impl ToSql for IndexedColumn<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let column = self.0;

        fmt!(f, Ident(&column.name));

        if let (Some(size), Flavor::Mysql) = (column.size, f.serializer.flavor) {
            fmt!(f, "(" size ")");
        }

        match column.order {
            Some(Direction::Asc) => fmt!(f, " ASC"),
            Some(Direction::Desc) => fmt!(f, " DESC"),
            None => {}
        }
    }
}

impl ToSql for &stmt::CreateIndex {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let unique = if self.unique { "UNIQUE " } else { "" };
        let on = &self.on;
        let columns = Comma(self.columns.iter().map(IndexedColumn));

        fmt!(
            f,
            "CREATE " unique "INDEX IF NOT EXISTS " Ident(&self.name) " ON " on " (" columns ")"
        );
    }
}
