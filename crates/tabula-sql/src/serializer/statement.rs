use super::{Comma, Formatter, Ident, ToSql};

use crate::stmt::{self, Direction, OnConflict, Statement};

use tabula_core::driver::Flavor;

struct Assignment<'a>(&'a str, &'a stmt::Expr);

struct Where<'a>(&'a Option<stmt::Expr>);

struct OrderBy<'a>(&'a str, Direction);

impl ToSql for &Statement {
    fn to_sql(self, f: &mut Formatter<'_>) {
        match self {
            Statement::CreateIndex(stmt) => stmt.to_sql(f),
            Statement::CreateTable(stmt) => stmt.to_sql(f),
            Statement::Delete(stmt) => stmt.to_sql(f),
            Statement::DropTable(stmt) => stmt.to_sql(f),
            Statement::Insert(stmt) => stmt.to_sql(f),
            Statement::Select(stmt) => stmt.to_sql(f),
            Statement::Update(stmt) => stmt.to_sql(f),
        }
    }
}

impl ToSql for &stmt::DropTable {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let if_exists = if self.if_exists { "IF EXISTS " } else { "" };
        let name = &self.name;

        fmt!(f, "DROP TABLE " if_exists name);
    }
}

impl ToSql for &stmt::Insert {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let flavor = f.serializer.flavor;
        let ignore = match (&self.on_conflict, flavor) {
            (OnConflict::Ignore, Flavor::Mysql) => "INSERT IGNORE INTO ",
            (OnConflict::Ignore, Flavor::Sqlite) => "INSERT OR IGNORE INTO ",
            _ => "INSERT INTO ",
        };
        let into = &self.into;

        fmt!(f, ignore into);

        if self.columns.is_empty() && flavor.is_sqlite() {
            fmt!(f, " DEFAULT VALUES");
        } else {
            let columns = Comma(self.columns.iter().map(Ident));
            let values = Comma(&self.values);
            fmt!(f, " (" columns ") VALUES (" values ")");
        }

        let OnConflict::Update(fields) = &self.on_conflict else {
            return;
        };

        match flavor {
            Flavor::Mysql => {
                let assignments = Comma(
                    fields
                        .iter()
                        .map(|field| (Ident(field), " = VALUES(", Ident(field), ")")),
                );
                fmt!(f, " ON DUPLICATE KEY UPDATE " assignments);
            }
            Flavor::Sqlite => {
                let assignments = Comma(
                    fields
                        .iter()
                        .map(|field| (Ident(field), " = excluded.", Ident(field))),
                );
                fmt!(f, " ON CONFLICT DO UPDATE SET " assignments);
            }
        }
    }
}

impl ToSql for &stmt::Update {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let table = &self.table;
        let assignments = Comma(
            self.assignments
                .iter()
                .map(|(column, value)| Assignment(column, value)),
        );

        fmt!(f, "UPDATE " table " SET " assignments Where(&self.filter));
    }
}

impl ToSql for &stmt::Delete {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let from = &self.from;

        fmt!(f, "DELETE FROM " from Where(&self.filter));
    }
}

impl ToSql for &stmt::Select {
    fn to_sql(self, f: &mut Formatter<'_>) {
        fmt!(f, "SELECT ");

        if self.distinct {
            fmt!(f, "DISTINCT ");
        }

        if self.fields.is_empty() {
            fmt!(f, "*");
        } else {
            fmt!(f, Comma(self.fields.iter().map(Ident)));
        }

        let from = &self.from;
        fmt!(f, " FROM " from Where(&self.filter));

        if !self.group_by.is_empty() {
            fmt!(f, " GROUP BY " Comma(self.group_by.iter().map(Ident)));
        }

        if !self.order_by.is_empty() {
            let order_by = Comma(
                self.order_by
                    .iter()
                    .map(|(column, direction)| OrderBy(column, *direction)),
            );
            fmt!(f, " ORDER BY " order_by);
        }

        match self.limit {
            Some(stmt::Limit {
                start: Some(start),
                max,
            }) => fmt!(f, " LIMIT " start ", " max),
            Some(stmt::Limit { start: None, max }) => fmt!(f, " LIMIT " max),
            None => {}
        }
    }
}

impl ToSql for Assignment<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let Assignment(column, value) = self;
        fmt!(f, Ident(column) " = " value);
    }
}

impl ToSql for Where<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        if let Some(filter) = self.0 {
            fmt!(f, " WHERE " filter);
        }
    }
}

impl ToSql for OrderBy<'_> {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let direction = match self.1 {
            Direction::Asc => " ASC",
            Direction::Desc => " DESC",
        };
        fmt!(f, Ident(self.0) direction);
    }
}

impl<A: ToSql, B: ToSql, C: ToSql> ToSql for (A, B, C) {
    fn to_sql(self, f: &mut Formatter<'_>) {
        fmt!(f, self.0 self.1 self.2);
    }
}

impl<A: ToSql, B: ToSql, C: ToSql, D: ToSql> ToSql for (A, B, C, D) {
    fn to_sql(self, f: &mut Formatter<'_>) {
        fmt!(f, self.0 self.1 self.2 self.3);
    }
}
