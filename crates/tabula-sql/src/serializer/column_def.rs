use super::{Formatter, Ident, ToSql};

use crate::stmt;

use tabula_core::driver::Flavor;

impl ToSql for &stmt::ColumnDef {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let name = Ident(&self.name);

        // SQLite only auto-increments an inline `INTEGER PRIMARY KEY`
        if self.auto_increment && f.serializer.flavor.is_sqlite() {
            fmt!(f, name " INTEGER PRIMARY KEY AUTOINCREMENT");
            return;
        }

        let ty = &self.ty;
        fmt!(f, name " " ty);

        match &self.opts {
            Some(opts) => fmt!(f, " " opts),
            None if self.nullable => fmt!(f, " NULL"),
            None => fmt!(f, " NOT NULL"),
        }

        if self.auto_increment && f.serializer.flavor == Flavor::Mysql {
            fmt!(f, " auto_increment");
        }
    }
}
