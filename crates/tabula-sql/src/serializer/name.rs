use super::{Formatter, Ident, Period, ToSql};

use crate::stmt;

use tabula_core::driver::Flavor;

impl ToSql for &stmt::Name {
    fn to_sql(self, f: &mut Formatter<'_>) {
        match f.serializer.flavor {
            Flavor::Mysql => {
                let parts = Period(self.0.iter().map(Ident));
                fmt!(f, parts);
            }
            // one database per connection
            Flavor::Sqlite => fmt!(f, Ident(self.table())),
        }
    }
}
