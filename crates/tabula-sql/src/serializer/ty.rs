use super::{Comma, Formatter, ToSql};

use crate::codec;

use tabula_core::{driver::Flavor, schema::db::Type};

impl ToSql for &Type {
    fn to_sql(self, f: &mut Formatter<'_>) {
        match f.serializer.flavor {
            Flavor::Mysql => mysql(self, f),
            Flavor::Sqlite => sqlite(self, f),
        }
    }
}

fn mysql(ty: &Type, f: &mut Formatter<'_>) {
    match ty {
        Type::Boolean => fmt!(f, "tinyint(1) unsigned"),
        Type::Integer => fmt!(f, "integer"),
        Type::UnsignedInteger => fmt!(f, "integer unsigned"),
        Type::Char(n) => fmt!(f, "char(" n ")"),
        Type::VarChar(n) => fmt!(f, "varchar(" n ")"),
        Type::Text => fmt!(f, "text"),
        Type::MediumText => fmt!(f, "mediumtext"),
        Type::LongText => fmt!(f, "longtext"),
        Type::Enum(options) => {
            let flavor = f.serializer.flavor;
            let options: Vec<String> = options
                .iter()
                .map(|option| codec::quote(flavor, option))
                .collect();
            fmt!(f, "enum(" Comma(&options) ")")
        }
        Type::Decimal(None) => fmt!(f, "decimal"),
        Type::Decimal(Some((precision, scale))) => {
            fmt!(f, "decimal(" precision "," scale ")")
        }
        Type::Double => fmt!(f, "double"),
        Type::Date => fmt!(f, "date"),
        Type::DateTime => fmt!(f, "datetime"),
        Type::Time => fmt!(f, "time"),
        Type::Timestamp => fmt!(f, "timestamp"),
        Type::Custom(custom) => fmt!(f, custom),
    }
}

/// SQLite only keeps a type affinity, so lengths are informational and
/// enumerations become plain text.
fn sqlite(ty: &Type, f: &mut Formatter<'_>) {
    match ty {
        Type::Boolean => fmt!(f, "boolean"),
        Type::Integer => fmt!(f, "integer"),
        Type::UnsignedInteger => fmt!(f, "integer unsigned"),
        Type::Char(n) => fmt!(f, "char(" n ")"),
        Type::VarChar(n) => fmt!(f, "varchar(" n ")"),
        Type::Text | Type::MediumText | Type::LongText | Type::Enum(_) => fmt!(f, "text"),
        Type::Decimal(None) => fmt!(f, "decimal"),
        Type::Decimal(Some((precision, scale))) => {
            fmt!(f, "decimal(" precision "," scale ")")
        }
        Type::Double => fmt!(f, "double"),
        Type::Date => fmt!(f, "date"),
        Type::DateTime => fmt!(f, "datetime"),
        Type::Time => fmt!(f, "time"),
        Type::Timestamp => fmt!(f, "timestamp"),
        Type::Custom(custom) => fmt!(f, custom),
    }
}
