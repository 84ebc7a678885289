use crate::{Error, Result};

use std::{fmt, str::FromStr};

/// The primitive kind of a [`Leaf`](super::Leaf).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Any value at all. Can not be stored in a column.
    Any,
    Base64,
    Bool,
    Date,
    Datetime,
    Decimal,
    Float,
    Int,
    Ip,
    Json,
    Md5,
    Price,
    String,
    Time,
    Timestamp,
    Uint,
    Uuid,
    Uuid4,
}

impl Kind {
    pub fn name(self) -> &'static str {
        match self {
            Kind::Any => "any",
            Kind::Base64 => "base64",
            Kind::Bool => "bool",
            Kind::Date => "date",
            Kind::Datetime => "datetime",
            Kind::Decimal => "decimal",
            Kind::Float => "float",
            Kind::Int => "int",
            Kind::Ip => "ip",
            Kind::Json => "json",
            Kind::Md5 => "md5",
            Kind::Price => "price",
            Kind::String => "string",
            Kind::Time => "time",
            Kind::Timestamp => "timestamp",
            Kind::Uint => "uint",
            Kind::Uuid => "uuid",
            Kind::Uuid4 => "uuid4",
        }
    }

    /// Kinds whose values are whole numbers.
    pub fn is_integer(self) -> bool {
        matches!(self, Kind::Int | Kind::Uint)
    }

    /// Kinds whose values are decimal or floating point numbers.
    pub fn is_real(self) -> bool {
        matches!(self, Kind::Decimal | Kind::Float | Kind::Price)
    }
}

impl FromStr for Kind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Kind> {
        Ok(match s {
            "any" => Kind::Any,
            "base64" => Kind::Base64,
            "bool" => Kind::Bool,
            "date" => Kind::Date,
            "datetime" => Kind::Datetime,
            "decimal" => Kind::Decimal,
            "float" => Kind::Float,
            "int" => Kind::Int,
            "ip" => Kind::Ip,
            "json" => Kind::Json,
            "md5" => Kind::Md5,
            "price" => Kind::Price,
            "string" => Kind::String,
            "time" => Kind::Time,
            "timestamp" => Kind::Timestamp,
            "uint" => Kind::Uint,
            "uuid" => Kind::Uuid,
            "uuid4" => Kind::Uuid4,
            _ => return Err(Error::invalid_schema(format!("unknown leaf type `{s}`"))),
        })
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
