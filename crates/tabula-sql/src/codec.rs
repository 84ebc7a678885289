//! The Value Codec: typed values to SQL literals and back.

use tabula_core::{
    driver::Flavor,
    schema::{db::Column, Kind, Leaf},
    Error, Result, Value,
};

/// Strings accepted as `true` by boolean columns.
const TRUTHY: &[&str] = &[
    "true", "True", "TRUE", "t", "T", "x", "X", "yes", "Yes", "YES", "y", "Y", "1",
];

/// Render `value` as a literal for `column`.
pub fn encode(column: &Column, value: &Value, flavor: Flavor) -> Result<String> {
    encode_leaf(&column.name, &column.leaf, value, flavor)
}

/// Render `value` as a literal for a leaf of the given name.
pub fn encode_leaf(name: &str, leaf: &Leaf, value: &Value, flavor: Flavor) -> Result<String> {
    let mismatch = |what: &str| Error::encode(name, leaf.kind.name(), what);

    match value {
        Value::Literal(literal) => return Ok(literal.as_str().to_string()),
        Value::Null => return Ok("NULL".to_string()),
        _ => {}
    }

    match leaf.kind {
        Kind::Bool => match value {
            Value::Bool(v) => Ok(bit(*v)),
            Value::I64(v) => Ok(bit(*v == 1)),
            Value::String(s) => Ok(bit(TRUTHY.contains(&s.as_str()))),
            Value::List(_) | Value::Map(_) => Err(mismatch("expected a boolean")),
            _ => Ok(bit(false)),
        },
        Kind::Base64
        | Kind::Date
        | Kind::Datetime
        | Kind::Md5
        | Kind::Time
        | Kind::Uuid
        | Kind::Uuid4 => match scalar_text(value) {
            Some(text) => Ok(quote(flavor, &text)),
            None => Err(mismatch("expected a string")),
        },
        Kind::Decimal | Kind::Float | Kind::Price => {
            let number = match value {
                Value::I64(v) => *v as f64,
                Value::F64(v) => *v,
                Value::String(s) => s
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| mismatch(&format!("`{s}` is not a number")))?,
                _ => return Err(mismatch("expected a number")),
            };
            if !number.is_finite() {
                return Err(mismatch("expected a finite number"));
            }
            Ok(number.to_string())
        }
        Kind::Int | Kind::Uint => {
            let number = match value {
                Value::I64(v) => *v,
                Value::F64(v) if v.is_finite() => v.trunc() as i64,
                Value::Bool(v) => *v as i64,
                Value::String(s) => s
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| mismatch(&format!("`{s}` is not an integer")))?,
                _ => return Err(mismatch("expected an integer")),
            };
            Ok(number.to_string())
        }
        Kind::Timestamp => match value {
            Value::I64(epoch) => Ok(from_epoch(flavor, &epoch.to_string())),
            Value::String(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
                Ok(from_epoch(flavor, s))
            }
            Value::String(s) => Ok(quote(flavor, s)),
            _ => Err(mismatch("expected a timestamp")),
        },
        Kind::Json | Kind::Any => match value {
            Value::String(s) => Ok(quote(flavor, s)),
            other => Ok(quote(flavor, &other.to_json().to_string())),
        },
        Kind::Ip | Kind::String => match scalar_text(value) {
            Some(text) => Ok(quote(flavor, &text)),
            None => Err(mismatch("expected a string")),
        },
    }
}

/// Escape a string for use inside single quotes.
pub fn escape_string(flavor: Flavor, value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());

    match flavor {
        Flavor::Mysql => {
            for c in value.chars() {
                match c {
                    '\\' => escaped.push_str("\\\\"),
                    '\'' => escaped.push_str("\\'"),
                    '"' => escaped.push_str("\\\""),
                    '\0' => escaped.push_str("\\0"),
                    '\n' => escaped.push_str("\\n"),
                    '\r' => escaped.push_str("\\r"),
                    '\x1a' => escaped.push_str("\\Z"),
                    c => escaped.push(c),
                }
            }
        }
        Flavor::Sqlite => {
            for c in value.chars() {
                if c == '\'' {
                    escaped.push('\'');
                }
                escaped.push(c);
            }
        }
    }

    escaped
}

/// Escape and wrap in single quotes.
pub fn quote(flavor: Flavor, value: &str) -> String {
    format!("'{}'", escape_string(flavor, value))
}

/// Convert a raw value read back from a driver into the shape the leaf
/// describes.
pub fn decode(leaf: &Leaf, raw: Value) -> Value {
    match (leaf.kind, raw) {
        (_, Value::Null) => Value::Null,
        (Kind::Bool, Value::I64(v)) => Value::Bool(v != 0),
        (Kind::Bool, Value::String(s)) => Value::Bool(TRUTHY.contains(&s.as_str())),
        (kind, Value::String(s)) if kind.is_integer() => match s.trim().parse::<i64>() {
            Ok(v) => Value::I64(v),
            Err(_) => Value::String(s),
        },
        (kind, Value::String(s)) if kind.is_real() => match s.trim().parse::<f64>() {
            Ok(v) => Value::F64(v),
            Err(_) => Value::String(s),
        },
        (kind, Value::I64(v)) if kind.is_real() => Value::F64(v as f64),
        (Kind::String | Kind::Ip | Kind::Uuid | Kind::Uuid4 | Kind::Md5, Value::I64(v)) => {
            Value::String(v.to_string())
        }
        (_, raw) => raw,
    }
}

fn bit(v: bool) -> String {
    let bit = if v { "1" } else { "0" };
    bit.to_string()
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::I64(v) => Some(v.to_string()),
        Value::F64(v) => Some(v.to_string()),
        _ => None,
    }
}

fn from_epoch(flavor: Flavor, digits: &str) -> String {
    match flavor {
        Flavor::Mysql => format!("FROM_UNIXTIME({digits})"),
        Flavor::Sqlite => format!("datetime({digits}, 'unixepoch')"),
    }
}
