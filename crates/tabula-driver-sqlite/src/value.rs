use rusqlite::types::ValueRef;
use tabula_core::Value;

/// Converts a SQLite column value to a tabula value. Typing by leaf kind
/// happens later, in the codec.
pub(crate) fn from_sql(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(value) => Value::I64(value),
        ValueRef::Real(value) => Value::F64(value),
        ValueRef::Text(value) | ValueRef::Blob(value) => {
            Value::String(String::from_utf8_lossy(value).into_owned())
        }
    }
}
