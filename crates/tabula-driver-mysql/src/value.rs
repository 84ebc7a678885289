use mysql_async::Value as MyValue;
use tabula_core::Value;

/// Converts a MySQL column value. The text protocol reports most columns as
/// bytes; the codec narrows them by leaf kind afterwards.
pub(crate) fn from_sql(value: MyValue) -> Value {
    match value {
        MyValue::NULL => Value::Null,
        MyValue::Bytes(bytes) => Value::String(String::from_utf8_lossy(&bytes).into_owned()),
        MyValue::Int(v) => Value::I64(v),
        MyValue::UInt(v) => Value::I64(v as i64),
        MyValue::Float(v) => Value::F64(v as f64),
        MyValue::Double(v) => Value::F64(v),
        MyValue::Date(year, month, day, hour, minute, second, _) => Value::String(format!(
            "{year:04}-{month:02}-{day:02} {hour:02}:{minute:02}:{second:02}"
        )),
        MyValue::Time(negative, days, hours, minutes, seconds, _) => {
            let sign = if negative { "-" } else { "" };
            let hours = days * 24 + hours as u32;
            Value::String(format!("{sign}{hours:02}:{minutes:02}:{seconds:02}"))
        }
    }
}
