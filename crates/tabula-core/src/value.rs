use indexmap::IndexMap;

/// A row or record: named values in insertion order.
pub type Row = IndexMap<String, Value>;

/// A dynamically typed tree value, as read from or written to a mapper.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    I64(i64),
    F64(f64),
    String(String),
    List(Vec<Value>),
    Map(Row),

    /// Raw SQL emitted verbatim, never escaped.
    Literal(Literal),
}

/// A caller-controlled SQL fragment such as `NOW()` or `UUID()`.
///
/// The codec passes literals through untouched, so they must never be built
/// from untrusted input.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Literal(String);

impl Literal {
    pub fn new(sql: impl Into<String>) -> Literal {
        Literal(sql.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Value {
    pub const fn null() -> Value {
        Value::Null
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Null, or a list or map with no entries.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::List(items) => items.is_empty(),
            Value::Map(row) => row.is_empty(),
            _ => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I64(v) => Some(*v),
            Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Row> {
        match self {
            Value::Map(row) => Some(row),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn into_map(self) -> Option<Row> {
        match self {
            Value::Map(row) => Some(row),
            _ => None,
        }
    }

    /// Render a map key. Map levels are keyed by strings or integers only.
    pub fn key_string(&self) -> Option<String> {
        match self {
            Value::String(s) => Some(s.clone()),
            Value::I64(v) => Some(v.to_string()),
            Value::Bool(v) => Some(v.to_string()),
            _ => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value as Json;

        match self {
            Value::Null => Json::Null,
            Value::Bool(v) => Json::Bool(*v),
            Value::I64(v) => Json::from(*v),
            Value::F64(v) => serde_json::Number::from_f64(*v)
                .map(Json::Number)
                .unwrap_or(Json::Null),
            Value::String(s) => Json::String(s.clone()),
            Value::List(items) => Json::Array(items.iter().map(Value::to_json).collect()),
            Value::Map(row) => Json::Object(
                row.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Value::Literal(lit) => Json::String(lit.as_str().to_string()),
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(src: serde_json::Value) -> Value {
        use serde_json::Value as Json;

        match src {
            Json::Null => Value::Null,
            Json::Bool(v) => Value::Bool(v),
            Json::Number(n) => match n.as_i64() {
                Some(v) => Value::I64(v),
                None => Value::F64(n.as_f64().unwrap_or_default()),
            },
            Json::String(s) => Value::String(s),
            Json::Array(items) => Value::List(items.into_iter().map(Value::from).collect()),
            Json::Object(fields) => {
                Value::Map(fields.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

impl From<&str> for Value {
    fn from(src: &str) -> Value {
        Value::String(src.to_string())
    }
}

impl From<String> for Value {
    fn from(src: String) -> Value {
        Value::String(src)
    }
}

impl From<&String> for Value {
    fn from(src: &String) -> Value {
        Value::String(src.clone())
    }
}

impl From<bool> for Value {
    fn from(src: bool) -> Value {
        Value::Bool(src)
    }
}

impl From<i64> for Value {
    fn from(src: i64) -> Value {
        Value::I64(src)
    }
}

impl From<i32> for Value {
    fn from(src: i32) -> Value {
        Value::I64(src as i64)
    }
}

impl From<u32> for Value {
    fn from(src: u32) -> Value {
        Value::I64(src as i64)
    }
}

impl From<usize> for Value {
    fn from(src: usize) -> Value {
        Value::I64(src as i64)
    }
}

impl From<f64> for Value {
    fn from(src: f64) -> Value {
        Value::F64(src)
    }
}

impl From<Row> for Value {
    fn from(src: Row) -> Value {
        Value::Map(src)
    }
}

impl From<Vec<Value>> for Value {
    fn from(src: Vec<Value>) -> Value {
        Value::List(src)
    }
}

impl From<Literal> for Value {
    fn from(src: Literal) -> Value {
        Value::Literal(src)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(src: Option<T>) -> Value {
        match src {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_json_keeps_integers() {
        let v = Value::from(json!({"a": 1, "b": 1.5, "c": [true, null]}));
        let row = v.as_map().unwrap();
        assert_eq!(row["a"], Value::I64(1));
        assert_eq!(row["b"], Value::F64(1.5));
        assert_eq!(
            row["c"],
            Value::List(vec![Value::Bool(true), Value::Null])
        );
    }

    #[test]
    fn empty_values() {
        assert!(Value::Null.is_empty());
        assert!(Value::List(vec![]).is_empty());
        assert!(Value::Map(Row::new()).is_empty());
        assert!(!Value::from("").is_empty());
        assert!(!Value::I64(0).is_empty());
    }

    #[test]
    fn json_round_trip_preserves_order() {
        let src = json!({"z": 1, "a": {"y": "x", "b": [1, 2]}});
        assert_eq!(Value::from(src.clone()).to_json(), src);
        let keys: Vec<_> = Value::from(src)
            .into_map()
            .unwrap()
            .keys()
            .cloned()
            .collect();
        assert_eq!(keys, ["z", "a"]);
    }
}
