use super::{Kind, Leaf, List, Map, Node, Overrides, Record};
use crate::{Error, Result};

use serde_json::{Map as Object, Value as Json};

impl Node {
    /// Parse a JSON descriptor.
    ///
    /// Objects carrying `__type__` are leaves, `__array__` lists and
    /// `__hash__` maps; every other object is a record whose non-dunder keys
    /// are its fields. A bare string is shorthand for `{"__type__": s}`.
    pub fn from_json(json: &Json) -> Result<Node> {
        match json {
            Json::String(kind) => Ok(Node::Leaf(Leaf::new(kind.parse()?))),
            Json::Object(object) => parse_object(object),
            other => Err(Error::invalid_schema(format!(
                "expected a descriptor object, got `{other}`"
            ))),
        }
    }

    pub fn from_json_str(src: &str) -> Result<Node> {
        let json: Json = serde_json::from_str(src)?;
        Node::from_json(&json)
    }
}

impl Record {
    /// Parse a JSON descriptor that must describe a record.
    pub fn from_json(json: &Json) -> Result<Record> {
        match Node::from_json(json)? {
            Node::Record(record) => Ok(record),
            _ => Err(Error::invalid_schema("the root descriptor must be a record")),
        }
    }
}

fn parse_object(object: &Object<String, Json>) -> Result<Node> {
    let overrides = parse_overrides(object);

    if let Some(child) = object.get("__array__") {
        return Ok(Node::List(List {
            child: Box::new(Node::from_json(child)?),
            overrides,
        }));
    }

    if let Some(child) = object.get("__hash__") {
        let key = match object.get("__key__") {
            Some(key) => match Node::from_json(key)? {
                Node::Leaf(leaf) => leaf,
                _ => return Err(Error::invalid_schema("`__key__` must describe a leaf")),
            },
            None => Leaf::string(255),
        };
        return Ok(Node::Map(Map {
            key,
            child: Box::new(Node::from_json(child)?),
            overrides,
        }));
    }

    if let Some(kind) = object.get("__type__") {
        let kind: Kind = match kind {
            Json::String(kind) => kind.parse()?,
            _ => return Err(Error::invalid_schema("`__type__` must be a string")),
        };
        let mut leaf = Leaf::new(kind);
        leaf.minimum = object.get("__minimum__").and_then(Json::as_u64);
        leaf.maximum = object.get("__maximum__").and_then(Json::as_u64);
        leaf.optional = object
            .get("__optional__")
            .and_then(Json::as_bool)
            .unwrap_or(false);
        if let Some(options) = object.get("__options__") {
            let Json::Array(options) = options else {
                return Err(Error::invalid_schema("`__options__` must be a list"));
            };
            leaf.options = Some(
                options
                    .iter()
                    .map(|option| match option {
                        Json::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect(),
            );
        }
        leaf.overrides = overrides;
        return Ok(Node::Leaf(leaf));
    }

    let mut record = Record {
        overrides,
        ..Record::default()
    };
    for (name, descriptor) in object {
        if is_dunder(name) {
            continue;
        }
        let node = Node::from_json(descriptor)
            .map_err(|err| err.context(Error::invalid_schema(format!("field `{name}`"))))?;
        record.fields.insert(name.clone(), node);
    }
    Ok(Node::Record(record))
}

fn parse_overrides(object: &Object<String, Json>) -> Overrides {
    let mut overrides = Overrides::default();
    for (key, block) in object {
        if !is_dunder(key) {
            continue;
        }
        let backend = &key[2..key.len() - 2];
        if matches!(backend, "mysql" | "sqlite") {
            overrides.insert(backend, block.clone());
        }
    }
    overrides
}

fn is_dunder(key: &str) -> bool {
    key.len() > 4 && key.starts_with("__") && key.ends_with("__")
}
