use super::{Leaf, Overrides};

use indexmap::IndexMap;

/// A schema descriptor node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Leaf(Leaf),
    List(List),
    Map(Map),
    Record(Record),
}

/// An ordered container of `child` values.
#[derive(Debug, Clone, PartialEq)]
pub struct List {
    pub child: Box<Node>,
    pub overrides: Overrides,
}

/// A keyed container of `child` values.
#[derive(Debug, Clone, PartialEq)]
pub struct Map {
    /// Declared type of the keys.
    pub key: Leaf,
    pub child: Box<Node>,
    pub overrides: Overrides,
}

/// Named fields, each a leaf or a nested container.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    pub fields: IndexMap<String, Node>,
    pub overrides: Overrides,
}

impl Node {
    pub fn list(child: impl Into<Node>) -> Node {
        Node::List(List {
            child: Box::new(child.into()),
            overrides: Overrides::default(),
        })
    }

    pub fn map(key: Leaf, child: impl Into<Node>) -> Node {
        Node::Map(Map {
            key,
            child: Box::new(child.into()),
            overrides: Overrides::default(),
        })
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    /// The element type of a list or map.
    pub fn child(&self) -> Option<&Node> {
        match self {
            Node::List(list) => Some(&list.child),
            Node::Map(map) => Some(&map.child),
            _ => None,
        }
    }

    pub fn overrides(&self) -> &Overrides {
        match self {
            Node::Leaf(leaf) => &leaf.overrides,
            Node::List(list) => &list.overrides,
            Node::Map(map) => &map.overrides,
            Node::Record(record) => &record.overrides,
        }
    }

    pub fn overrides_mut(&mut self) -> &mut Overrides {
        match self {
            Node::Leaf(leaf) => &mut leaf.overrides,
            Node::List(list) => &mut list.overrides,
            Node::Map(map) => &mut map.overrides,
            Node::Record(record) => &mut record.overrides,
        }
    }

    /// Attach a backend override block to this node.
    pub fn with_override(mut self, backend: &str, block: serde_json::Value) -> Node {
        self.overrides_mut().insert(backend, block);
        self
    }
}

impl Record {
    pub fn new() -> Record {
        Record::default()
    }

    pub fn field(mut self, name: impl Into<String>, node: impl Into<Node>) -> Record {
        self.fields.insert(name.into(), node.into());
        self
    }

    pub fn with_override(mut self, backend: &str, block: serde_json::Value) -> Record {
        self.overrides.insert(backend, block);
        self
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.fields.iter().map(|(name, node)| (name.as_str(), node))
    }
}

impl From<Leaf> for Node {
    fn from(value: Leaf) -> Node {
        Node::Leaf(value)
    }
}

impl From<Record> for Node {
    fn from(value: Record) -> Node {
        Node::Record(value)
    }
}

impl From<List> for Node {
    fn from(value: List) -> Node {
        Node::List(value)
    }
}

impl From<Map> for Node {
    fn from(value: Map) -> Node {
        Node::Map(value)
    }
}
