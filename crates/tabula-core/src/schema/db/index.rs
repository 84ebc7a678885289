use serde::Deserialize;

/// An index declared on a table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Index {
    pub name: String,

    /// Indexed columns, in order.
    #[serde(rename = "fields")]
    pub columns: Vec<IndexColumn>,

    #[serde(default, rename = "type")]
    pub kind: IndexKind,
}

/// One column of an index, with optional direction and prefix length.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "IndexColumnRepr")]
pub struct IndexColumn {
    pub name: String,
    pub order: Option<Direction>,

    /// Prefix length for text columns.
    pub size: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexKind {
    #[default]
    #[serde(alias = "index")]
    Plain,
    Unique,
    Fulltext,
    Spatial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Direction {
    #[serde(alias = "asc", alias = "ASC")]
    Asc,
    #[serde(alias = "desc", alias = "DESC")]
    Desc,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IndexColumnRepr {
    Name(String),
    Full {
        name: String,
        #[serde(default)]
        order: Option<Direction>,
        #[serde(default)]
        size: Option<u32>,
    },
}

impl From<IndexColumnRepr> for IndexColumn {
    fn from(repr: IndexColumnRepr) -> IndexColumn {
        match repr {
            IndexColumnRepr::Name(name) => IndexColumn::new(name),
            IndexColumnRepr::Full { name, order, size } => IndexColumn { name, order, size },
        }
    }
}

impl Index {
    pub fn new<I, C>(name: impl Into<String>, kind: IndexKind, columns: I) -> Index
    where
        I: IntoIterator<Item = C>,
        C: Into<IndexColumn>,
    {
        Index {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            kind,
        }
    }
}

impl IndexColumn {
    pub fn new(name: impl Into<String>) -> IndexColumn {
        IndexColumn {
            name: name.into(),
            order: None,
            size: None,
        }
    }
}

impl From<&str> for IndexColumn {
    fn from(name: &str) -> IndexColumn {
        IndexColumn::new(name)
    }
}

impl From<String> for IndexColumn {
    fn from(name: String) -> IndexColumn {
        IndexColumn::new(name)
    }
}
