use super::Type;
use crate::{schema::Leaf, Result};

use serde::Deserialize;

/// One column of a compiled table.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// The name of the column in the database.
    pub name: String,

    /// The database storage type of the column.
    pub ty: Type,

    /// Whether or not the column is nullable
    pub nullable: bool,

    /// Replaces the generated `NULL` / `NOT NULL` clause when set.
    pub opts: Option<String>,

    /// The descriptor values in this column are encoded with.
    pub leaf: Leaf,
}

/// Column override block: `"char(2)"` or `{"type": …, "opts": …}`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "LeafOverrideRepr")]
pub struct LeafOverride {
    pub ty: Option<String>,
    pub opts: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LeafOverrideRepr {
    Type(String),
    Full {
        #[serde(default, rename = "type")]
        ty: Option<String>,
        #[serde(default)]
        opts: Option<String>,
    },
}

impl From<LeafOverrideRepr> for LeafOverride {
    fn from(repr: LeafOverrideRepr) -> LeafOverride {
        match repr {
            LeafOverrideRepr::Type(ty) => LeafOverride {
                ty: Some(ty),
                opts: None,
            },
            LeafOverrideRepr::Full { ty, opts } => LeafOverride { ty, opts },
        }
    }
}

impl Column {
    /// Compile `leaf` into a column for `backend`, honoring its override
    /// block for that backend.
    pub fn new(name: impl Into<String>, leaf: &Leaf, backend: &str) -> Result<Column> {
        let patch = leaf.overrides.leaf(backend)?;
        let ty = match patch.ty {
            Some(ty) => Type::Custom(ty),
            None => Type::from_leaf(leaf)?,
        };

        Ok(Column {
            name: name.into(),
            ty,
            nullable: leaf.optional,
            opts: patch.opts,
            leaf: leaf.clone(),
        })
    }
}
