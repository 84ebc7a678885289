use super::Lineage;
use crate::{Db, Result};

use tabula_core::{
    driver::Flavor,
    schema::{db::TableSpec, Kind, Leaf, Overrides},
};

/// What a mapper inherits from the mapper that owns it.
#[derive(Debug, Clone)]
pub(super) struct Scope {
    pub(super) db: Db,

    /// Prefix of the table names compiled in this scope.
    pub(super) name: String,

    pub(super) database: String,
    pub(super) host: String,

    /// Name of the column holding the owner's identifiers.
    pub(super) key: String,

    /// Descriptor of the owner's identifiers.
    pub(super) key_leaf: Leaf,

    /// Path from the owner's identifiers to root identifiers.
    pub(super) lineage: Lineage,
}

impl Scope {
    pub(super) fn root(db: &Db, name: &str) -> Scope {
        Scope {
            db: db.clone(),
            name: name.to_string(),
            database: TableSpec::DEFAULT_DB.to_string(),
            host: TableSpec::DEFAULT_HOST.to_string(),
            key: TableSpec::DEFAULT_KEY.to_string(),
            key_leaf: Leaf::new(Kind::Uuid),
            lineage: Lineage::default(),
        }
    }

    /// The default spec for a table of this scope.
    pub(super) fn spec(&self, name: String) -> TableSpec {
        let mut spec = TableSpec::new(name);
        spec.db = self.database.clone();
        spec.host = self.host.clone();
        spec
    }

    /// Apply the override block matching the inherited host's backend.
    ///
    /// Returns the resolved spec and the flavor of the host it ended up on,
    /// which is the backend its columns compile for.
    pub(super) fn resolve(&self, base: TableSpec, overrides: &Overrides) -> Result<(TableSpec, Flavor)> {
        let patch = overrides.table(self.db.flavor(&base.host)?.name())?;
        let spec = base.resolve(&patch);
        let flavor = self.db.flavor(&spec.host)?;
        Ok((spec, flavor))
    }

    /// The scope of mappers nested under a table resolved as `spec`.
    pub(super) fn nested(&self, spec: &TableSpec, key: &str, key_leaf: Leaf, lineage: Lineage) -> Scope {
        Scope {
            db: self.db.clone(),
            name: spec.name.clone(),
            database: spec.db.clone(),
            host: spec.host.clone(),
            key: key.to_string(),
            key_leaf,
            lineage,
        }
    }
}
