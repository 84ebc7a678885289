use super::Index;

use serde::Deserialize;

/// Everything needed to create and address one table, except its columns.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSpec {
    /// Database (schema) the table lives in.
    pub db: String,

    /// Name of the host whose driver executes statements for this table.
    pub host: String,

    pub name: String,

    /// Primary key column. `None` for tables whose rows are addressed by
    /// parent and level columns only.
    pub key: Option<String>,

    pub auto_key: AutoKey,
    pub indexes: Vec<Index>,
    pub revisions: Revisions,

    pub engine: String,
    pub charset: String,
    pub collate: String,
}

/// How the primary key of a new row is generated.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "AutoKeyRepr")]
pub enum AutoKey {
    /// The caller supplies the key.
    #[default]
    None,

    /// Native auto-increment.
    Increment,

    /// A server-side expression such as `UUID()`, evaluated once per insert.
    Expression(String),
}

/// Whether a parallel `<table>_revisions` table exists.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "RevisionsRepr")]
pub enum Revisions {
    #[default]
    Disabled,
    Enabled,

    /// Enabled, and every revision must carry these fields.
    Required(Vec<String>),
}

/// A table override block (`__mysql__` / `__sqlite__` on a container node).
///
/// `indexes` extend the generated indexes; every other field present
/// replaces the generated value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TableOverride {
    #[serde(default)]
    pub db: Option<String>,
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub auto_key: Option<AutoKey>,
    #[serde(default)]
    pub indexes: Vec<Index>,
    #[serde(default)]
    pub revisions: Option<Revisions>,
    #[serde(default)]
    pub engine: Option<String>,
    #[serde(default)]
    pub charset: Option<String>,
    #[serde(default)]
    pub collate: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AutoKeyRepr {
    Flag(bool),
    Expression(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RevisionsRepr {
    Flag(bool),
    Required(Vec<String>),
}

impl From<AutoKeyRepr> for AutoKey {
    fn from(repr: AutoKeyRepr) -> AutoKey {
        match repr {
            AutoKeyRepr::Flag(false) => AutoKey::None,
            AutoKeyRepr::Flag(true) => AutoKey::Increment,
            AutoKeyRepr::Expression(expr) => AutoKey::Expression(expr),
        }
    }
}

impl From<RevisionsRepr> for Revisions {
    fn from(repr: RevisionsRepr) -> Revisions {
        match repr {
            RevisionsRepr::Flag(false) => Revisions::Disabled,
            RevisionsRepr::Flag(true) => Revisions::Enabled,
            RevisionsRepr::Required(fields) => Revisions::Required(fields),
        }
    }
}

impl TableSpec {
    pub const DEFAULT_DB: &'static str = "test";
    pub const DEFAULT_HOST: &'static str = "_";
    pub const DEFAULT_KEY: &'static str = "_id";

    /// A spec with the default database, host, key and table options.
    pub fn new(name: impl Into<String>) -> TableSpec {
        TableSpec {
            db: TableSpec::DEFAULT_DB.to_string(),
            host: TableSpec::DEFAULT_HOST.to_string(),
            name: name.into(),
            key: Some(TableSpec::DEFAULT_KEY.to_string()),
            auto_key: AutoKey::None,
            indexes: vec![],
            revisions: Revisions::Disabled,
            engine: "InnoDB".to_string(),
            charset: "utf8mb4".to_string(),
            collate: "utf8mb4_bin".to_string(),
        }
    }

    /// Apply an override block, producing the resolved spec.
    pub fn resolve(self, patch: &TableOverride) -> TableSpec {
        let mut indexes = self.indexes;
        indexes.extend(patch.indexes.iter().cloned());

        TableSpec {
            db: patch.db.clone().unwrap_or(self.db),
            host: patch.host.clone().unwrap_or(self.host),
            name: patch.name.clone().unwrap_or(self.name),
            key: patch.key.clone().or(self.key),
            auto_key: patch.auto_key.clone().unwrap_or(self.auto_key),
            indexes,
            revisions: patch.revisions.clone().unwrap_or(self.revisions),
            engine: patch.engine.clone().unwrap_or(self.engine),
            charset: patch.charset.clone().unwrap_or(self.charset),
            collate: patch.collate.clone().unwrap_or(self.collate),
        }
    }

    pub fn revisions_enabled(&self) -> bool {
        !matches!(self.revisions, Revisions::Disabled)
    }
}
