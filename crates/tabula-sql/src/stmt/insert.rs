use super::*;

#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub into: Name,
    pub columns: Vec<String>,

    /// One encoded expression per column
    pub values: Vec<Expr>,

    pub on_conflict: OnConflict,
}

/// What happens when the new row collides with a unique key.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum OnConflict {
    /// Let the backend raise.
    #[default]
    Error,

    /// Keep the existing row.
    Ignore,

    /// Overwrite the named columns of the existing row.
    Update(Vec<String>),
}

impl From<Insert> for Statement {
    fn from(value: Insert) -> Self {
        Self::Insert(value)
    }
}
