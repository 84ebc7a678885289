use crate::{Row, Value};

use indexmap::IndexMap;

/// The change a write made to a value.
#[derive(Debug, Clone, PartialEq)]
pub enum Revision {
    /// The value was replaced as a whole. `Null` stands for absent.
    Changed { old: Value, new: Value },

    /// Only some fields changed.
    Fields(IndexMap<String, Revision>),
}

impl Revision {
    pub fn changed(old: impl Into<Value>, new: impl Into<Value>) -> Revision {
        Revision::Changed {
            old: old.into(),
            new: new.into(),
        }
    }

    pub fn is_changed(&self) -> bool {
        matches!(self, Revision::Changed { .. })
    }

    /// Merge per-field revisions of a record with `total` fields.
    ///
    /// Returns `None` when nothing changed. When every field of the record
    /// was replaced as a whole, or `fresh` says the record did not exist
    /// before and every reported field was created, the result is a single
    /// [`Revision::Changed`] over the record. Absent fields are left out of
    /// its `old` and `new` maps, and a map left empty becomes `Null`.
    pub fn collapse(
        fields: IndexMap<String, Revision>,
        total: usize,
        fresh: bool,
    ) -> Option<Revision> {
        if fields.is_empty() {
            return None;
        }

        let created = || {
            fresh
                && fields
                    .values()
                    .all(|revision| matches!(revision, Revision::Changed { old, .. } if old.is_null()))
        };
        let whole = fields.values().all(Revision::is_changed);
        if !whole || (fields.len() != total && !created()) {
            return Some(Revision::Fields(fields));
        }

        let mut old = Row::new();
        let mut new = Row::new();
        for (name, revision) in fields {
            if let Revision::Changed {
                old: before,
                new: after,
            } = revision
            {
                if !before.is_null() {
                    old.insert(name.clone(), before);
                }
                if !after.is_null() {
                    new.insert(name, after);
                }
            }
        }

        Some(Revision::changed(non_empty(old), non_empty(new)))
    }

    /// The stored shape: `{"old": .., "new": ..}` for a whole change, or an
    /// object of field revisions.
    pub fn to_value(&self) -> Value {
        Value::Map(self.to_row())
    }

    pub fn to_row(&self) -> Row {
        match self {
            Revision::Changed { old, new } => Row::from_iter([
                ("old".to_string(), old.clone()),
                ("new".to_string(), new.clone()),
            ]),
            Revision::Fields(fields) => fields
                .iter()
                .map(|(name, revision)| (name.clone(), revision.to_value()))
                .collect(),
        }
    }
}

fn non_empty(row: Row) -> Value {
    if row.is_empty() {
        Value::Null
    } else {
        Value::Map(row)
    }
}
