//! Flatten and elevate: a nested list/map value to element rows and back.

use crate::mapper::{PARENT, VALUE};
use crate::{err, Result, Row, Value};

use indexmap::IndexMap;

/// The nesting layers of a leveled field.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Shape {
    pub(crate) levels: Vec<Level>,

    /// Whether elements are records rather than single values.
    pub(crate) record: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Level {
    pub(crate) column: String,
    pub(crate) kind: LevelKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LevelKind {
    List,
    Map,
}

impl Level {
    pub(crate) fn new(depth: usize, kind: LevelKind) -> Level {
        let column = match kind {
            LevelKind::List => format!("_a_{depth}"),
            LevelKind::Map => format!("_h_{depth}"),
        };
        Level { column, kind }
    }
}

impl Shape {
    pub(crate) fn columns(&self) -> impl Iterator<Item = &str> {
        self.levels.iter().map(|level| level.column.as_str())
    }

    /// One row per element. Rows carry a position column per level and
    /// either `_value` or the element's fields.
    ///
    /// A `Null` or empty field contributes no rows. Inner containers must
    /// hold at least one element, since an empty one has no row to stand
    /// for it.
    pub(crate) fn flatten(&self, value: &Value) -> Result<Vec<Row>> {
        let mut rows = vec![];
        self.flatten_at(0, value, &Row::new(), &mut rows)?;
        Ok(rows)
    }

    fn flatten_at(&self, depth: usize, value: &Value, prefix: &Row, out: &mut Vec<Row>) -> Result<()> {
        let Some(level) = self.levels.get(depth) else {
            let mut row = prefix.clone();
            if !self.record {
                row.insert(VALUE.to_string(), value.clone());
            } else if let Value::Map(fields) = value {
                row.extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));
            } else {
                return Err(err!("expected a record element, got {value:?}"));
            }
            out.push(row);
            return Ok(());
        };

        if depth > 0 && value.is_empty() {
            return Err(err!(
                "empty container at `{}` cannot be stored",
                level.column
            ));
        }

        match (level.kind, value) {
            (_, Value::Null) => {}
            (LevelKind::List, Value::List(items)) => {
                for (position, item) in items.iter().enumerate() {
                    let mut row = prefix.clone();
                    row.insert(level.column.clone(), Value::I64(position as i64));
                    self.flatten_at(depth + 1, item, &row, out)?;
                }
            }
            (LevelKind::Map, Value::Map(entries)) => {
                for (key, item) in entries {
                    let mut row = prefix.clone();
                    row.insert(level.column.clone(), Value::String(key.clone()));
                    self.flatten_at(depth + 1, item, &row, out)?;
                }
            }
            (LevelKind::List, other) => return Err(err!("expected a list, got {other:?}")),
            (LevelKind::Map, other) => return Err(err!("expected a map, got {other:?}")),
        }

        Ok(())
    }

    /// Rebuild the value from rows ordered by the level columns.
    pub(crate) fn elevate(&self, rows: Vec<Row>) -> Value {
        self.elevate_at(0, rows)
    }

    fn elevate_at(&self, depth: usize, rows: Vec<Row>) -> Value {
        let Some(level) = self.levels.get(depth) else {
            let Some(mut row) = rows.into_iter().next() else {
                return Value::Null;
            };
            if !self.record {
                return row.swap_remove(VALUE).unwrap_or_default();
            }
            return Value::Map(
                row.into_iter()
                    .filter(|(name, value)| {
                        !value.is_null() && name != PARENT && !self.is_level(name)
                    })
                    .collect(),
            );
        };

        match level.kind {
            LevelKind::List => {
                let mut runs: Vec<(Value, Vec<Row>)> = vec![];
                for row in rows {
                    let position = row.get(&level.column).cloned().unwrap_or_default();
                    match runs.last_mut() {
                        Some((last, run)) if *last == position => run.push(row),
                        _ => runs.push((position, vec![row])),
                    }
                }
                Value::List(
                    runs.into_iter()
                        .map(|(_, run)| self.elevate_at(depth + 1, run))
                        .collect(),
                )
            }
            LevelKind::Map => {
                let mut groups: IndexMap<String, Vec<Row>> = IndexMap::new();
                for row in rows {
                    let key = row
                        .get(&level.column)
                        .and_then(Value::key_string)
                        .unwrap_or_default();
                    groups.entry(key).or_default().push(row);
                }
                Value::Map(
                    groups
                        .into_iter()
                        .map(|(key, group)| (key, self.elevate_at(depth + 1, group)))
                        .collect(),
                )
            }
        }
    }

    fn is_level(&self, name: &str) -> bool {
        self.levels.iter().any(|level| level.column == name)
    }
}
