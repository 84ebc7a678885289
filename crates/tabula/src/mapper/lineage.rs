use super::{ID, PARENT};
use crate::{Query, Result, Row, Table, Value};

use indexmap::IndexSet;
use std::sync::Arc;

/// The record-element tables between a mapper's identifiers and root
/// identifiers, nearest first.
///
/// Each table maps its `_id` values to the `_parent` values they belong to.
/// An empty lineage means the identifiers already are root identifiers.
#[derive(Debug, Clone, Default)]
pub(crate) struct Lineage {
    tables: Vec<Arc<Table>>,
}

impl Lineage {
    /// The lineage of identifiers one element table further down.
    pub(crate) fn through(&self, table: Arc<Table>) -> Lineage {
        let mut tables = Vec::with_capacity(self.tables.len() + 1);
        tables.push(table);
        tables.extend(self.tables.iter().cloned());
        Lineage { tables }
    }

    /// Translate `ids` into the root identifiers they belong to.
    pub(crate) async fn resolve(&self, ids: Vec<Value>) -> Result<Vec<Value>> {
        let mut ids = dedup(ids);

        for table in &self.tables {
            if ids.is_empty() {
                break;
            }

            let mut filter = Row::new();
            filter.insert(ID.to_string(), Value::List(ids));
            let query = Query::new().distinct().fields([PARENT]).filter(filter);

            ids = dedup(
                table
                    .select(&query)
                    .await?
                    .into_iter()
                    .filter_map(|mut row| row.swap_remove(PARENT))
                    .collect(),
            );
        }

        Ok(ids)
    }
}

/// Drop repeated identifiers, keeping the first occurrence.
pub(crate) fn dedup(ids: Vec<Value>) -> Vec<Value> {
    let mut seen = IndexSet::new();
    ids.into_iter()
        .filter(|id| id.key_string().map_or(true, |key| seen.insert(key)))
        .collect()
}

/// Identifiers present in every set, in the order of the first.
pub(crate) fn intersect(sets: Vec<Vec<Value>>) -> Vec<Value> {
    let mut sets = sets.into_iter();
    let Some(first) = sets.next() else {
        return vec![];
    };

    let rest: Vec<IndexSet<String>> = sets
        .map(|set| set.iter().filter_map(Value::key_string).collect())
        .collect();

    dedup(first)
        .into_iter()
        .filter(|id| {
            id.key_string()
                .is_some_and(|key| rest.iter().all(|set| set.contains(&key)))
        })
        .collect()
}
