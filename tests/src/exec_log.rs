use crate::logging_driver::DriverOp;

use std::sync::{Arc, Mutex};
use tabula_core::driver::Operation;

/// A wrapper around the operations log that provides a clean API for tests
#[derive(Debug, Clone)]
pub struct ExecLog {
    ops: Arc<Mutex<Vec<DriverOp>>>,
    poison: Arc<Mutex<Option<String>>>,
}

impl ExecLog {
    pub(crate) fn new(ops: Arc<Mutex<Vec<DriverOp>>>, poison: Arc<Mutex<Option<String>>>) -> Self {
        Self { ops, poison }
    }

    /// Get the number of logged operations
    pub fn len(&self) -> usize {
        self.ops.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.lock().unwrap().is_empty()
    }

    /// Check if any operation matches the given predicate
    pub fn any<F>(&self, predicate: F) -> bool
    where
        F: Fn(&Operation) -> bool,
    {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .any(|op| predicate(&op.operation))
    }

    /// Count operations matching the given predicate
    pub fn count<F>(&self, predicate: F) -> usize
    where
        F: Fn(&Operation) -> bool,
    {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .filter(|op| predicate(&op.operation))
            .count()
    }

    /// Every SQL statement sent, in order, with batches flattened
    pub fn statements(&self) -> Vec<String> {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .flat_map(|op| match &op.operation {
                Operation::Execute(sql) | Operation::Query(sql) | Operation::Insert(sql) => {
                    vec![sql.clone()]
                }
                Operation::Session(statements) => statements.clone(),
                Operation::Transaction(transaction) => transaction.statements.clone(),
                Operation::NewIdentifier => vec![],
            })
            .collect()
    }

    /// Statements of every batch sent, one entry per batch
    pub fn transactions(&self) -> Vec<Vec<String>> {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .filter_map(|op| match &op.operation {
                Operation::Transaction(transaction) => Some(transaction.statements.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of operations the backend rejected
    pub fn failures(&self) -> usize {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .filter(|op| !op.succeeded)
            .count()
    }

    /// Make every statement containing `pattern` fail from now on
    pub fn fail_statements_containing(&self, pattern: impl Into<String>) {
        *self.poison.lock().unwrap() = Some(pattern.into());
    }

    pub fn stop_failing(&self) {
        *self.poison.lock().unwrap() = None;
    }

    /// Clear the log
    pub fn clear(&mut self) {
        self.ops.lock().unwrap().clear();
    }

    /// Get access to all operations for custom assertions
    pub fn with_ops<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&[DriverOp]) -> R,
    {
        let ops = self.ops.lock().unwrap();
        f(&ops)
    }
}
