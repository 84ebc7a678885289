use crate::ExecLog;

use std::sync::{Arc, Mutex};
use tabula_core::{
    async_trait,
    driver::{Driver, Flavor, Operation, Response},
    Result,
};

/// Statement that always fails, swapped in for a poisoned one.
const FAILING_STATEMENT: &str = "SELECT * FROM \"__injected_failure__\";";

#[derive(Debug)]
pub struct LoggingDriver {
    inner: Box<dyn Driver>,

    /// Log of all operations executed through this driver
    ops_log: Arc<Mutex<Vec<DriverOp>>>,

    /// Statements containing this text fail instead of running
    poison: Arc<Mutex<Option<String>>>,
}

impl LoggingDriver {
    pub fn new(driver: impl Driver) -> Self {
        Self {
            inner: Box::new(driver),
            ops_log: Arc::new(Mutex::new(Vec::new())),
            poison: Arc::new(Mutex::new(None)),
        }
    }

    /// Get a handle to the operations log
    pub fn exec_log(&self) -> ExecLog {
        ExecLog::new(self.ops_log.clone(), self.poison.clone())
    }

    fn inject(&self, operation: Operation) -> Operation {
        let poison = self.poison.lock().expect("poison lock");
        let Some(poison) = poison.as_deref() else {
            return operation;
        };
        let swap = |sql: String| {
            if sql.contains(poison) {
                FAILING_STATEMENT.to_string()
            } else {
                sql
            }
        };

        match operation {
            Operation::Execute(sql) => Operation::Execute(swap(sql)),
            Operation::Query(sql) => Operation::Query(swap(sql)),
            Operation::Insert(sql) => Operation::Insert(swap(sql)),
            Operation::Session(statements) => {
                Operation::Session(statements.into_iter().map(swap).collect())
            }
            Operation::Transaction(mut transaction) => {
                transaction.statements = transaction.statements.into_iter().map(swap).collect();
                Operation::Transaction(transaction)
            }
            other => other,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DriverOp {
    /// The operation as the engine issued it, before any failure injection
    pub operation: Operation,
    pub succeeded: bool,
}

#[async_trait]
impl Driver for LoggingDriver {
    fn flavor(&self) -> Flavor {
        self.inner.flavor()
    }

    async fn exec(&self, operation: Operation) -> Result<Response> {
        let logged = operation.clone();
        let response = self.inner.exec(self.inject(operation)).await;

        self.ops_log
            .lock()
            .expect("Failed to acquire ops log lock")
            .push(DriverOp {
                operation: logged,
                succeeded: response.is_ok(),
            });

        response
    }
}
