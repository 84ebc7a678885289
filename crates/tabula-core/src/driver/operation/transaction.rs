use super::Operation;

/// Statements that must apply together or not at all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transaction {
    pub statements: Vec<String>,
}

impl Transaction {
    pub fn new(statements: Vec<String>) -> Transaction {
        Transaction { statements }
    }
}

impl From<Transaction> for Operation {
    fn from(value: Transaction) -> Operation {
        Operation::Transaction(value)
    }
}
