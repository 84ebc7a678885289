mod transaction;
pub use transaction::Transaction;

/// A unit of work handed to a [`Driver`](super::Driver).
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Run a statement, responding with the affected row count.
    Execute(String),

    /// Run a query, responding with its rows.
    Query(String),

    /// Run an insert, responding with the generated key.
    Insert(String),

    /// Run statements in order on one connection, responding with the rows
    /// of the last one. Session variables set by earlier statements are
    /// visible to later ones.
    Session(Vec<String>),

    /// Run statements in order as one all-or-nothing unit, responding with
    /// the total affected row count.
    Transaction(Transaction),

    /// Generate a fresh row identifier.
    NewIdentifier,
}
