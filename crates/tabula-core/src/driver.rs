mod flavor;
pub use flavor::Flavor;

mod response;
pub use response::{Response, Rows};

pub mod operation;
pub use operation::Operation;

use crate::async_trait;

use std::fmt::Debug;

/// A relational backend.
///
/// Drivers receive fully rendered SQL. They own connection handling; the
/// engine only asks them to run statements and report rows, counts or
/// generated keys.
#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// The SQL flavor statements for this driver must be rendered in.
    fn flavor(&self) -> Flavor;

    /// Execute a database operation
    async fn exec(&self, op: Operation) -> crate::Result<Response>;
}
