mod column;
pub use column::{Column, LeafOverride};

mod index;
pub use index::{Direction, Index, IndexColumn, IndexKind};

mod table;
pub use table::{AutoKey, Revisions, TableOverride, TableSpec};

mod ty;
pub use ty::Type;
