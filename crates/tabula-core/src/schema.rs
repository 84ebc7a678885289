//! Tree-shaped schema descriptors and the relational model they compile to.
//!
//! A [`Node`] describes the shape of a stored value: a [`Leaf`] scalar, an
//! ordered [`List`], a keyed [`Map`] or a [`Record`] of named fields. The
//! [`db`] module holds what a node becomes once compiled: tables, columns,
//! indexes and storage types.

pub mod db;

mod kind;
pub use kind::Kind;

mod leaf;
pub use leaf::Leaf;

mod node;
pub use node::{List, Map, Node, Record};

mod overrides;
pub use overrides::Overrides;

mod parse;
