//! `burrow` provides a dynamic value wrapper: a [`Node`] handle in front of a
//! nested [`Value`] tree that gives calling code attribute-style and
//! index-style access — including auto-vivification — plus coercion and
//! operator delegation to the wrapped primitive.
//!
//! # Features
//!
//! - **Auto-vivification**: reading a missing mapping key creates an empty
//!   nested mapping instead of failing, so `n.get("a")?.get("b")?.set("c", 5)?`
//!   works on an empty tree.
//! - **Stable wrapper identity**: repeated reads of the same slot return
//!   handles to the same shared cell.
//! - **One tree, one anchor**: navigation inherits the root; the anchor keeps
//!   the tree-wide "most recently written node" slot.
//! - **Delegation**: coercions (`to_int`, `to_complex`, …, in-place
//!   `coerce_*` variants), arithmetic/comparison/unary operators
//!   (`try_add`, `try_lt`, `try_neg`, …, reflected and in-place forms), and
//!   native formatting all forward to the wrapped value.
//!
//! # Example
//!
//! ```
//! use burrow::{Node, Value, unwrap_tree};
//!
//! # fn main() -> Result<(), burrow::NodeError> {
//! let config = Node::new();
//! config.get("server")?.set("port", 8080i64)?;
//! assert_eq!(config.get("server")?.get("port")?, 8080i64);
//! assert_eq!(config.last_written().unwrap(), Value::Int(8080));
//!
//! let raw = unwrap_tree(&config)?;
//! assert!(raw["server"].is_map());
//! # Ok(())
//! # }
//! ```
//!
//! Serialization, persistence, and loading are out of scope: convert with
//! [`wrap_tree`]/[`unwrap_tree`] and hand the raw tree to whatever format
//! layer you use.

#![forbid(unsafe_code)]

mod access;
pub use access::{Subscript, ValueIter};

mod coerce;

mod error;
pub use error::NodeError;

mod node;
pub use node::Node;

mod ops;

mod tree;
pub use tree::{unwrap_tree, wrap_tree};

mod value;
pub use value::{Value, ValueKind};
