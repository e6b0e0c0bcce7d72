//! Conversion between raw nested values and wrapped trees.

use std::rc::Rc;

use indexmap::IndexMap;

use crate::error::NodeError;
use crate::node::{Node, TreeCtx};
use crate::value::Value;

/// Recursively wraps a raw nested value into a [`Node`] tree.
///
/// Mapping members become child nodes sharing the result's anchor; nested
/// mappings recurse, and every non-mapping leaf is wrapped too, so each slot
/// exposes the full coercion/operator contract. Passing an existing node
/// returns it unchanged, and any other value wraps as a single leaf node.
pub fn wrap_tree(raw: impl Into<Value>) -> Node {
    match raw.into() {
        Value::Node(node) => node,
        Value::Map(map) => {
            let root = Node::new_root(Value::empty_map());
            let members = wrap_members(map, root.tree());
            root.replace_value(Value::Map(members));
            root
        }
        leaf => Node::new_root(leaf),
    }
}

fn wrap_members(map: IndexMap<String, Value>, tree: &Rc<TreeCtx>) -> IndexMap<String, Value> {
    map.into_iter()
        .map(|(key, value)| {
            let child = match value {
                Value::Node(node) => node,
                Value::Map(nested) => {
                    let node = Node::new_child(Value::empty_map(), tree);
                    let members = wrap_members(nested, tree);
                    node.replace_value(Value::Map(members));
                    node
                }
                leaf => Node::new_child(leaf, tree),
            };
            (key, Value::Node(child))
        })
        .collect()
}

/// Recursively unwraps a mapping node into a raw insertion-ordered mapping.
///
/// Mapping-valued children are replaced by their unwrapped form; non-mapping
/// children are returned as their wrapped node — coerce those individually
/// when raw leaves are needed. Fails with [`NodeError::Conversion`] when the
/// node does not wrap a mapping.
pub fn unwrap_tree(node: &Node) -> Result<IndexMap<String, Value>, NodeError> {
    let value = node.value();
    match value {
        Value::Map(map) => Ok(unwrap_members(&map)),
        other => Err(NodeError::Conversion {
            from: other.kind(),
            to: "map",
        }),
    }
}

fn unwrap_members(map: &IndexMap<String, Value>) -> IndexMap<String, Value> {
    map.iter()
        .map(|(key, value)| {
            let out = match value {
                Value::Node(child) => match child.value() {
                    Value::Map(inner) => Value::Map(unwrap_members(&inner)),
                    _ => value.clone(),
                },
                Value::Map(inner) => Value::Map(unwrap_members(inner)),
                other => other.clone(),
            };
            (key.clone(), out)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ValueKind;

    #[test]
    fn wrapping_shares_one_anchor() {
        let root = wrap_tree(Value::map_from([
            ("a", Value::map_from([("b", Value::Int(1))])),
            ("c", Value::Int(2)),
        ]));
        let a = root.get("a").unwrap();
        let b = a.get("b").unwrap();
        assert!(Node::ptr_eq(&a.root().unwrap(), &root));
        assert!(Node::ptr_eq(&b.root().unwrap(), &root));
        assert_eq!(b.to_int().unwrap(), 1);
    }

    #[test]
    fn wrap_tree_is_idempotent_on_nodes() {
        let node = wrap_tree(Value::map_from([("x", Value::Int(1))]));
        let again = wrap_tree(node.clone());
        assert!(Node::ptr_eq(&node, &again));
    }

    #[test]
    fn scalar_input_wraps_as_a_leaf() {
        let leaf = wrap_tree(5i64);
        assert_eq!(leaf.kind(), ValueKind::Int);
        assert!(leaf.is_root());
    }

    #[test]
    fn unwrap_requires_a_mapping() {
        let leaf = wrap_tree(5i64);
        assert_eq!(
            unwrap_tree(&leaf).unwrap_err(),
            NodeError::Conversion {
                from: ValueKind::Int,
                to: "map"
            }
        );
    }
}
