//! Access-protocol behavior: auto-vivification, identity, bounds, and the
//! last-written slot.

use burrow::{Node, NodeError, Value, ValueKind};

#[test]
fn reading_a_missing_key_vivifies_an_empty_mapping() {
    burrow_testhelpers::setup();

    let node = Node::new();
    let child = node.get("anything").unwrap();
    assert_eq!(child.kind(), ValueKind::Map);
    assert!(child.is_empty().unwrap());
    assert!(node.contains("anything").unwrap());
}

#[test]
fn vivified_chains_build_nested_trees() {
    burrow_testhelpers::setup();

    let node = Node::new();
    node.get("a").unwrap().get("b").unwrap().set("c", 5i64).unwrap();
    assert_eq!(node.get("a").unwrap().get("b").unwrap().get("c").unwrap(), 5i64);
}

#[test]
fn repeated_reads_return_the_same_wrapper() {
    burrow_testhelpers::setup();

    let node = Node::new();
    node.get("a").unwrap();
    let first = node.get("a").unwrap();
    let second = node.get("a").unwrap();
    assert!(Node::ptr_eq(&first, &second));
}

#[test]
fn raw_members_upgrade_in_place_with_stable_identity() {
    burrow_testhelpers::setup();

    let node = Node::from_value(Value::map_from([
        ("nested", Value::map_from([("x", Value::Int(1))])),
        ("leaf", Value::Int(2)),
    ]));
    let nested_a = node.get("nested").unwrap();
    let nested_b = node.get("nested").unwrap();
    assert!(Node::ptr_eq(&nested_a, &nested_b));
    assert_eq!(nested_a.get("x").unwrap(), 1i64);

    let leaf_a = node.get("leaf").unwrap();
    let leaf_b = node.get("leaf").unwrap();
    assert!(Node::ptr_eq(&leaf_a, &leaf_b));
    assert_eq!(leaf_a.to_int().unwrap(), 2);
}

#[test]
fn attribute_access_needs_a_mapping() {
    burrow_testhelpers::setup();

    let leaf = Node::from_value(5i64);
    assert_eq!(
        leaf.get("x").unwrap_err(),
        NodeError::NotSupported {
            operation: "attribute get",
            kind: ValueKind::Int
        }
    );
    assert!(leaf.set("x", 1i64).is_err());
    assert!(leaf.remove("x").is_err());
}

#[test]
fn set_wraps_and_remove_unlinks() {
    burrow_testhelpers::setup();

    let node = Node::new();
    node.set("x", 5i64).unwrap();
    let child = node.get("x").unwrap();
    assert_eq!(child.to_int().unwrap(), 5);
    assert!(child.root().is_some());

    // A stored null stays null instead of becoming an empty mapping.
    node.set("absent", Value::Null).unwrap();
    assert_eq!(node.get("absent").unwrap().kind(), ValueKind::Null);

    node.remove("x").unwrap();
    assert!(!node.contains("x").unwrap());
    assert!(matches!(
        node.remove("x").unwrap_err(),
        NodeError::NotSupported { .. }
    ));
}

#[test]
fn storing_a_node_adopts_it_unchanged() {
    burrow_testhelpers::setup();

    let node = Node::new();
    let detached = Node::from_value(7i64);
    node.set("x", detached.clone()).unwrap();
    let read_back = node.get("x").unwrap();
    assert!(Node::ptr_eq(&read_back, &detached));
}

#[test]
fn last_written_follows_every_mapping_store() {
    burrow_testhelpers::setup();

    let root = Node::new();
    assert!(root.last_written().is_none());

    root.set("x", 5i64).unwrap();
    root.set("y", 6i64).unwrap();
    assert_eq!(root.last_written().unwrap(), Value::Int(6));

    root.set("x", 7i64).unwrap();
    assert_eq!(root.last_written().unwrap(), Value::Int(7));

    // Writes anywhere in the tree update the root's slot; reads never do.
    root.get("deep").unwrap().set("z", 8i64).unwrap();
    assert_eq!(root.last_written().unwrap(), Value::Int(8));
    root.get("deep").unwrap();
    assert_eq!(root.last_written().unwrap(), Value::Int(8));

    root.set_item("k", 9i64).unwrap();
    assert_eq!(root.last_written().unwrap(), Value::Int(9));
}

#[test]
fn index_get_on_mappings_vivifies_like_attribute_get() {
    burrow_testhelpers::setup();

    let node = Node::new();
    let vivified = node.get_item("missing").unwrap();
    let child = vivified.as_node().unwrap();
    assert_eq!(child.kind(), ValueKind::Map);
    assert!(node.contains("missing").unwrap());
    assert!(Node::ptr_eq(child, &node.get("missing").unwrap()));
}

#[test]
fn sequence_bounds_are_checked_both_ways() {
    burrow_testhelpers::setup();

    let node = Node::from_value(Value::list_from([10i64, 20, 30]));
    assert_eq!(node.get_item(2).unwrap(), Value::Int(30));
    assert_eq!(node.get_item(-3).unwrap(), Value::Int(10));
    assert_eq!(
        node.get_item(3).unwrap_err(),
        NodeError::OutOfBounds { index: 3, len: 3 }
    );
    assert_eq!(
        node.get_item(-4).unwrap_err(),
        NodeError::OutOfBounds { index: -4, len: 3 }
    );
}

#[test]
fn slices_return_raw_unwrapped_values() {
    burrow_testhelpers::setup();

    let node = Node::from_value(Value::list_from([1i64, 2, 3, 4]));
    assert_eq!(node.get_item(1..3).unwrap(), Value::list_from([2i64, 3]));
    assert_eq!(node.get_item(..).unwrap(), node.value());
    assert_eq!(node.get_item(-2..).unwrap(), Value::list_from([3i64, 4]));
    // Out-of-range slice bounds clamp instead of failing.
    assert_eq!(node.get_item(2..99).unwrap(), Value::list_from([3i64, 4]));
}

#[test]
fn text_indexes_by_character_and_bytes_by_value() {
    burrow_testhelpers::setup();

    let text = Node::from_value("héllo");
    assert_eq!(text.get_item(1).unwrap(), Value::text("é"));
    assert_eq!(text.get_item(1..3).unwrap(), Value::text("él"));
    assert_eq!(text.len().unwrap(), 5);

    let bytes = Node::from_value(Value::bytes(*b"hi"));
    assert_eq!(bytes.get_item(0).unwrap(), Value::Int(104));
    assert_eq!(bytes.get_item(..1).unwrap(), Value::bytes(*b"h"));
    assert!(bytes.get_item(5).is_err());
}

#[test]
fn index_set_stores_and_splices() {
    burrow_testhelpers::setup();

    let node = Node::from_value(Value::list_from([1i64, 2, 3]));
    node.set_item(1, 20i64).unwrap();
    assert_eq!(node.get_item(1).unwrap(), Value::Int(20));
    assert!(node.set_item(7, 1i64).is_err());

    node.set_item(1..2, Value::list_from([8i64, 9])).unwrap();
    assert_eq!(node.value(), Value::list_from([1i64, 8, 9, 3]));

    let scalar = Node::from_value(5i64);
    assert!(matches!(
        scalar.set_item(0, 1i64).unwrap_err(),
        NodeError::NotSupported { .. }
    ));
}

#[test]
fn index_delete_and_iteration_forward_to_the_value() {
    burrow_testhelpers::setup();

    let node = Node::from_value(Value::list_from([1i64, 2, 3]));
    assert_eq!(node.remove_item(-1).unwrap(), Value::Int(3));
    assert_eq!(node.len().unwrap(), 2);

    let map = Node::new();
    map.set("a", 1i64).unwrap();
    map.set("b", 2i64).unwrap();
    let keys: Vec<Value> = map.iter().unwrap().collect();
    assert_eq!(keys, vec![Value::text("a"), Value::text("b")]);
    assert_eq!(map.remove_item("a").unwrap().unwrapped(), Value::Int(1));
    assert_eq!(map.keys().unwrap(), vec!["b".to_string()]);

    assert!(Node::from_value(5i64).iter().is_err());
}

#[test]
fn containment_follows_the_underlying_kind() {
    burrow_testhelpers::setup();

    let list = Node::from_value(Value::list_from([1i64, 2]));
    assert!(list.contains(2i64).unwrap());
    assert!(!list.contains(9i64).unwrap());

    let text = Node::from_value("hello");
    assert!(text.contains("ell").unwrap());

    let bytes = Node::from_value(Value::bytes(*b"hi"));
    assert!(bytes.contains(105i64).unwrap());
    assert!(bytes.contains(Value::bytes(*b"hi")).unwrap());

    assert!(Node::from_value(5i64).contains(5i64).is_err());
}

#[test]
fn convenience_container_methods() {
    burrow_testhelpers::setup();

    let map = Node::new();
    map.set("a", 1i64).unwrap();
    map.set("b", 2i64).unwrap();
    assert_eq!(map.values().unwrap().len(), 2);
    assert_eq!(map.entries().unwrap()[1].0, "b");

    let list = Node::from_value(Value::list_from([1i64]));
    list.push(2i64).unwrap();
    assert_eq!(list.len().unwrap(), 2);
    assert_eq!(list.pop().unwrap(), Some(Value::Int(2)));
    list.clear().unwrap();
    assert!(list.is_empty().unwrap());

    assert!(Node::from_value(5i64).push(1i64).is_err());
    assert!(Node::from_value(5i64).keys().is_err());
}
