//! Wrapping and unwrapping whole trees.

use burrow::{Node, Value, ValueKind, unwrap_tree, wrap_tree};

fn sample() -> Value {
    Value::map_from([
        ("name", Value::text("svc")),
        ("port", Value::Int(8080)),
        (
            "limits",
            Value::map_from([
                ("cpu", Value::Float(1.5)),
                ("tags", Value::list_from(["a", "b"])),
            ]),
        ),
        ("blob", Value::bytes(*b"\x00\x01")),
        ("absent", Value::Null),
    ])
}

#[test]
fn round_trip_preserves_structure() {
    burrow_testhelpers::setup();

    let raw = sample();
    let unwrapped = unwrap_tree(&wrap_tree(raw.clone())).unwrap();
    assert_eq!(Value::Map(unwrapped), raw);
}

#[test]
fn every_leaf_exposes_the_delegation_contract() {
    burrow_testhelpers::setup();

    let tree = wrap_tree(sample());
    assert_eq!(tree.get("port").unwrap().try_add(20i64).unwrap(), Value::Int(8100));
    assert_eq!(tree.get("name").unwrap().to_text(), "svc");
    assert_eq!(
        tree.get("limits").unwrap().get("cpu").unwrap().to_float().unwrap(),
        1.5
    );
}

#[test]
fn unwrapped_mappings_are_raw_and_leaves_stay_wrapped() {
    burrow_testhelpers::setup();

    let tree = wrap_tree(sample());
    let raw = unwrap_tree(&tree).unwrap();

    assert!(matches!(raw["limits"], Value::Map(_)));
    assert!(raw["port"].is_node());
    assert_eq!(raw["port"].unwrapped(), Value::Int(8080));

    let Value::Map(limits) = &raw["limits"] else {
        unreachable!()
    };
    assert!(limits["tags"].is_node());
}

#[test]
fn insertion_order_survives_the_round_trip() {
    burrow_testhelpers::setup();

    let raw = sample();
    let unwrapped = unwrap_tree(&wrap_tree(raw)).unwrap();
    let keys: Vec<&String> = unwrapped.keys().collect();
    assert_eq!(keys, ["name", "port", "limits", "blob", "absent"]);
}

#[test]
fn mutations_through_wrappers_appear_after_unwrap() {
    burrow_testhelpers::setup();

    let tree = wrap_tree(Value::map_from([("count", Value::Int(1))]));
    tree.get("count").unwrap().try_add_assign(1i64).unwrap();
    tree.get("fresh").unwrap().set("inner", true).unwrap();

    let raw = unwrap_tree(&tree).unwrap();
    assert_eq!(raw["count"].unwrapped(), Value::Int(2));
    let Value::Map(fresh) = &raw["fresh"] else {
        unreachable!()
    };
    assert_eq!(fresh["inner"].unwrapped(), Value::Bool(true));
}

#[test]
fn null_leaves_survive_wrapping() {
    burrow_testhelpers::setup();

    let tree = wrap_tree(Value::map_from([("absent", Value::Null)]));
    assert_eq!(tree.get("absent").unwrap().kind(), ValueKind::Null);
    let raw = unwrap_tree(&tree).unwrap();
    assert_eq!(raw["absent"].unwrapped(), Value::Null);
}

#[test]
fn last_written_works_across_a_wrapped_tree() {
    burrow_testhelpers::setup();

    let tree = wrap_tree(Value::map_from([(
        "a",
        Value::map_from([("b", Value::Int(1))]),
    )]));
    tree.get("a").unwrap().set("b", 2i64).unwrap();
    assert_eq!(tree.last_written().unwrap(), Value::Int(2));
    assert!(Node::ptr_eq(
        &tree.get("a").unwrap().root().unwrap(),
        &tree
    ));
}
