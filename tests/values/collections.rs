//! Integration tests for tuples and collection values
//!
//! Tests labeled access, set and relation results, maps and persistence.

use facts::types::{ErrorKind, ResultKind, Type};
use facts::values::{Value, ValueFactory};

// =============================================================================
// Tuples
// =============================================================================

#[test]
fn labeled_tuple_access() {
    let vf = ValueFactory::default();
    let ty = vf
        .universe()
        .labeled_tuple_type(&[(Type::string(), "from"), (Type::string(), "to")]);
    let t = vf
        .tuple_of(&ty, vec!["Bergen".into(), "Amsterdam".into()])
        .unwrap();
    assert_eq!(t.get_labeled("from").unwrap(), &Value::from("Bergen"));
    assert_eq!(t.get(0).unwrap(), t.get_labeled("from").unwrap());
    assert!(t.get_labeled("via").is_err());
}

#[test]
fn tuple_update_leaves_the_original() {
    let vf = ValueFactory::default();
    let t = vf.tuple(vec![1.into(), 2.into()]);
    let u = t.set(1, 3.into()).unwrap();
    assert_eq!(format!("{t} {u}"), "<1,2> <1,3>");
    assert!(t.set(1, "x".into()).is_err());
}

// =============================================================================
// Sets and relations
// =============================================================================

#[test]
fn union_of_pair_sets_is_a_binary_relation() {
    let vf = ValueFactory::default();
    let tu = vf.universe();
    let pair = |a: i64, b: i64| Value::from(vf.tuple(vec![a.into(), b.into()]));

    let left = vf.set(&[pair(1, 2)]);
    let right = vf.set(&[pair(2, 3), pair(1, 2)]);
    let union = left.union(tu, &right);

    assert!(union.set_type().is_relation());
    let relation = union.into_relation().unwrap();
    assert_eq!(relation.arity(), 2);
    assert_eq!(relation.len(), 2);
}

#[test]
fn forcing_a_plain_set_to_a_relation_fails() {
    let vf = ValueFactory::default();
    let err = vf.set(&[1.into()]).into_relation().unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::ResultTypeMismatch {
            expected: ResultKind::Relation,
            ..
        }
    ));
}

#[test]
fn relation_composition_chains_edges() {
    let vf = ValueFactory::default();
    let tu = vf.universe();
    let edge = |a: &str, b: &str| Value::from(vf.tuple(vec![a.into(), b.into()]));

    let flights = vf
        .set(&[edge("OSL", "BGO"), edge("BGO", "AMS"), edge("AMS", "LHR")])
        .into_relation()
        .unwrap();
    let two_hops = flights.compose(tu, &flights).unwrap();
    assert_eq!(two_hops.len(), 2);
    assert!(two_hops.as_set().contains(&edge("OSL", "AMS")));
    assert!(two_hops.as_set().contains(&edge("BGO", "LHR")));

    let airports = flights.carrier(tu);
    assert_eq!(airports.len(), 4);
    let origins = flights.select(tu, &[0]).unwrap();
    assert_eq!(origins.element_type(), Type::string());
    assert_eq!(origins.len(), 3);
}

#[test]
fn closure_of_a_flight_network_with_a_return_leg() {
    let vf = ValueFactory::default();
    let tu = vf.universe();
    let edge = |a: &str, b: &str| Value::from(vf.tuple(vec![a.into(), b.into()]));
    let flights = vf
        .set(&[edge("OSL", "BGO"), edge("BGO", "AMS"), edge("AMS", "OSL")])
        .into_relation()
        .unwrap();
    let reachable = flights.closure(tu).unwrap();
    assert_eq!(reachable.len(), 9);
    assert!(reachable.as_set().contains(&edge("OSL", "OSL")));
    assert!(reachable.as_set().contains(&edge("AMS", "BGO")));
    assert!(flights.as_set().is_subset(reachable.as_set()));
}

#[test]
fn list_relations_keep_order_and_duplicates() {
    let vf = ValueFactory::default();
    let tu = vf.universe();
    let mut w = vf.list_relation_writer(&[Type::string(), Type::integer()]);
    for (city, km) in [("BGO", 300), ("AMS", 900), ("BGO", 300)] {
        w.append(vf.tuple(vec![city.into(), km.into()]).into())
            .unwrap();
    }
    let legs = w.seal_list_relation().unwrap();
    assert_eq!(format!("{}", legs.as_list().list_type()), "lrel[str, int]");
    assert_eq!(legs.len(), 3);

    let cities = legs.select(tu, &[0]).unwrap();
    assert_eq!(format!("{cities}"), "[\"BGO\",\"AMS\",\"BGO\"]");
    assert_eq!(legs.carrier(tu).len(), 4);

    let err = vf
        .list(&[1.into()])
        .into_list_relation()
        .unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::ResultTypeMismatch { expected: ResultKind::ListRelation, .. }
    ));
}

#[test]
fn set_equality_erases_insertion_order() {
    let vf = ValueFactory::default();
    let a = vf.set(&[1.into(), 2.into(), 3.into()]);
    let b = vf.set(&[3.into(), 1.into(), 2.into()]);
    assert_eq!(a, b);
    assert_eq!(Value::from(a.delete(&1.into())), Value::from(b.delete(&1.into())));
}

// =============================================================================
// Lists
// =============================================================================

#[test]
fn list_updates_are_persistent() {
    let vf = ValueFactory::default();
    let tu = vf.universe();
    let base = vf.list(&[1.into(), 2.into()]);
    let longer = base.append(tu, 3.into());
    let mixed = base.insert(tu, "zero".into());

    assert_eq!(format!("{base}"), "[1,2]");
    assert_eq!(format!("{longer}"), "[1,2,3]");
    assert_eq!(format!("{mixed}"), "[\"zero\",1,2]");
    assert_eq!(mixed.element_type(), Type::value());
    assert_eq!(base.element_type(), Type::integer());
}

#[test]
fn empty_collections_of_different_types_are_equal() {
    let vf = ValueFactory::default();
    let ints = vf.empty_list(Type::integer());
    let void = vf.empty_list(Type::void());
    assert_eq!(ints, void);
}

// =============================================================================
// Maps
// =============================================================================

#[test]
fn map_put_get_remove() {
    let vf = ValueFactory::default();
    let tu = vf.universe();
    let m = vf
        .empty_map(Type::string(), Type::integer())
        .put(tu, "a".into(), 1.into())
        .put(tu, "b".into(), 2.into());
    assert_eq!(m.get(&"a".into()), Some(&Value::from(1)));
    assert_eq!(m.len(), 2);

    let without = m.remove(&"a".into());
    assert_eq!(without.len(), 1);
    assert_eq!(m.len(), 2);

    let joined = without.join(tu, &m.put(tu, "b".into(), 20.into()));
    assert_eq!(joined.get(&"b".into()), Some(&Value::from(20)));
    assert_eq!(joined.len(), 2);
}

#[test]
fn values_are_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Value>();
    assert_send_sync::<ValueFactory>();
}
