//! Integration tests for the subtype lattice
//!
//! Tests subtyping and least upper bounds across aliases, sorts and collections.

use facts::types::{Type, TypeUniverse};

// =============================================================================
// Subtyping
// =============================================================================

#[test]
fn value_is_top_and_void_is_bottom() {
    let tu = TypeUniverse::new();
    let rel = tu.relation_type(&[Type::integer(), Type::string()]);
    for ty in [Type::integer(), rel.clone(), tu.list_type(rel)] {
        assert!(ty.is_subtype_of(&Type::value()));
        assert!(Type::void().is_subtype_of(&ty));
    }
}

#[test]
fn alias_is_a_subtype_of_its_target_only_one_way() {
    let tu = TypeUniverse::new();
    let age = tu.declare_alias("Age", Type::integer()).unwrap();
    assert!(age.is_subtype_of(&Type::integer()));
    assert!(!Type::integer().is_subtype_of(&age));
    assert!(Type::void().is_subtype_of(&age));
    assert!(age.comparable(&Type::integer()));
}

#[test]
fn constructors_are_subtypes_of_their_sort() {
    let tu = TypeUniverse::new();
    let bool_sort = tu.declare_sort("Bool").unwrap();
    let other = tu.declare_sort("Other").unwrap();
    let t = tu
        .declare_constructor(&bool_sort, Some("t"), tu.empty_tuple_type())
        .unwrap();
    assert!(t.is_subtype_of(&bool_sort));
    assert!(!t.is_subtype_of(&other));
    assert!(!bool_sort.is_subtype_of(&t));
}

// =============================================================================
// Least upper bound
// =============================================================================

#[test]
fn lub_widens_collections_elementwise() {
    let tu = TypeUniverse::new();
    let a = tu.map_type(Type::string(), Type::integer());
    let b = tu.map_type(Type::string(), Type::real());
    assert_eq!(tu.lub(&a, &b), tu.map_type(Type::string(), Type::value()));
}

#[test]
fn lub_resolves_aliases_inside_collections() {
    let tu = TypeUniverse::new();
    let age = tu.declare_alias("Age", Type::integer()).unwrap();
    let ages = tu.list_type(age.clone());
    let ints = tu.list_type(Type::integer());
    assert_eq!(tu.lub(&ages, &ints), ints);
    assert_eq!(tu.lub(&ages, &ages), ages);
}

#[test]
fn lub_of_two_constructors_is_their_sort() {
    let tu = TypeUniverse::new();
    let sort = tu.declare_sort("Bool").unwrap();
    let t = tu
        .declare_constructor(&sort, Some("t"), tu.empty_tuple_type())
        .unwrap();
    let f = tu
        .declare_constructor(&sort, Some("f"), tu.empty_tuple_type())
        .unwrap();
    assert_eq!(tu.lub(&t, &f), sort);
    assert_eq!(tu.lub(&t, &Type::integer()), Type::value());
}

#[test]
fn lub_keeps_agreeing_labels_only() {
    let tu = TypeUniverse::new();
    let a = tu.labeled_tuple_type(&[(Type::integer(), "x"), (Type::integer(), "y")]);
    let b = tu.labeled_tuple_type(&[(Type::integer(), "x"), (Type::integer(), "z")]);
    let joined = tu.lub(&a, &b);
    assert_eq!(joined.field_label(0), Some("x"));
    assert_eq!(joined.field_label(1), None);
    assert_eq!(tu.lub(&b, &a), joined);
}

#[test]
fn lub_all_of_sort_members() {
    let tu = TypeUniverse::new();
    let sort = tu.declare_sort("Shape").unwrap();
    let members: Vec<Type> = ["sq", "circle", "tri"]
        .into_iter()
        .map(|name| {
            tu.declare_constructor(&sort, Some(name), tu.tuple_type(&[Type::real()]))
                .unwrap()
        })
        .collect();
    assert_eq!(tu.lub_all(&members), sort);
    assert_eq!(tu.lub_all(&members[..1]), members[0]);
}

#[test]
fn lub_all_does_not_depend_on_order() {
    let tu = TypeUniverse::new();
    let types = [
        tu.labeled_tuple_type(&[(Type::integer(), "x")]),
        tu.labeled_tuple_type(&[(Type::real(), "y")]),
        tu.labeled_tuple_type(&[(Type::value(), "x")]),
    ];
    let expected = tu.tuple_type(&[Type::value()]);
    for order in [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]] {
        let permuted: Vec<Type> = order.iter().map(|&i| types[i].clone()).collect();
        assert_eq!(tu.lub_all(&permuted), expected, "order {order:?}");
    }
}
