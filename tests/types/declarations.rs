//! Integration tests for declarations
//!
//! Tests aliases, sorts, constructors, annotations and registry queries.

use facts::types::{DeclarationError, ErrorKind, Type, TypeUniverse};

fn is_declaration(kind: &ErrorKind, check: impl Fn(&DeclarationError) -> bool) -> bool {
    matches!(kind, ErrorKind::Declaration(inner) if check(inner))
}

// =============================================================================
// Annotations
// =============================================================================

#[test]
fn annotation_redeclaration_with_same_type_is_a_noop() {
    let tu = TypeUniverse::new();
    let a = tu.declare_sort("A").unwrap();

    assert!(tu.declare_annotation(&a, "loc", Type::source_location()).is_ok());
    assert!(tu.declare_annotation(&a, "loc", Type::source_location()).is_ok());

    let err = tu.declare_annotation(&a, "loc", Type::string()).unwrap_err();
    assert!(err.is_declaration());
    assert!(is_declaration(&err.kind, |e| matches!(
        e,
        DeclarationError::ConflictingAnnotation { .. }
    )));
    assert_eq!(tu.annotation_type(&a, "loc"), Some(Type::source_location()));
}

#[test]
fn annotation_on_value_applies_everywhere() {
    let tu = TypeUniverse::new();
    tu.declare_annotation(&Type::value(), "doc", Type::string())
        .unwrap();
    assert!(tu.declares_annotation(&Type::integer(), "doc"));
    assert!(tu.declares_annotation(&tu.list_type(Type::real()), "doc"));

    let sort = tu.declare_sort("A").unwrap();
    assert!(tu.declare_annotation(&sort, "doc", Type::integer()).is_err());
}

#[test]
fn annotation_labels_must_be_identifiers() {
    let tu = TypeUniverse::new();
    let sort = tu.declare_sort("A").unwrap();
    let err = tu
        .declare_annotation(&sort, "not a label", Type::string())
        .unwrap_err();
    assert!(is_declaration(&err.kind, |e| matches!(
        e,
        DeclarationError::InvalidIdentifier(_)
    )));
    assert!(tu.annotations(&sort).is_empty());
}

// =============================================================================
// Registry queries
// =============================================================================

#[test]
fn printer_recovers_names_and_labels() {
    let tu = TypeUniverse::new();
    let expr = tu.declare_sort("Expr").unwrap();
    tu.declare_labeled_constructor(&expr, Some("lit"), &[(Type::integer(), "n")])
        .unwrap();
    tu.declare_labeled_constructor(
        &expr,
        Some("add"),
        &[(expr.clone(), "lhs"), (expr.clone(), "rhs")],
    )
    .unwrap();

    let sort = tu.lookup_sort("Expr").unwrap();
    let signatures: Vec<String> = tu
        .constructors_of(&sort)
        .iter()
        .map(|c| {
            let labels: Vec<&str> = (0..c.arity()).filter_map(|i| c.field_label(i)).collect();
            format!("{}({})", c.name().unwrap_or("_"), labels.join(","))
        })
        .collect();
    assert_eq!(signatures, ["lit(n)", "add(lhs,rhs)"]);
}

#[test]
fn overloads_are_listed_in_declaration_order() {
    let tu = TypeUniverse::new();
    let shape = tu.declare_sort("Shape").unwrap();
    let by_int = tu
        .declare_constructor(&shape, Some("sq"), tu.tuple_type(&[Type::integer()]))
        .unwrap();
    let by_real = tu
        .declare_constructor(&shape, Some("sq"), tu.tuple_type(&[Type::real()]))
        .unwrap();
    assert_eq!(tu.lookup_constructor(&shape, "sq"), vec![by_int, by_real]);
    assert!(tu.lookup_constructor(&shape, "circle").is_empty());
}

#[test]
fn named_lookups() {
    let tu = TypeUniverse::new();
    let age = tu.declare_alias("Age", Type::integer()).unwrap();
    assert_eq!(tu.lookup_named("Age"), Some(age.clone()));
    assert_eq!(tu.lookup_named("Missing"), None);
    assert_eq!(tu.lookup_sort("Age"), None);
    assert_eq!(age.aliased(), Some(&Type::integer()));
    assert_eq!(format!("{age}"), "Age");
}

#[test]
fn anonymous_constructor_lookup_fails_without_one() {
    let tu = TypeUniverse::new();
    let sort = tu.declare_sort("Bare").unwrap();
    let err = tu.anonymous_constructor(&sort).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnsupportedOperation { .. }));
}

// =============================================================================
// Descriptors
// =============================================================================

#[test]
fn descriptor_rebuilds_declarations_elsewhere() {
    let source = TypeUniverse::new();
    let expr = source.declare_sort("Expr").unwrap();
    let lit = source
        .declare_labeled_constructor(&expr, Some("lit"), &[(Type::integer(), "n")])
        .unwrap();
    let ty = source.map_type(Type::string(), source.list_type(lit));

    let target = TypeUniverse::new();
    let rebuilt = target.from_descriptor(&ty.descriptor()).unwrap();
    assert_eq!(format!("{rebuilt}"), format!("{ty}"));
    let sort = target.lookup_sort("Expr").unwrap();
    assert_eq!(target.lookup_constructor(&sort, "lit").len(), 1);
}
