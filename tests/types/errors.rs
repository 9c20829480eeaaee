//! Integration tests for Error types
//!
//! Tests error construction, display, context, and error kinds.

use facts::types::{DeclarationError, Error, ErrorContext, ErrorKind, ResultKind, Type, TypeUniverse};

// =============================================================================
// Error Display
// =============================================================================

#[test]
fn type_mismatch_names_both_types() {
    let tu = TypeUniverse::new();
    let err = Error::type_mismatch(tu.set_type(Type::integer()), Type::string());
    assert_eq!(format!("{err}"), "type mismatch: expected set[int], got str");
}

#[test]
fn result_type_mismatch_names_the_kind() {
    let tu = TypeUniverse::new();
    let err = Error::result_type_mismatch(ResultKind::Relation, tu.set_type(Type::integer()));
    assert_eq!(
        format!("{err}"),
        "result type mismatch: expected a relation, got set[int]"
    );
}

#[test]
fn declaration_error_display() {
    let err = Error::declaration(DeclarationError::InvalidIdentifier("9lives".into()));
    assert!(err.is_declaration());
    assert!(format!("{err}").contains("\"9lives\""));
}

#[test]
fn index_and_label_errors() {
    let err = Error::index_out_of_bounds(3, 2);
    assert!(matches!(err.kind, ErrorKind::IndexOutOfBounds { index: 3, length: 2 }));
    let err = Error::label_not_found("to", Type::integer());
    assert_eq!(format!("{err}"), "label not found: to in int");
}

// =============================================================================
// Error Context
// =============================================================================

#[test]
fn operations_stack_up() {
    let err = Error::illegal_state("sealed")
        .in_operation("set_writer.insert")
        .in_operation("load");
    let context = err.context.unwrap();
    assert_eq!(context.operation, Some("load"));
    assert_eq!(context.stack, vec!["set_writer.insert".to_string()]);
    assert_eq!(format!("{context}"), "in load\n  from set_writer.insert");
}

#[test]
fn explicit_context() {
    let context = ErrorContext::new()
        .with_operation("tuple.set")
        .with_frame("decode");
    let err = Error::index_out_of_bounds(0, 0).with_context(context);
    assert_eq!(err.context.as_ref().and_then(|c| c.operation), Some("tuple.set"));
}

// =============================================================================
// Declaration errors from the universe
// =============================================================================

#[test]
fn failed_declaration_leaves_registry_unchanged() {
    let tu = TypeUniverse::new();
    let sort = tu.declare_sort("Wrapper").unwrap();
    tu.declare_constructor(&sort, None, tu.tuple_type(&[Type::integer()]))
        .unwrap();
    let before = tu.constructors_of(&sort);

    let err = tu
        .declare_constructor(&sort, None, tu.tuple_type(&[Type::string()]))
        .unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::Declaration(DeclarationError::DuplicateAnonymousConstructor { .. })
    ));
    assert_eq!(tu.constructors_of(&sort), before);
}

#[test]
fn children_must_be_a_tuple() {
    let tu = TypeUniverse::new();
    let sort = tu.declare_sort("A").unwrap();
    let err = tu
        .declare_constructor(&sort, Some("c"), Type::integer())
        .unwrap_err();
    assert!(matches!(
        err.kind,
        ErrorKind::Declaration(DeclarationError::ChildrenNotATuple(_))
    ));
}
