//! Integration tests for constructor values
//!
//! Tests construction against declared signatures, child updates and
//! annotations.

use facts::types::{ErrorKind, Type, TypeUniverse};
use facts::values::{Constructor, Value, ValueFactory};

struct Lang {
    vf: ValueFactory,
    expr: Type,
}

fn lang() -> Lang {
    let tu = TypeUniverse::new();
    let expr = tu.declare_sort("Expr").unwrap();
    tu.declare_labeled_constructor(&expr, Some("num"), &[(Type::integer(), "n")])
        .unwrap();
    tu.declare_labeled_constructor(
        &expr,
        Some("mul"),
        &[(expr.clone(), "lhs"), (expr.clone(), "rhs")],
    )
    .unwrap();
    tu.declare_annotation(&expr, "loc", Type::source_location())
        .unwrap();
    Lang {
        vf: ValueFactory::new(tu),
        expr,
    }
}

fn num(lang: &Lang, n: i64) -> Constructor {
    lang.vf
        .constructor_named(&lang.expr, "num", vec![n.into()])
        .unwrap()
}

#[test]
fn nodes_nest_through_their_sort() {
    let lang = lang();
    let product = lang
        .vf
        .constructor_named(&lang.expr, "mul", vec![num(&lang, 6).into(), num(&lang, 7).into()])
        .unwrap();
    assert_eq!(format!("{product}"), "mul(num(6),num(7))");
    assert_eq!(product.get_labeled("rhs").unwrap(), &Value::from(num(&lang, 7)));
    assert!(Value::from(product).has_type(&lang.expr));
}

#[test]
fn child_updates_are_checked_and_persistent() {
    let lang = lang();
    let six = num(&lang, 6);
    let seven = six.set_labeled("n", 7.into()).unwrap();
    assert_eq!(seven, num(&lang, 7));
    assert_eq!(six, num(&lang, 6));

    let err = six.set(0, "six".into()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::TypeMismatch { .. }));
    assert!(matches!(
        six.set(1, 1.into()).unwrap_err().kind,
        ErrorKind::IndexOutOfBounds { index: 1, length: 1 }
    ));
}

#[test]
fn declared_annotations_are_typed() {
    let lang = lang();
    let tu = lang.vf.universe();
    let node = num(&lang, 1);
    assert!(node.declares_annotation(tu, "loc"));
    assert!(!node.declares_annotation(tu, "doc"));

    let loc = lang.vf.source_location("calc.txt", 0, 1);
    let located = node.set_annotation(tu, "loc", loc.clone()).unwrap();
    assert_eq!(located.get_annotation("loc"), Some(&loc));

    let err = node.set_annotation(tu, "loc", 0.into()).unwrap_err();
    assert!(matches!(err.kind, ErrorKind::AnnotationTypeMismatch { .. }));
}

#[test]
fn annotations_distinguish_otherwise_equal_nodes() {
    let lang = lang();
    let tu = lang.vf.universe();
    let plain = num(&lang, 1);
    let noted = plain.set_annotation(tu, "doc", "one".into()).unwrap();
    assert_ne!(plain, noted);
    assert_eq!(noted.annotations().len(), 1);
    assert_eq!(noted.remove_annotation("doc"), plain);
}

#[test]
fn unknown_constructor_name() {
    let lang = lang();
    let err = lang
        .vf
        .constructor_named(&lang.expr, "div", vec![])
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::LabelNotFound { .. }));
}

#[test]
fn sort_annotations_override_value_wide_ones() {
    let lang = lang();
    let tu = lang.vf.universe();
    tu.declare_annotation(&Type::value(), "loc", Type::integer())
        .unwrap();

    let node = num(&lang, 1);
    let loc = lang.vf.source_location("calc.txt", 0, 1);
    let located = node.set_annotation(tu, "loc", loc.clone()).unwrap();
    assert_eq!(located.get_annotation("loc"), Some(&loc));
    assert!(matches!(
        node.set_annotation(tu, "loc", 3.into()).unwrap_err().kind,
        ErrorKind::AnnotationTypeMismatch { .. }
    ));
}
