//! Integration tests for writers
//!
//! Tests strict element typing, sealing and relation results.

use facts::types::{ErrorKind, Type};
use facts::values::{SetWriter, Value, ValueFactory};

#[test]
fn set_of_integers_collapses_duplicates() {
    let vf = ValueFactory::default();
    let mut w = vf.set_writer(Type::integer());
    for n in [1, 2, 2, 3] {
        w.insert(n.into()).unwrap();
    }
    let set = w.seal();
    assert_eq!(set.len(), 3);
    assert_eq!(set.set_type(), &vf.universe().set_type(Type::integer()));
}

#[test]
fn sealed_writers_reject_mutation() {
    let vf = ValueFactory::default();

    let mut list = vf.list_writer(Type::integer());
    list.append(1.into()).unwrap();
    let sealed = list.seal();
    assert!(matches!(
        list.append(2.into()).unwrap_err().kind,
        ErrorKind::IllegalState(_)
    ));
    assert!(list.insert_all([3.into()]).is_err());
    assert_eq!(list.seal(), sealed);
    assert_eq!(sealed.len(), 1);

    let mut map = vf.map_writer(Type::string(), Type::integer());
    let first = map.seal();
    assert!(map.put("a".into(), 1.into()).is_err());
    assert_eq!(map.seal(), first);
}

#[test]
fn failed_insert_leaves_the_writer_unchanged() {
    let vf = ValueFactory::default();
    let mut w = vf.set_writer(Type::string());
    w.insert("a".into()).unwrap();
    assert!(w.insert(1.into()).is_err());
    assert!(w.insert_all(["b".into(), 2.into()]).is_err());
    assert_eq!(w.len(), 1);
    assert!(!w.is_sealed());
}

#[test]
fn subtypes_are_accepted() {
    let vf = ValueFactory::default();
    let tu = vf.universe();
    let age = tu.declare_alias("Age", Type::integer()).unwrap();

    let mut values = vf.list_writer(Type::value());
    values.insert_all([1.into(), "a".into(), 2.5.into()]).unwrap();
    assert_eq!(values.seal().len(), 3);

    let mut ages = vf.list_writer(age);
    assert!(ages.append(30.into()).is_err());
}

#[test]
fn relation_writer_seals_a_relation() {
    let vf = ValueFactory::default();
    let mut w: SetWriter = vf.relation_writer(&[Type::string(), Type::integer()]);
    w.insert(vf.tuple(vec!["a".into(), 1.into()]).into()).unwrap();
    w.insert(vf.tuple(vec!["b".into(), 2.into()]).into()).unwrap();
    assert!(w.insert(vf.tuple(vec![1.into(), 1.into()]).into()).is_err());

    let relation = w.seal_relation().unwrap();
    assert_eq!(relation.arity(), 2);
    assert_eq!(relation.field_type(1), Some(&Type::integer()));
    assert_eq!(Value::from(relation.clone()).as_relation(), Some(relation));
}

#[test]
fn plain_set_writer_cannot_seal_a_relation() {
    let vf = ValueFactory::default();
    let mut w = vf.set_writer(Type::integer());
    w.insert(1.into()).unwrap();
    assert!(w.seal_relation().is_err());
    assert!(w.is_sealed());
    assert_eq!(w.seal().len(), 1);
}

#[test]
fn writers_are_send() {
    fn assert_send<T: Send>() {}
    assert_send::<SetWriter>();
}
