//! Randomized tests over generated types and values
//!
//! Uses a seeded ChaCha RNG so every run checks the same values.

use facts::types::Type;
use facts::values::{Value, ValueFactory};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

struct Generator {
    rng: ChaCha8Rng,
    vf: ValueFactory,
}

impl Generator {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            vf: ValueFactory::default(),
        }
    }

    fn random_type(&mut self, depth: u32) -> Type {
        let choice = if depth == 0 {
            self.rng.gen_range(0..3)
        } else {
            self.rng.gen_range(0..7)
        };
        let tu = self.vf.universe().clone();
        match choice {
            0 => Type::integer(),
            1 => Type::real(),
            2 => Type::string(),
            3 => tu.list_type(self.random_type(depth - 1)),
            4 => tu.set_type(self.random_type(depth - 1)),
            5 => {
                let key = self.random_type(depth - 1);
                let value = self.random_type(depth - 1);
                tu.map_type(key, value)
            }
            _ => {
                let arity = self.rng.gen_range(1..4);
                let fields: Vec<Type> = (0..arity).map(|_| self.random_type(depth - 1)).collect();
                tu.tuple_type(&fields)
            }
        }
    }

    fn random_values(&mut self, ty: &Type, count: usize) -> Vec<Value> {
        (0..count).map(|_| self.random_value(ty)).collect()
    }

    fn random_value(&mut self, ty: &Type) -> Value {
        if *ty == Type::integer() {
            return Value::Integer(self.rng.gen_range(-100..100));
        }
        if *ty == Type::real() {
            return Value::Real(self.rng.gen_range(-1.0e3..1.0e3));
        }
        if *ty == Type::string() {
            let len = self.rng.gen_range(0..4);
            let s: String = (0..len).map(|_| self.rng.gen_range('a'..='e')).collect();
            return Value::from(s);
        }

        let len = self.rng.gen_range(0..5);
        if ty.is_list() {
            let element = ty.element_type().cloned().unwrap_or_else(Type::value);
            let mut w = self.vf.list_writer(element.clone());
            w.insert_all(self.random_values(&element, len)).unwrap();
            return w.seal().into();
        }
        if ty.is_set() {
            let element = ty.element_type().cloned().unwrap_or_else(Type::value);
            let mut w = self.vf.set_writer(element.clone());
            w.insert_all(self.random_values(&element, len)).unwrap();
            return w.seal().into();
        }
        if ty.is_map() {
            let key = ty.key_type().cloned().unwrap_or_else(Type::value);
            let value = ty.map_value_type().cloned().unwrap_or_else(Type::value);
            let mut w = self.vf.map_writer(key.clone(), value.clone());
            for _ in 0..len {
                let k = self.random_value(&key);
                let v = self.random_value(&value);
                w.put(k, v).unwrap();
            }
            return w.seal().into();
        }
        let fields: Vec<Value> = ty
            .fields()
            .iter()
            .map(|field| self.random_value(&field.ty))
            .collect();
        self.vf.tuple_of(ty, fields).unwrap().into()
    }
}

fn hash_of(value: &Value) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

#[test]
fn generated_values_inhabit_their_types() {
    let mut g = Generator::new(7);
    for _ in 0..200 {
        let ty = g.random_type(3);
        let value = g.random_value(&ty);
        assert!(
            value.has_type(&ty),
            "{value} has type {} which is not a subtype of {ty}",
            value.runtime_type()
        );
    }
}

#[test]
fn equal_values_hash_alike() {
    let mut g = Generator::new(11);
    for _ in 0..200 {
        let ty = g.random_type(3);
        let value = g.random_value(&ty);
        assert_eq!(value, value.clone());
        assert_eq!(hash_of(&value), hash_of(&value.clone()));
    }
}

#[test]
fn set_contents_do_not_depend_on_insertion_order() {
    let mut g = Generator::new(13);
    for _ in 0..100 {
        let element = g.random_type(2);
        let elements = g.random_values(&element, 8);

        let mut forward = g.vf.set_writer(element.clone());
        forward.insert_all(elements.iter().cloned()).unwrap();
        let mut backward = g.vf.set_writer(element);
        backward.insert_all(elements.into_iter().rev()).unwrap();

        let (a, b) = (Value::from(forward.seal()), Value::from(backward.seal()));
        assert_eq!(a, b);
        assert_eq!(hash_of(&a), hash_of(&b));
    }
}

#[test]
fn writers_reject_values_of_unrelated_types() {
    let mut g = Generator::new(17);
    for _ in 0..200 {
        let declared = g.random_type(2);
        let other = g.random_type(2);
        let value = g.random_value(&other);
        let mut w = g.vf.list_writer(declared.clone());
        let accepted = w.append(value.clone()).is_ok();
        assert_eq!(accepted, value.runtime_type().is_subtype_of(&declared));
    }
}

#[test]
fn lub_bounds_the_runtime_types() {
    let mut g = Generator::new(19);
    let tu = g.vf.universe().clone();
    for _ in 0..200 {
        let a_ty = g.random_type(3);
        let b_ty = g.random_type(3);
        let a = g.random_value(&a_ty).runtime_type();
        let b = g.random_value(&b_ty).runtime_type();
        let joined = tu.lub(&a, &b);
        assert!(a.is_subtype_of(&joined));
        assert!(b.is_subtype_of(&joined));
        assert_eq!(joined, tu.lub(&b, &a));
    }
}

#[test]
fn persistent_insert_widens_to_fit() {
    let mut g = Generator::new(23);
    let tu = g.vf.universe().clone();
    for _ in 0..100 {
        let element = g.random_type(2);
        let other = g.random_type(2);
        let list = g.vf.empty_list(element.clone());
        let value = g.random_value(&other);
        let grown = list.append(&tu, value.clone());
        assert!(value.has_type(&grown.element_type()));
        assert!(element.is_subtype_of(&grown.element_type()));
        assert_eq!(grown.get(0), Some(&value));
    }
}
