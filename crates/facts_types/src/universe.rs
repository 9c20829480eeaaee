//! The type universe: canonical interning of structural types.
//!
//! A [`TypeUniverse`] owns the canonicalization cache and the declaration
//! registry. It is a cheap, cloneable handle; independent universes share
//! nothing but the leaf types.

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};
use tracing::trace;

use crate::error::{Error, Result};
use crate::registry::Registry;
use crate::types::{Field, Type, TypeKind};

/// Tuning knobs for a [`TypeUniverse`].
#[derive(Clone, Debug)]
pub struct UniverseConfig {
    /// Number of cache entries at which dead entries are first swept.
    ///
    /// After each sweep the next threshold is twice the surviving size,
    /// but never lower than this value.
    pub sweep_threshold: usize,
}

impl Default for UniverseConfig {
    fn default() -> Self {
        Self {
            sweep_threshold: 1024,
        }
    }
}

/// Weakly retained canonical instances, keyed by shape.
///
/// A key holds its component types strongly, so an entry keeps its
/// components alive until the entry itself is swept.
struct TypeCache {
    entries: HashMap<TypeKind, Weak<TypeKind>>,
    next_sweep: usize,
    sweep_threshold: usize,
}

impl TypeCache {
    fn new(config: &UniverseConfig) -> Self {
        Self {
            entries: HashMap::new(),
            next_sweep: config.sweep_threshold,
            sweep_threshold: config.sweep_threshold,
        }
    }

    fn sweep(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, node| node.strong_count() > 0);
        before - self.entries.len()
    }

    fn maybe_sweep(&mut self) {
        if self.entries.len() < self.next_sweep {
            return;
        }
        let removed = self.sweep();
        self.next_sweep = (self.entries.len() * 2).max(self.sweep_threshold);
        trace!(removed, live = self.entries.len(), "swept type cache");
    }
}

struct Inner {
    cache: Mutex<TypeCache>,
    registry: RwLock<Registry>,
}

/// Factory and registry for canonical types.
///
/// Every structural shape has exactly one live instance per universe.
/// Interning is serialized, so concurrent requests for the same shape
/// observe the same instance.
#[derive(Clone)]
pub struct TypeUniverse {
    inner: Arc<Inner>,
}

impl TypeUniverse {
    /// Creates an empty universe with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(UniverseConfig::default())
    }

    /// Creates an empty universe.
    #[must_use]
    pub fn with_config(config: UniverseConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                cache: Mutex::new(TypeCache::new(&config)),
                registry: RwLock::new(Registry::default()),
            }),
        }
    }

    pub(crate) fn registry(&self) -> &RwLock<Registry> {
        &self.inner.registry
    }

    /// Returns the canonical instance for a shape, creating it if needed.
    ///
    /// Named types, sorts and constructors are routed through their
    /// declarations and may fail with a declaration error; every other
    /// shape always succeeds.
    pub fn intern(&self, kind: TypeKind) -> Result<Type> {
        match kind {
            TypeKind::Named { name, aliased } => self.declare_alias(&name, aliased),
            TypeKind::Sort(name) => self.declare_sort(&name),
            TypeKind::Constructor {
                name,
                sort,
                children,
            } => self.declare_constructor(&sort, name.as_deref(), children),
            structural => Ok(self.canonical(structural)),
        }
    }

    /// Interns a shape without any declaration checks.
    pub(crate) fn canonical(&self, kind: TypeKind) -> Type {
        if let Some(leaf) = Type::shared_leaf(&kind) {
            return leaf;
        }

        let mut cache = self.inner.cache.lock();
        if let Some(existing) = cache.entries.get(&kind).and_then(Weak::upgrade) {
            return Type::from_node(existing);
        }

        cache.maybe_sweep();
        let node = Arc::new(kind.clone());
        cache.entries.insert(kind, Arc::downgrade(&node));
        Type::from_node(node)
    }

    /// Drops cache entries whose types are no longer referenced.
    ///
    /// Returns the number of entries removed.
    pub fn purge(&self) -> usize {
        let mut cache = self.inner.cache.lock();
        let mut total = 0;
        // Dropping an entry may release the last handle on its components.
        loop {
            let removed = cache.sweep();
            if removed == 0 {
                break;
            }
            total += removed;
        }
        cache.next_sweep = (cache.entries.len() * 2).max(cache.sweep_threshold);
        trace!(removed = total, live = cache.entries.len(), "purged type cache");
        total
    }

    /// Returns the number of cached canonical shapes, dead ones included.
    #[must_use]
    pub fn cached_type_count(&self) -> usize {
        self.inner.cache.lock().entries.len()
    }

    /// The universal supertype.
    #[must_use]
    pub fn value_type(&self) -> Type {
        Type::value()
    }

    /// The bottom type.
    #[must_use]
    pub fn void_type(&self) -> Type {
        Type::void()
    }

    /// The opaque type for an externally defined kind.
    #[must_use]
    pub fn object_type(&self, kind: &str) -> Type {
        self.canonical(TypeKind::Object(kind.into()))
    }

    /// The tuple type with no fields.
    #[must_use]
    pub fn empty_tuple_type(&self) -> Type {
        self.tuple_type_of(Vec::new())
    }

    /// An unlabeled tuple type.
    #[must_use]
    pub fn tuple_type(&self, fields: &[Type]) -> Type {
        self.tuple_type_of(fields.iter().cloned().map(Field::new).collect())
    }

    /// A tuple type with every field labeled.
    #[must_use]
    pub fn labeled_tuple_type(&self, fields: &[(Type, &str)]) -> Type {
        self.tuple_type_of(
            fields
                .iter()
                .map(|(ty, label)| Field::labeled(ty.clone(), label))
                .collect(),
        )
    }

    /// A tuple type from explicit fields.
    #[must_use]
    pub fn tuple_type_of(&self, fields: Vec<Field>) -> Type {
        self.canonical(TypeKind::Tuple(fields.into()))
    }

    /// A list type.
    #[must_use]
    pub fn list_type(&self, element: Type) -> Type {
        self.canonical(TypeKind::List(element))
    }

    /// A set type.
    #[must_use]
    pub fn set_type(&self, element: Type) -> Type {
        self.canonical(TypeKind::Set(element))
    }

    /// A relation type: a set of unlabeled tuples.
    #[must_use]
    pub fn relation_type(&self, fields: &[Type]) -> Type {
        let tuple = self.tuple_type(fields);
        self.set_type(tuple)
    }

    /// A relation type with labeled fields.
    #[must_use]
    pub fn labeled_relation_type(&self, fields: &[(Type, &str)]) -> Type {
        let tuple = self.labeled_tuple_type(fields);
        self.set_type(tuple)
    }

    /// A relation type over an existing tuple type (or alias of one).
    pub fn relation_type_from(&self, tuple: &Type) -> Result<Type> {
        if !tuple.is_tuple() {
            return Err(Error::unsupported("relation_type_from", tuple.clone()));
        }
        Ok(self.set_type(tuple.clone()))
    }

    /// A list relation type: a list of unlabeled tuples.
    #[must_use]
    pub fn list_relation_type(&self, fields: &[Type]) -> Type {
        let tuple = self.tuple_type(fields);
        self.list_type(tuple)
    }

    /// A list relation type with labeled fields.
    #[must_use]
    pub fn labeled_list_relation_type(&self, fields: &[(Type, &str)]) -> Type {
        let tuple = self.labeled_tuple_type(fields);
        self.list_type(tuple)
    }

    /// A list relation type over an existing tuple type (or alias of one).
    pub fn list_relation_type_from(&self, tuple: &Type) -> Result<Type> {
        if !tuple.is_tuple() {
            return Err(Error::unsupported("list_relation_type_from", tuple.clone()));
        }
        Ok(self.list_type(tuple.clone()))
    }

    /// An unlabeled map type.
    #[must_use]
    pub fn map_type(&self, key: Type, value: Type) -> Type {
        self.canonical(TypeKind::Map {
            key: Field::new(key),
            value: Field::new(value),
        })
    }

    /// A map type with labeled key and value.
    #[must_use]
    pub fn labeled_map_type(
        &self,
        key: Type,
        key_label: &str,
        value: Type,
        value_label: &str,
    ) -> Type {
        self.canonical(TypeKind::Map {
            key: Field::labeled(key, key_label),
            value: Field::labeled(value, value_label),
        })
    }

    /// A map type from already built key and value fields.
    #[must_use]
    pub fn map_type_of(&self, key: Field, value: Field) -> Type {
        self.canonical(TypeKind::Map { key, value })
    }

    /// The concatenation of two tuple types.
    pub fn tuple_product(&self, left: &Type, right: &Type) -> Result<Type> {
        let left_fields = tuple_fields(left, "tuple_product")?;
        let right_fields = tuple_fields(right, "tuple_product")?;
        let fields = left_fields.iter().chain(right_fields).cloned().collect();
        Ok(self.tuple_type_of(fields))
    }

    /// The type of composing two binary-relation tuples: `left` without its
    /// last field followed by `right` without its first field.
    pub fn tuple_compose(&self, left: &Type, right: &Type) -> Result<Type> {
        let left_fields = tuple_fields(left, "tuple_compose")?;
        let right_fields = tuple_fields(right, "tuple_compose")?;
        let (Some((_, head)), Some((_, tail))) =
            (left_fields.split_last(), right_fields.split_first())
        else {
            return Err(Error::unsupported("tuple_compose", left.clone()));
        };
        let fields = head.iter().chain(tail).cloned().collect();
        Ok(self.tuple_type_of(fields))
    }

    /// The tuple type of the transitive closure of a binary relation: both
    /// fields widened to the lub of the two, labels kept.
    pub fn tuple_closure(&self, tuple: &Type) -> Result<Type> {
        let [from, to] = tuple_fields(tuple, "tuple_closure")? else {
            return Err(Error::unsupported("tuple_closure", tuple.clone()));
        };
        let joined = self.lub(&from.ty, &to.ty);
        Ok(self.tuple_type_of(vec![
            Field {
                ty: joined.clone(),
                label: from.label.clone(),
            },
            Field {
                ty: joined,
                label: to.label.clone(),
            },
        ]))
    }

    /// Projects a tuple type onto the given field positions, in that order.
    pub fn tuple_select(&self, tuple: &Type, indices: &[usize]) -> Result<Type> {
        let fields = tuple_fields(tuple, "tuple_select")?;
        let selected = indices
            .iter()
            .map(|&index| {
                fields
                    .get(index)
                    .cloned()
                    .ok_or_else(|| Error::index_out_of_bounds(index, fields.len()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(self.tuple_type_of(selected))
    }

    /// Projects a tuple type onto the given field labels, in that order.
    pub fn tuple_select_labels(&self, tuple: &Type, labels: &[&str]) -> Result<Type> {
        let indices = labels
            .iter()
            .map(|label| {
                tuple
                    .field_index(label)
                    .ok_or_else(|| Error::label_not_found(*label, tuple.clone()))
            })
            .collect::<Result<Vec<_>>>()?;
        self.tuple_select(tuple, &indices)
    }
}

impl Default for TypeUniverse {
    fn default() -> Self {
        Self::new()
    }
}

fn tuple_fields<'a>(ty: &'a Type, operation: &'static str) -> Result<&'a [Field]> {
    match ty.resolved().kind() {
        TypeKind::Tuple(fields) => Ok(&fields[..]),
        _ => Err(Error::unsupported(operation, ty.clone())),
    }
}
