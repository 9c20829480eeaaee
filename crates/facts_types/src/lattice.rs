//! Least upper bounds.

use std::iter::successors;
use std::sync::Arc;

use crate::types::{Field, Type, TypeKind};
use crate::universe::TypeUniverse;

/// Keeps a label only where both sides agree on it.
fn merge_label(a: Option<&Arc<str>>, b: Option<&Arc<str>>) -> Option<Arc<str>> {
    match (a, b) {
        (Some(a), Some(b)) if a == b => Some(a.clone()),
        _ => None,
    }
}

impl TypeUniverse {
    /// Returns the least upper bound of two types.
    ///
    /// The result is a supertype of both arguments and depends neither on
    /// argument order nor on how a chain of joins is grouped. Field labels
    /// survive only where both sides carry the same label, on every path
    /// including the one where one side is already a subtype of the other.
    #[must_use]
    pub fn lub(&self, a: &Type, b: &Type) -> Type {
        if a == b {
            return a.clone();
        }

        match (a.kind(), b.kind()) {
            (TypeKind::Void, _) | (_, TypeKind::Value) => return b.clone(),
            (_, TypeKind::Void) | (TypeKind::Value, _) => return a.clone(),
            _ => {}
        }

        if a.is_named() || b.is_named() {
            return self.lub_named(a, b);
        }

        match (a.kind(), b.kind()) {
            (TypeKind::Tuple(left), TypeKind::Tuple(right)) if left.len() == right.len() => {
                let fields = left
                    .iter()
                    .zip(right.iter())
                    .map(|(l, r)| self.lub_field(l, r))
                    .collect();
                self.tuple_type_of(fields)
            }
            (TypeKind::List(left), TypeKind::List(right)) => {
                let element = self.lub(left, right);
                self.list_type(element)
            }
            (TypeKind::Set(left), TypeKind::Set(right)) => {
                let element = self.lub(left, right);
                self.set_type(element)
            }
            (
                TypeKind::Map { key: lk, value: lv },
                TypeKind::Map { key: rk, value: rv },
            ) => {
                let key = self.lub_field(lk, rk);
                let value = self.lub_field(lv, rv);
                self.canonical(TypeKind::Map { key, value })
            }
            // Distinct constructors join at their sort, even when one
            // overload's children are a subtype of the other's.
            (TypeKind::Constructor { sort: ls, .. }, TypeKind::Constructor { sort: rs, .. })
                if ls == rs =>
            {
                ls.clone()
            }
            (TypeKind::Constructor { sort, .. }, TypeKind::Sort(_)) if sort == b => b.clone(),
            (TypeKind::Sort(_), TypeKind::Constructor { sort, .. }) if sort == a => a.clone(),
            _ => Type::value(),
        }
    }

    /// Folds [`Self::lub`] over `types`, starting from `void`.
    #[must_use]
    pub fn lub_all<'a>(&self, types: impl IntoIterator<Item = &'a Type>) -> Type {
        types
            .into_iter()
            .fold(Type::void(), |acc, ty| self.lub(&acc, ty))
    }

    /// Aliases form chains ending in a structural type. Two aliases join at
    /// the nearest alias both chains pass through, otherwise at the join of
    /// what they finally stand for.
    fn lub_named(&self, a: &Type, b: &Type) -> Type {
        let chain = |ty: &Type| -> Vec<Type> {
            successors(Some(ty), |t| t.aliased())
                .take_while(|t| t.is_named())
                .cloned()
                .collect()
        };
        let theirs = chain(b);
        if let Some(shared) = chain(a).into_iter().find(|t| theirs.contains(t)) {
            return shared;
        }
        self.lub(a.resolved(), b.resolved())
    }

    fn lub_field(&self, a: &Field, b: &Field) -> Field {
        Field {
            ty: self.lub(&a.ty, &b.ty),
            label: merge_label(a.label.as_ref(), b.label.as_ref()),
        }
    }
}
