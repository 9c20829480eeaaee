//! Declarations: named aliases, sorts, constructors and annotations.
//!
//! The registry is the queryable store external printers and codecs use to
//! recover constructor names and field labels.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::error::{DeclarationError, Error, Result};
use crate::types::{Type, TypeKind};
use crate::universe::TypeUniverse;

/// Declaration tables of one universe.
#[derive(Default)]
pub(crate) struct Registry {
    aliases: HashMap<Arc<str>, Type>,
    sorts: HashMap<Arc<str>, Type>,
    /// Constructors of each sort, in declaration order.
    signatures: HashMap<Type, Vec<Type>>,
    annotations: HashMap<Type, HashMap<Arc<str>, Type>>,
}

impl Registry {
    /// Returns the declaration of `label` from the last scope of
    /// [`annotation_scopes`] that declares it.
    fn annotation_type(&self, on: &Type, label: &str) -> Option<Type> {
        annotation_scopes(on)
            .into_iter()
            .rev()
            .filter_map(|scope| self.annotations.get(&scope))
            .find_map(|table| table.get(label).cloned())
    }

    fn annotations(&self, on: &Type) -> HashMap<Arc<str>, Type> {
        let mut result = HashMap::new();
        for scope in annotation_scopes(on) {
            if let Some(table) = self.annotations.get(&scope) {
                for (label, ty) in table {
                    result.insert(label.clone(), ty.clone());
                }
            }
        }
        result
    }
}

/// The types whose annotation declarations apply to `on`, in increasing
/// precedence: `value`, the type itself, its alias chain, and the sort of a
/// constructor at the end of that chain. A later scope overrides an earlier
/// one declaring the same label.
fn annotation_scopes(on: &Type) -> Vec<Type> {
    let mut scopes = vec![Type::value(), on.clone()];
    let mut current = on;
    while let TypeKind::Named { aliased, .. } = current.kind() {
        scopes.push(aliased.clone());
        current = aliased;
    }
    if let TypeKind::Constructor { sort, .. } = current.kind() {
        scopes.push(sort.clone());
    }
    scopes
}

/// Checks the identifier rule: non-empty, alphabetic first character, the
/// rest alphanumeric or `.`.
#[must_use]
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() => chars.all(|c| c.is_alphanumeric() || c == '.'),
        _ => false,
    }
}

fn check_identifier(name: &str) -> Result<()> {
    if is_identifier(name) {
        Ok(())
    } else {
        Err(Error::declaration(DeclarationError::InvalidIdentifier(
            name.to_string(),
        )))
    }
}

impl TypeUniverse {
    /// Declares (or looks up) the alias `name` for `aliased`.
    ///
    /// Redeclaring with the same aliased type returns the existing alias;
    /// a different aliased type is a declaration error.
    pub fn declare_alias(&self, name: &str, aliased: Type) -> Result<Type> {
        check_identifier(name)?;
        let mut registry = self.registry().write();

        if let Some(existing) = registry.aliases.get(name) {
            return match existing.aliased() {
                Some(current) if *current == aliased => Ok(existing.clone()),
                _ => Err(Error::declaration(DeclarationError::ConflictingAlias {
                    name: name.to_string(),
                    existing: existing.aliased().cloned().unwrap_or_else(Type::void),
                    requested: aliased,
                })),
            };
        }
        if registry.sorts.contains_key(name) {
            return Err(Error::declaration(DeclarationError::NameInUse {
                name: name.to_string(),
                existing: "sort",
            }));
        }

        let name: Arc<str> = name.into();
        let named = self.canonical(TypeKind::Named {
            name: name.clone(),
            aliased,
        });
        debug!(alias = %name, ty = %named.resolved(), "declared alias");
        registry.aliases.insert(name, named.clone());
        Ok(named)
    }

    /// Declares (or looks up) the sort `name`. Redeclaration is harmless.
    pub fn declare_sort(&self, name: &str) -> Result<Type> {
        check_identifier(name)?;
        let mut registry = self.registry().write();

        if let Some(existing) = registry.sorts.get(name) {
            return Ok(existing.clone());
        }
        if registry.aliases.contains_key(name) {
            return Err(Error::declaration(DeclarationError::NameInUse {
                name: name.to_string(),
                existing: "named type",
            }));
        }

        let name: Arc<str> = name.into();
        let sort = self.canonical(TypeKind::Sort(name.clone()));
        debug!(sort = %name, "declared sort");
        registry.signatures.insert(sort.clone(), Vec::new());
        registry.sorts.insert(name, sort.clone());
        Ok(sort)
    }

    /// Declares a constructor of `sort` with the given children tuple type.
    ///
    /// `name` is `None` for the anonymous constructor, of which a sort may
    /// have at most one. Redeclaring an identical constructor is a no-op.
    pub fn declare_constructor(
        &self,
        sort: &Type,
        name: Option<&str>,
        children: Type,
    ) -> Result<Type> {
        if !matches!(sort.kind(), TypeKind::Sort(_)) {
            return Err(Error::declaration(DeclarationError::NotASort(sort.clone())));
        }
        if !matches!(children.kind(), TypeKind::Tuple(_)) {
            return Err(Error::declaration(DeclarationError::ChildrenNotATuple(
                children,
            )));
        }
        if let Some(name) = name {
            check_identifier(name)?;
        }

        let mut registry = self.registry().write();
        let Some(signature) = registry.signatures.get_mut(sort) else {
            return Err(Error::declaration(DeclarationError::UnknownSort(
                sort.clone(),
            )));
        };

        let constructor = self.canonical(TypeKind::Constructor {
            name: name.map(Arc::from),
            sort: sort.clone(),
            children,
        });
        if signature.contains(&constructor) {
            return Ok(constructor);
        }
        if name.is_none() && signature.iter().any(|c| c.name().is_none()) {
            return Err(Error::declaration(
                DeclarationError::DuplicateAnonymousConstructor { sort: sort.clone() },
            ));
        }

        debug!(%sort, constructor = %constructor, "declared constructor");
        signature.push(constructor.clone());
        Ok(constructor)
    }

    /// Declares a labeled-children constructor; see [`Self::declare_constructor`].
    pub fn declare_labeled_constructor(
        &self,
        sort: &Type,
        name: Option<&str>,
        children: &[(Type, &str)],
    ) -> Result<Type> {
        let children = self.labeled_tuple_type(children);
        self.declare_constructor(sort, name, children)
    }

    /// Declares that values of `on` may carry annotation `label` of type `ty`.
    ///
    /// Redeclaring with the same type is harmless; a different type for a
    /// label already visible from `on` is a declaration error.
    pub fn declare_annotation(&self, on: &Type, label: &str, ty: Type) -> Result<()> {
        check_identifier(label)?;
        let mut registry = self.registry().write();

        match registry.annotation_type(on, label) {
            Some(existing) if existing == ty => Ok(()),
            Some(existing) => Err(Error::declaration(
                DeclarationError::ConflictingAnnotation {
                    on: on.clone(),
                    label: label.to_string(),
                    existing,
                    requested: ty,
                },
            )),
            None => {
                debug!(%on, label, %ty, "declared annotation");
                registry
                    .annotations
                    .entry(on.clone())
                    .or_default()
                    .insert(label.into(), ty);
                Ok(())
            }
        }
    }

    /// Looks up the declared type of annotation `label` on `on`.
    #[must_use]
    pub fn annotation_type(&self, on: &Type, label: &str) -> Option<Type> {
        self.registry().read().annotation_type(on, label)
    }

    /// Returns true if annotation `label` is declared for `on`.
    #[must_use]
    pub fn declares_annotation(&self, on: &Type, label: &str) -> bool {
        self.annotation_type(on, label).is_some()
    }

    /// Returns every annotation declaration visible from `on`.
    #[must_use]
    pub fn annotations(&self, on: &Type) -> HashMap<Arc<str>, Type> {
        self.registry().read().annotations(on)
    }

    /// Looks up a named type by name.
    #[must_use]
    pub fn lookup_named(&self, name: &str) -> Option<Type> {
        self.registry().read().aliases.get(name).cloned()
    }

    /// Looks up a sort by name.
    #[must_use]
    pub fn lookup_sort(&self, name: &str) -> Option<Type> {
        self.registry().read().sorts.get(name).cloned()
    }

    /// Returns the constructors of `sort` in declaration order.
    #[must_use]
    pub fn constructors_of(&self, sort: &Type) -> Vec<Type> {
        self.registry()
            .read()
            .signatures
            .get(sort)
            .cloned()
            .unwrap_or_default()
    }

    /// Returns every constructor of `sort` called `name` (overloads included).
    #[must_use]
    pub fn lookup_constructor(&self, sort: &Type, name: &str) -> Vec<Type> {
        self.constructors_of(sort)
            .into_iter()
            .filter(|constructor| constructor.name() == Some(name))
            .collect()
    }

    /// Returns every constructor called `name`, across all sorts.
    #[must_use]
    pub fn lookup_constructors_named(&self, name: &str) -> Vec<Type> {
        self.registry()
            .read()
            .signatures
            .values()
            .flatten()
            .filter(|constructor| constructor.name() == Some(name))
            .cloned()
            .collect()
    }

    /// Returns the anonymous constructor of `sort`.
    pub fn anonymous_constructor(&self, sort: &Type) -> Result<Type> {
        self.constructors_of(sort)
            .into_iter()
            .find(|constructor| constructor.name().is_none())
            .ok_or_else(|| Error::unsupported("anonymous_constructor", sort.clone()))
    }
}
