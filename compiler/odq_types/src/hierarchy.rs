//! Supertype relations between host types.

use crate::{Type, TypeCtor};

/// Source of "implements / extends" facts.
pub trait TypeHierarchy {
    /// Types `ty` directly implements or extends.
    ///
    /// `Object` is implied and need not be listed.
    fn direct_supertypes(&self, ty: &Type) -> Vec<Type>;
}

/// Supertype rules of the built-in library types.
///
/// - `List<T>` implements `Collection<T>` and `Enumerable<T>`
/// - `Collection<T>` implements `Enumerable<T>`
/// - `T[]` implements `Collection<T>` and `Enumerable<T>`
/// - `String` implements `Enumerable<Char>`
#[derive(Copy, Clone, Debug, Default)]
pub struct BuiltinHierarchy;

impl TypeHierarchy for BuiltinHierarchy {
    fn direct_supertypes(&self, ty: &Type) -> Vec<Type> {
        match ty {
            Type::Applied {
                ctor: TypeCtor::List,
                args,
            } => args
                .first()
                .map(|elem| vec![Type::collection(elem.clone()), Type::enumerable(elem.clone())])
                .unwrap_or_default(),
            Type::Applied {
                ctor: TypeCtor::Collection,
                args,
            } => args
                .first()
                .map(|elem| vec![Type::enumerable(elem.clone())])
                .unwrap_or_default(),
            Type::Array(elem) => vec![
                Type::collection((**elem).clone()),
                Type::enumerable((**elem).clone()),
            ],
            Type::String => vec![Type::enumerable(Type::Char)],
            _ => Vec::new(),
        }
    }
}

/// `ty` followed by all of its transitive supertypes, breadth first and
/// without duplicates.
pub fn supertype_closure(ty: &Type, hierarchy: &dyn TypeHierarchy) -> Vec<Type> {
    let mut seen = vec![ty.clone()];
    let mut next = 0;
    while next < seen.len() {
        for sup in hierarchy.direct_supertypes(&seen[next]) {
            if !seen.contains(&sup) {
                seen.push(sup);
            }
        }
        next += 1;
    }
    seen
}

/// Find the type arguments `ty` supplies for `ctor`.
///
/// Searches `ty` itself first, then its supertypes in breadth-first order,
/// so `List<Int32>` yields `[Int32]` for `Enumerable`.
pub fn find_instance(ctor: TypeCtor, ty: &Type, hierarchy: &dyn TypeHierarchy) -> Option<Vec<Type>> {
    supertype_closure(ty, hierarchy)
        .into_iter()
        .find_map(|candidate| match candidate {
            Type::Applied { ctor: found, args } if found == ctor => Some(args),
            _ => None,
        })
}
