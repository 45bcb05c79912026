//! Type resolver capability.
//!
//! The compiler knows nothing about the resource model it queries. Property
//! lookup, type names, and entity inheritance come from a `TypeResolver`
//! supplied by the caller.

use odq_types::{BuiltinHierarchy, Type, TypeHierarchy};

use crate::Expr;

/// Host model behind a compilation.
pub trait TypeResolver {
    /// Access property `name` on `receiver`.
    ///
    /// Returns `None` if the receiver's type has no such property.
    fn resolve_property(&self, receiver: &Expr, name: &str) -> Option<Expr>;

    /// Look up a type by name, as written in `isof` and `cast`.
    fn resolve_type(&self, name: &str) -> Option<Type>;

    /// Direct base types of an entity or other resolver-defined type.
    fn supertypes(&self, _ty: &Type) -> Vec<Type> {
        Vec::new()
    }
}

/// Built-in supertypes plus those the resolver declares.
pub(crate) struct ResolverHierarchy<'r> {
    resolver: &'r dyn TypeResolver,
}

impl<'r> ResolverHierarchy<'r> {
    pub(crate) fn new(resolver: &'r dyn TypeResolver) -> Self {
        Self { resolver }
    }
}

impl TypeHierarchy for ResolverHierarchy<'_> {
    fn direct_supertypes(&self, ty: &Type) -> Vec<Type> {
        let mut supertypes = BuiltinHierarchy.direct_supertypes(ty);
        supertypes.extend(self.resolver.supertypes(ty));
        supertypes
    }
}
