//! Host type system for odq.
//!
//! The compiler never talks to a concrete runtime's metadata. Everything it
//! needs to know about the host is described symbolically here:
//!
//! - `Type`: concrete types, parameterized types, and generic placeholders
//! - `MemberTemplate` / `Member`: callables and properties, possibly generic
//!   over their declaring type and/or their own type parameters
//! - `TypeHierarchy`: which types a type implements (its supertypes)
//! - `Unifier`: structural matching of generic templates against actual types
//!
//! # Generic placeholders
//!
//! A placeholder is a `GenericParam` tagged with its origin: a parameter of
//! the member's declaring type (`Collection<T0>.Count`) or of the member
//! itself (`Any<M0>(Enumerable<M0>, (M0) -> Bool)`). Instantiation replaces
//! placeholders by substitution; nothing is mutated in place.
//!
//! `Type::Wildcard` only exists at registration time. It marks "any type"
//! in an example instantiation and is turned back into the template's own
//! placeholders by `Member::generic_definition_over_wildcard`.

mod assign;
mod hierarchy;
mod member;
mod ty;
mod unify;

pub use assign::{is_assignable, is_convertible, promote_numeric};
pub use hierarchy::{find_instance, supertype_closure, BuiltinHierarchy, TypeHierarchy};
pub use member::{Member, MemberId, MemberKind, MemberTemplate};
pub use ty::{EnumDef, GenericOrigin, GenericParam, Type, TypeCtor};
pub use unify::{TypeArgs, UnifyContext, UnifyError, Unifier};
