//! Assignability and numeric promotion rules.

use crate::{supertype_closure, Type, TypeCtor, TypeHierarchy};

/// Can a value of type `source` be used where `target` is expected?
///
/// Only identity and reference conversions count. Numeric values are not
/// widened here: an `Int32` argument does not satisfy a `Double` parameter.
/// Binary operators widen separately through [`promote_numeric`].
pub fn is_assignable(target: &Type, source: &Type, hierarchy: &dyn TypeHierarchy) -> bool {
    if target == source {
        return true;
    }
    match (target, source) {
        (Type::Object, _) => true,
        (_, Type::Null) => target.is_reference(),
        (
            Type::Function {
                params: target_params,
                ret: target_ret,
            },
            Type::Function {
                params: source_params,
                ret: source_ret,
            },
        ) => target_params == source_params && is_assignable(target_ret, source_ret, hierarchy),
        (Type::Quoted(target), Type::Quoted(source)) => is_assignable(target, source, hierarchy),
        (Type::Applied { .. } | Type::Entity(_), _) => supertype_closure(source, hierarchy)
            .iter()
            .any(|sup| sup == target || is_covariant(target, sup, hierarchy)),
        _ => false,
    }
}

/// `Enumerable<Base>` accepts `Enumerable<Derived>` for reference elements.
fn is_covariant(target: &Type, source: &Type, hierarchy: &dyn TypeHierarchy) -> bool {
    match (target, source) {
        (
            Type::Applied {
                ctor: TypeCtor::Enumerable,
                args: target_args,
            },
            Type::Applied {
                ctor: TypeCtor::Enumerable,
                args: source_args,
            },
        ) => match (target_args.first(), source_args.first()) {
            (Some(target_elem), Some(source_elem)) => {
                target_elem.is_reference()
                    && source_elem.is_reference()
                    && is_assignable(target_elem, source_elem, hierarchy)
            }
            _ => false,
        },
        _ => false,
    }
}

/// Can an explicit conversion turn a `source` value into a `target` value?
///
/// Covers identity, numeric to numeric, `Char` to and from integral types,
/// enums to and from numeric types or other enums, and reference up and
/// down casts. Everything else has no conversion.
pub fn is_convertible(target: &Type, source: &Type, hierarchy: &dyn TypeHierarchy) -> bool {
    let numeric_like = |ty: &Type| ty.is_numeric() || ty.as_enum().is_some();
    if numeric_like(target) && numeric_like(source) {
        return true;
    }
    match (target, source) {
        (Type::Char, other) | (other, Type::Char) if other.is_integral() => true,
        _ => {
            is_assignable(target, source, hierarchy) || is_assignable(source, target, hierarchy)
        }
    }
}

/// Position on the implicit widening chain
/// `Byte < Int16 < Int32 < Int64 < Single < Double`.
fn widening_rank(ty: &Type) -> Option<u8> {
    match ty {
        Type::Byte => Some(0),
        Type::Int16 => Some(1),
        Type::Int32 => Some(2),
        Type::Int64 => Some(3),
        Type::Single => Some(4),
        Type::Double => Some(5),
        _ => None,
    }
}

/// Common type of two numeric operands, if one exists.
///
/// Integral types widen to `Decimal`; `Single` and `Double` never mix with
/// `Decimal`.
pub fn promote_numeric(left: &Type, right: &Type) -> Option<Type> {
    if !left.is_numeric() || !right.is_numeric() {
        return None;
    }
    if left == right {
        return Some(left.clone());
    }
    match (left, right) {
        (Type::Decimal, other) | (other, Type::Decimal) => {
            other.is_integral().then_some(Type::Decimal)
        }
        _ => {
            let left_rank = widening_rank(left)?;
            let right_rank = widening_rank(right)?;
            Some(if left_rank >= right_rank {
                left.clone()
            } else {
                right.clone()
            })
        }
    }
}
