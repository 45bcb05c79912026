//! Structural matching of generic signatures against actual types.
//!
//! Unlike full unification, matching is one-sided: placeholders only occur
//! in the wanted (template) type and are bound to parts of the actual type.
//! A wanted `Enumerable<M0>` matches an actual `List<String>` by first
//! finding the `Enumerable` instance among the supertypes of `List<String>`.

mod error;

pub use error::{UnifyContext, UnifyError};

use crate::{find_instance, is_assignable, GenericOrigin, GenericParam, Member, Type, TypeHierarchy};

/// Bindings for the placeholders of one member.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TypeArgs {
    declaring: Vec<Option<Type>>,
    method: Vec<Option<Type>>,
}

impl TypeArgs {
    /// Empty slots for `declaring` type parameters and `method` parameters.
    pub fn new(declaring: usize, method: usize) -> Self {
        Self {
            declaring: vec![None; declaring],
            method: vec![None; method],
        }
    }

    /// Slots for `member`, pre-filled with the arguments it already fixes.
    pub fn for_member(member: &Member) -> Self {
        let prefill = |args: &[Type]| -> Vec<Option<Type>> {
            args.iter()
                .map(|arg| (!arg.has_params()).then(|| arg.clone()))
                .collect()
        };
        Self {
            declaring: prefill(member.declaring_args()),
            method: prefill(member.method_args()),
        }
    }

    fn slots(&self, origin: GenericOrigin) -> &[Option<Type>] {
        match origin {
            GenericOrigin::Declaring => &self.declaring,
            GenericOrigin::Method => &self.method,
        }
    }

    fn slot_mut(&mut self, param: GenericParam) -> Option<&mut Option<Type>> {
        let slots = match param.origin {
            GenericOrigin::Declaring => &mut self.declaring,
            GenericOrigin::Method => &mut self.method,
        };
        slots.get_mut(usize::from(param.index))
    }

    pub fn get(&self, param: GenericParam) -> Option<&Type> {
        self.slots(param.origin)
            .get(usize::from(param.index))
            .and_then(Option::as_ref)
    }

    fn bound_count(&self) -> usize {
        self.declaring.iter().chain(&self.method).filter(|slot| slot.is_some()).count()
    }

    /// Apply the current bindings to `ty`.
    #[must_use]
    pub fn resolve(&self, ty: &Type) -> Type {
        ty.substitute(&|param| self.get(param).cloned())
    }

    /// `member` instantiated with every bound slot.
    ///
    /// Unbound slots keep the member's current argument.
    pub fn instantiate(&self, member: &Member) -> Member {
        let pick = |slots: &[Option<Type>], current: &[Type]| -> Vec<Type> {
            current
                .iter()
                .enumerate()
                .map(|(i, arg)| {
                    slots
                        .get(i)
                        .and_then(Option::as_ref)
                        .unwrap_or(arg)
                        .clone()
                })
                .collect()
        };
        let declaring = pick(&self.declaring, member.declaring_args());
        let method = pick(&self.method, member.method_args());
        member
            .clone()
            .with_declaring_args(&declaring)
            .with_method_args(&method)
    }
}

/// Matches template types against actual types under a hierarchy.
pub struct Unifier<'h> {
    hierarchy: &'h dyn TypeHierarchy,
}

impl<'h> Unifier<'h> {
    pub fn new(hierarchy: &'h dyn TypeHierarchy) -> Self {
        Self { hierarchy }
    }

    /// Match `wanted` against `actual`, recording placeholder bindings.
    ///
    /// On error, bindings made before the failure stay in `args`; callers
    /// that try alternatives start from a fresh `TypeArgs`.
    /// Returns whether any new binding was made.
    #[tracing::instrument(level = "trace", skip_all, fields(%wanted, %actual))]
    pub fn infer(&self, wanted: &Type, actual: &Type, args: &mut TypeArgs) -> Result<bool, UnifyError> {
        let before = args.bound_count();
        self.infer_in(wanted, actual, args, UnifyContext::TopLevel)?;
        Ok(args.bound_count() > before)
    }

    /// Instantiate the declaring type of `member` from a receiver type.
    ///
    /// The template's declaring type is looked up among `receiver` and its
    /// supertypes, so `Collection<T0>.Count` binds `T0 = Int32` for a
    /// receiver of type `List<Int32>`. Non-generic declaring types only need
    /// to be assignable from the receiver.
    pub fn bind_declaring(&self, member: &Member, receiver: &Type) -> Result<Member, UnifyError> {
        let mut args = TypeArgs::for_member(member);
        self.infer(&member.template().declaring, receiver, &mut args)?;
        Ok(args.instantiate(member))
    }

    fn infer_in(
        &self,
        wanted: &Type,
        actual: &Type,
        args: &mut TypeArgs,
        context: UnifyContext,
    ) -> Result<(), UnifyError> {
        let mismatch = || UnifyError::Mismatch {
            expected: wanted.clone(),
            found: actual.clone(),
            context,
        };

        if !wanted.has_params() {
            return if is_assignable(wanted, actual, self.hierarchy) {
                Ok(())
            } else {
                Err(mismatch())
            };
        }

        match wanted {
            Type::Param(param) => self.bind(*param, actual, args),
            Type::Applied {
                ctor,
                args: wanted_args,
            } => {
                let actual_args =
                    find_instance(*ctor, actual, self.hierarchy).ok_or_else(mismatch)?;
                for (index, (w, a)) in wanted_args.iter().zip(&actual_args).enumerate() {
                    self.infer_in(w, a, args, UnifyContext::TypeArg { index })?;
                }
                Ok(())
            }
            Type::Array(wanted_elem) => match actual {
                Type::Array(actual_elem) => {
                    self.infer_in(wanted_elem, actual_elem, args, UnifyContext::ArrayElement)
                }
                _ => Err(mismatch()),
            },
            Type::Function {
                params: wanted_params,
                ret: wanted_ret,
            } => match actual {
                Type::Function {
                    params: actual_params,
                    ret: actual_ret,
                } => {
                    if wanted_params.len() != actual_params.len() {
                        return Err(UnifyError::ArityMismatch {
                            expected: wanted_params.len(),
                            found: actual_params.len(),
                        });
                    }
                    for (index, (w, a)) in wanted_params.iter().zip(actual_params).enumerate() {
                        self.infer_in(w, a, args, UnifyContext::FunctionParam { index })?;
                    }
                    self.infer_in(wanted_ret, actual_ret, args, UnifyContext::FunctionReturn)
                }
                _ => Err(mismatch()),
            },
            Type::Quoted(wanted_inner) => match actual {
                Type::Quoted(actual_inner) => {
                    self.infer_in(wanted_inner, actual_inner, args, UnifyContext::QuotedBody)
                }
                _ => Err(mismatch()),
            },
            _ => Err(mismatch()),
        }
    }

    fn bind(&self, param: GenericParam, actual: &Type, args: &mut TypeArgs) -> Result<(), UnifyError> {
        // `null` says nothing about the placeholder.
        if *actual == Type::Null {
            return Ok(());
        }
        let Some(slot) = args.slot_mut(param) else {
            return Err(UnifyError::Mismatch {
                expected: Type::Param(param),
                found: actual.clone(),
                context: UnifyContext::TopLevel,
            });
        };
        match slot {
            Some(bound) if is_assignable(bound, actual, self.hierarchy) => Ok(()),
            Some(bound) => Err(UnifyError::Conflict {
                param,
                bound: bound.clone(),
                found: actual.clone(),
            }),
            None => {
                tracing::trace!(%param, %actual, "bound placeholder");
                *slot = Some(actual.clone());
                Ok(())
            }
        }
    }
}
