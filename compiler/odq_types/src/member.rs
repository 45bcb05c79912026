//! Host members: properties and methods, possibly generic.
//!
//! A `MemberTemplate` is the definition as declared on the host, written in
//! terms of placeholders. A `Member` is a template together with the type
//! arguments chosen for its declaring type and for itself. Arguments may
//! still be placeholders, which is how a generic definition is represented.
//!
//! All instantiations of one template share its `MemberId`, so identity
//! lookups work no matter how far a member has been instantiated.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::{GenericOrigin, GenericParam, Type};

/// Stable identity of a host member definition.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
pub struct MemberId(&'static str);

impl MemberId {
    pub const fn new(key: &'static str) -> Self {
        Self(key)
    }

    pub const fn as_str(self) -> &'static str {
        self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// How a member is invoked.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum MemberKind {
    /// Readable property on an instance; no parameters.
    Property,
    /// Method invoked on an instance.
    Method,
    /// Method without a receiver.
    StaticMethod,
}

/// A member definition as declared on the host.
#[derive(Clone, Debug)]
pub struct MemberTemplate {
    pub id: MemberId,
    /// Host-side name, e.g. `StartsWith`.
    pub name: &'static str,
    pub kind: MemberKind,
    /// Declaring type, using `T{i}` placeholders when generic.
    pub declaring: Type,
    /// Number of `T{i}` placeholders on the declaring type.
    pub declaring_generics: u8,
    /// Number of `M{i}` placeholders on the member itself.
    pub method_generics: u8,
    /// Parameter types, excluding the receiver.
    pub params: Vec<Type>,
    /// Result type (property type for properties).
    pub ret: Type,
}

impl MemberTemplate {
    pub fn property(id: MemberId, name: &'static str, declaring: Type, ty: Type) -> Self {
        Self::build(id, name, MemberKind::Property, declaring, Vec::new(), ty)
    }

    pub fn method(
        id: MemberId,
        name: &'static str,
        declaring: Type,
        params: Vec<Type>,
        ret: Type,
    ) -> Self {
        Self::build(id, name, MemberKind::Method, declaring, params, ret)
    }

    pub fn static_method(
        id: MemberId,
        name: &'static str,
        declaring: Type,
        params: Vec<Type>,
        ret: Type,
    ) -> Self {
        Self::build(id, name, MemberKind::StaticMethod, declaring, params, ret)
    }

    fn build(
        id: MemberId,
        name: &'static str,
        kind: MemberKind,
        declaring: Type,
        params: Vec<Type>,
        ret: Type,
    ) -> Self {
        let mut template = Self {
            id,
            name,
            kind,
            declaring,
            declaring_generics: 0,
            method_generics: 0,
            params,
            ret,
        };
        template.declaring_generics = template.count_params(GenericOrigin::Declaring);
        template.method_generics = template.count_params(GenericOrigin::Method);
        template
    }

    /// One more than the highest placeholder index of `origin` in the
    /// signature.
    fn count_params(&self, origin: GenericOrigin) -> u8 {
        fn highest(ty: &Type, origin: GenericOrigin) -> Option<u8> {
            match ty {
                Type::Param(param) if param.origin == origin => Some(param.index),
                other => other
                    .children()
                    .into_iter()
                    .filter_map(|child| highest(child, origin))
                    .max(),
            }
        }

        std::iter::once(&self.declaring)
            .chain(&self.params)
            .chain(std::iter::once(&self.ret))
            .filter_map(|ty| highest(ty, origin))
            .max()
            .map_or(0, |index| index + 1)
    }

    /// Identity arguments: every placeholder bound to itself.
    fn identity_args(count: u8, origin: GenericOrigin) -> Vec<Type> {
        (0..count)
            .map(|index| Type::Param(GenericParam { origin, index }))
            .collect()
    }
}

/// A template plus the type arguments chosen for it.
#[derive(Clone, Debug)]
pub struct Member {
    template: Arc<MemberTemplate>,
    declaring_args: Vec<Type>,
    method_args: Vec<Type>,
}

impl Member {
    /// The generic definition of `template`: all arguments are placeholders.
    pub fn definition(template: Arc<MemberTemplate>) -> Self {
        let declaring_args =
            MemberTemplate::identity_args(template.declaring_generics, GenericOrigin::Declaring);
        let method_args =
            MemberTemplate::identity_args(template.method_generics, GenericOrigin::Method);
        Self {
            template,
            declaring_args,
            method_args,
        }
    }

    /// `template` instantiated with explicit arguments.
    ///
    /// Missing trailing arguments stay as placeholders; extra arguments are
    /// ignored.
    pub fn instantiate(
        template: Arc<MemberTemplate>,
        declaring_args: &[Type],
        method_args: &[Type],
    ) -> Self {
        Self::definition(template)
            .with_declaring_args(declaring_args)
            .with_method_args(method_args)
    }

    /// Replace the declaring-type arguments.
    #[must_use]
    pub fn with_declaring_args(mut self, args: &[Type]) -> Self {
        for (slot, arg) in self.declaring_args.iter_mut().zip(args) {
            *slot = arg.clone();
        }
        self
    }

    /// Replace the member's own type arguments.
    #[must_use]
    pub fn with_method_args(mut self, args: &[Type]) -> Self {
        for (slot, arg) in self.method_args.iter_mut().zip(args) {
            *slot = arg.clone();
        }
        self
    }

    /// Turn wildcard instantiations back into the generic definition.
    ///
    /// If any declaring-type argument mentions `Wildcard`, all declaring-type
    /// arguments revert to placeholders; the same applies independently to
    /// the member's own arguments. Concrete instantiations are returned
    /// unchanged.
    #[must_use]
    pub fn generic_definition_over_wildcard(mut self) -> Self {
        if self.declaring_args.iter().any(Type::has_wildcard) {
            self.declaring_args = MemberTemplate::identity_args(
                self.template.declaring_generics,
                GenericOrigin::Declaring,
            );
        }
        if self.method_args.iter().any(Type::has_wildcard) {
            self.method_args =
                MemberTemplate::identity_args(self.template.method_generics, GenericOrigin::Method);
        }
        self
    }

    pub fn id(&self) -> MemberId {
        self.template.id
    }

    pub fn name(&self) -> &'static str {
        self.template.name
    }

    pub fn kind(&self) -> MemberKind {
        self.template.kind
    }

    pub fn template(&self) -> &Arc<MemberTemplate> {
        &self.template
    }

    pub fn declaring_args(&self) -> &[Type] {
        &self.declaring_args
    }

    pub fn method_args(&self) -> &[Type] {
        &self.method_args
    }

    /// True for properties and instance methods.
    pub fn has_receiver(&self) -> bool {
        !matches!(self.template.kind, MemberKind::StaticMethod)
    }

    /// True while any declaring-type argument is still a placeholder.
    pub fn has_open_declaring(&self) -> bool {
        self.declaring_args.iter().any(Type::has_params)
    }

    /// True while any of the member's own arguments is still a placeholder.
    pub fn has_open_method(&self) -> bool {
        self.method_args.iter().any(Type::has_params)
    }

    /// Number of parameters including the receiver, i.e. the number of
    /// query-language arguments a call to this member takes.
    pub fn arity(&self) -> usize {
        self.template.params.len() + usize::from(self.has_receiver())
    }

    fn apply(&self, ty: &Type) -> Type {
        ty.substitute(&|param| {
            let args = match param.origin {
                GenericOrigin::Declaring => &self.declaring_args,
                GenericOrigin::Method => &self.method_args,
            };
            args.get(usize::from(param.index)).cloned()
        })
    }

    /// Declaring type under the current arguments.
    pub fn declaring_type(&self) -> Type {
        self.apply(&self.template.declaring)
    }

    /// Parameter types under the current arguments.
    pub fn params(&self) -> Vec<Type> {
        self.template
            .params
            .iter()
            .map(|param| self.apply(param))
            .collect()
    }

    /// Result type under the current arguments.
    pub fn ret(&self) -> Type {
        self.apply(&self.template.ret)
    }
}

impl PartialEq for Member {
    fn eq(&self, other: &Self) -> bool {
        self.template.id == other.template.id
            && self.declaring_args == other.declaring_args
            && self.method_args == other.method_args
    }
}

impl Eq for Member {}

impl Hash for Member {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.template.id.hash(state);
        self.declaring_args.hash(state);
        self.method_args.hash(state);
    }
}

impl fmt::Display for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.declaring_type(), self.template.name)?;
        if !self.method_args.is_empty() {
            f.write_str("<")?;
            for (i, arg) in self.method_args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{arg}")?;
            }
            f.write_str(">")?;
        }
        if self.template.kind != MemberKind::Property {
            f.write_str("(")?;
            for (i, param) in self.params().iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{param}")?;
            }
            f.write_str(")")?;
        }
        Ok(())
    }
}
