//! Symbolic type representation.

use std::fmt;
use std::sync::Arc;

/// A host type.
///
/// Types are compared structurally. Enumerations compare by definition
/// (name, underlying type and members), entities by name.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Type {
    // ===== Primitives =====
    Bool,
    Byte,
    Int16,
    Int32,
    Int64,
    Single,
    Double,
    Decimal,
    Char,
    String,
    Guid,
    DateTime,

    // ===== Special types =====
    /// Top type; every value is assignable to it.
    Object,
    /// Type of the `null` literal.
    Null,

    // ===== Named types =====
    /// Enumeration with an integral underlying type.
    Enum(Arc<EnumDef>),
    /// Resource type declared by the type resolver.
    Entity(Arc<str>),

    // ===== Compound types =====
    /// Fixed-size array `T[]`.
    Array(Box<Type>),
    /// Parameterized library type such as `Enumerable<T>`.
    Applied { ctor: TypeCtor, args: Vec<Type> },
    /// Function value `(P1, P2, ...) -> R`.
    Function { params: Vec<Type>, ret: Box<Type> },
    /// Deferred expression wrapping a function type.
    ///
    /// A lambda compiled against this type is quoted: the consumer inspects
    /// it instead of invoking it.
    Quoted(Box<Type>),

    // ===== Generics =====
    /// Unbound generic placeholder.
    Param(GenericParam),
    /// Registration-time "any type" marker.
    Wildcard,
}

/// Constructor of a parameterized library type.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeCtor {
    /// Sequence that can be enumerated.
    Enumerable,
    /// Sequence with a known count.
    Collection,
    /// Indexable, growable collection.
    List,
    /// Keyed lookup table.
    Dictionary,
}

impl TypeCtor {
    /// Number of type arguments this constructor takes.
    pub const fn arity(self) -> usize {
        match self {
            Self::Enumerable | Self::Collection | Self::List => 1,
            Self::Dictionary => 2,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Enumerable => "Enumerable",
            Self::Collection => "Collection",
            Self::List => "List",
            Self::Dictionary => "Dictionary",
        }
    }

    /// Look up a constructor by its display name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Enumerable" => Some(Self::Enumerable),
            "Collection" => Some(Self::Collection),
            "List" => Some(Self::List),
            "Dictionary" => Some(Self::Dictionary),
            _ => None,
        }
    }
}

/// Who declares a generic placeholder.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum GenericOrigin {
    /// A type parameter of the member's declaring type.
    Declaring,
    /// A type parameter of the member itself.
    Method,
}

/// A generic placeholder: origin plus zero-based position.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct GenericParam {
    pub origin: GenericOrigin,
    pub index: u8,
}

impl GenericParam {
    pub const fn declaring(index: u8) -> Self {
        Self {
            origin: GenericOrigin::Declaring,
            index,
        }
    }

    pub const fn method(index: u8) -> Self {
        Self {
            origin: GenericOrigin::Method,
            index,
        }
    }
}

impl fmt::Display for GenericParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.origin {
            GenericOrigin::Declaring => write!(f, "T{}", self.index),
            GenericOrigin::Method => write!(f, "M{}", self.index),
        }
    }
}

/// An enumeration definition.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct EnumDef {
    name: String,
    underlying: Type,
    members: Vec<(String, i64)>,
}

impl EnumDef {
    /// Create an enumeration backed by `Int32`.
    pub fn new<S: Into<String>>(
        name: impl Into<String>,
        members: impl IntoIterator<Item = (S, i64)>,
    ) -> Self {
        Self {
            name: name.into(),
            underlying: Type::Int32,
            members: members
                .into_iter()
                .map(|(member, value)| (member.into(), value))
                .collect(),
        }
    }

    /// Change the underlying integral type.
    ///
    /// Non-integral types are ignored and the current type is kept.
    #[must_use]
    pub fn with_underlying(mut self, underlying: Type) -> Self {
        if underlying.is_integral() {
            self.underlying = underlying;
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn underlying(&self) -> &Type {
        &self.underlying
    }

    pub fn members(&self) -> &[(String, i64)] {
        &self.members
    }

    /// Find a member value by name, ignoring ASCII case.
    pub fn parse_member(&self, name: &str) -> Option<i64> {
        self.members
            .iter()
            .find(|(member, _)| member.eq_ignore_ascii_case(name))
            .map(|(_, value)| *value)
    }

    /// Find the first member name carrying `value`.
    pub fn member_name(&self, value: i64) -> Option<&str> {
        self.members
            .iter()
            .find(|(_, v)| *v == value)
            .map(|(member, _)| member.as_str())
    }
}

impl Type {
    // ===== Constructors =====

    pub fn enumerable(elem: Type) -> Self {
        Type::Applied {
            ctor: TypeCtor::Enumerable,
            args: vec![elem],
        }
    }

    pub fn collection(elem: Type) -> Self {
        Type::Applied {
            ctor: TypeCtor::Collection,
            args: vec![elem],
        }
    }

    pub fn list(elem: Type) -> Self {
        Type::Applied {
            ctor: TypeCtor::List,
            args: vec![elem],
        }
    }

    pub fn dictionary(key: Type, value: Type) -> Self {
        Type::Applied {
            ctor: TypeCtor::Dictionary,
            args: vec![key, value],
        }
    }

    pub fn array(elem: Type) -> Self {
        Type::Array(Box::new(elem))
    }

    pub fn function(params: Vec<Type>, ret: Type) -> Self {
        Type::Function {
            params,
            ret: Box::new(ret),
        }
    }

    pub fn quoted(inner: Type) -> Self {
        Type::Quoted(Box::new(inner))
    }

    pub fn entity(name: &str) -> Self {
        Type::Entity(Arc::from(name))
    }

    pub fn enumeration(def: EnumDef) -> Self {
        Type::Enum(Arc::new(def))
    }

    /// Placeholder `T{index}` of the declaring type.
    pub const fn declaring_param(index: u8) -> Self {
        Type::Param(GenericParam::declaring(index))
    }

    /// Placeholder `M{index}` of the member.
    pub const fn method_param(index: u8) -> Self {
        Type::Param(GenericParam::method(index))
    }

    // ===== Classification =====

    pub fn is_integral(&self) -> bool {
        matches!(self, Type::Byte | Type::Int16 | Type::Int32 | Type::Int64)
    }

    pub fn is_numeric(&self) -> bool {
        self.is_integral() || matches!(self, Type::Single | Type::Double | Type::Decimal)
    }

    /// Types that support `lt`, `gt`, `le`, `ge`.
    pub fn is_ordered(&self) -> bool {
        self.is_numeric() || matches!(self, Type::Char | Type::DateTime)
    }

    /// Types whose values may be `null`.
    pub fn is_reference(&self) -> bool {
        matches!(
            self,
            Type::String
                | Type::Object
                | Type::Null
                | Type::Entity(_)
                | Type::Array(_)
                | Type::Applied { .. }
                | Type::Function { .. }
                | Type::Quoted(_)
        )
    }

    pub fn as_enum(&self) -> Option<&EnumDef> {
        match self {
            Type::Enum(def) => Some(def),
            _ => None,
        }
    }

    /// Element type of an array.
    pub fn array_element(&self) -> Option<&Type> {
        match self {
            Type::Array(elem) => Some(elem),
            _ => None,
        }
    }

    /// True if any generic placeholder occurs in this type.
    pub fn has_params(&self) -> bool {
        self.any(&|ty| matches!(ty, Type::Param(_)))
    }

    /// True if a placeholder of the given origin occurs in this type.
    pub fn has_params_of(&self, origin: GenericOrigin) -> bool {
        self.any(&|ty| matches!(ty, Type::Param(p) if p.origin == origin))
    }

    pub fn has_wildcard(&self) -> bool {
        self.any(&|ty| matches!(ty, Type::Wildcard))
    }

    /// Direct type arguments (element types, function parts).
    pub fn children(&self) -> Vec<&Type> {
        match self {
            Type::Array(inner) | Type::Quoted(inner) => vec![inner],
            Type::Applied { args, .. } => args.iter().collect(),
            Type::Function { params, ret } => {
                params.iter().chain(std::iter::once(&**ret)).collect()
            }
            _ => Vec::new(),
        }
    }

    fn any(&self, pred: &dyn Fn(&Type) -> bool) -> bool {
        pred(self) || self.children().into_iter().any(|child| child.any(pred))
    }

    // ===== Substitution =====

    /// Replace placeholders for which `lookup` returns a type.
    ///
    /// Placeholders without a binding are left in place.
    #[must_use]
    pub fn substitute(&self, lookup: &dyn Fn(GenericParam) -> Option<Type>) -> Type {
        match self {
            Type::Param(param) => lookup(*param).unwrap_or_else(|| self.clone()),
            Type::Array(elem) => Type::Array(Box::new(elem.substitute(lookup))),
            Type::Quoted(inner) => Type::Quoted(Box::new(inner.substitute(lookup))),
            Type::Applied { ctor, args } => Type::Applied {
                ctor: *ctor,
                args: args.iter().map(|arg| arg.substitute(lookup)).collect(),
            },
            Type::Function { params, ret } => Type::Function {
                params: params.iter().map(|p| p.substitute(lookup)).collect(),
                ret: Box::new(ret.substitute(lookup)),
            },
            _ => self.clone(),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Bool => f.write_str("Bool"),
            Type::Byte => f.write_str("Byte"),
            Type::Int16 => f.write_str("Int16"),
            Type::Int32 => f.write_str("Int32"),
            Type::Int64 => f.write_str("Int64"),
            Type::Single => f.write_str("Single"),
            Type::Double => f.write_str("Double"),
            Type::Decimal => f.write_str("Decimal"),
            Type::Char => f.write_str("Char"),
            Type::String => f.write_str("String"),
            Type::Guid => f.write_str("Guid"),
            Type::DateTime => f.write_str("DateTime"),
            Type::Object => f.write_str("Object"),
            Type::Null => f.write_str("Null"),
            Type::Enum(def) => f.write_str(def.name()),
            Type::Entity(name) => f.write_str(name),
            Type::Array(elem) => write!(f, "{elem}[]"),
            Type::Applied { ctor, args } => {
                write!(f, "{}<", ctor.name())?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(">")
            }
            Type::Function { params, ret } => {
                f.write_str("(")?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{param}")?;
                }
                write!(f, ") -> {ret}")
            }
            Type::Quoted(inner) => write!(f, "Expression<{inner}>"),
            Type::Param(param) => write!(f, "{param}"),
            Type::Wildcard => f.write_str("?"),
        }
    }
}
