//! Binary operators of the query language.

/// Binary operator kinds produced by the parser.
///
/// `Dot` is member access / call chaining; every other kind is a value
/// operator.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BinaryOperator {
    // Access
    Dot,

    // Logical
    AndAlso,
    OrElse,

    // Arithmetic
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,

    // Comparison
    Equal,
    NotEqual,
    LessThan,
    GreaterThan,
    LessThanOrEqual,
    GreaterThanOrEqual,

    // Membership
    In,
}

impl BinaryOperator {
    /// Returns the query-language keyword for this operator.
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Dot => ".",
            Self::AndAlso => "and",
            Self::OrElse => "or",
            Self::Add => "add",
            Self::Subtract => "sub",
            Self::Multiply => "mul",
            Self::Divide => "div",
            Self::Modulo => "mod",
            Self::Equal => "eq",
            Self::NotEqual => "ne",
            Self::LessThan => "lt",
            Self::GreaterThan => "gt",
            Self::LessThanOrEqual => "le",
            Self::GreaterThanOrEqual => "ge",
            Self::In => "in",
        }
    }

    /// Returns the binding strength of this operator.
    ///
    /// Higher number = binds more tightly. Used when printing trees to decide
    /// where parentheses are needed.
    ///
    /// - 1: `or`
    /// - 2: `and`
    /// - 3: `eq` `ne`
    /// - 4: `lt` `gt` `le` `ge` `in`
    /// - 5: `add` `sub`
    /// - 6: `mul` `div` `mod`
    /// - 7: `.`
    pub const fn precedence(self) -> u8 {
        match self {
            Self::OrElse => 1,
            Self::AndAlso => 2,
            Self::Equal | Self::NotEqual => 3,
            Self::LessThan
            | Self::GreaterThan
            | Self::LessThanOrEqual
            | Self::GreaterThanOrEqual
            | Self::In => 4,
            Self::Add | Self::Subtract => 5,
            Self::Multiply | Self::Divide | Self::Modulo => 6,
            Self::Dot => 7,
        }
    }

    /// True for `eq` and `ne`.
    pub const fn is_equality(self) -> bool {
        matches!(self, Self::Equal | Self::NotEqual)
    }

    /// True for `lt`, `gt`, `le` and `ge`.
    pub const fn is_relational(self) -> bool {
        matches!(
            self,
            Self::LessThan | Self::GreaterThan | Self::LessThanOrEqual | Self::GreaterThanOrEqual
        )
    }

    /// True for `add`, `sub`, `mul`, `div` and `mod`.
    pub const fn is_arithmetic(self) -> bool {
        matches!(
            self,
            Self::Add | Self::Subtract | Self::Multiply | Self::Divide | Self::Modulo
        )
    }

    /// True for `and` and `or`.
    pub const fn is_logical(self) -> bool {
        matches!(self, Self::AndAlso | Self::OrElse)
    }
}
