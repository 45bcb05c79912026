//! Unification error types.

use thiserror::Error;

use crate::{GenericParam, Type};

/// Error from matching a generic signature against actual types.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Error)]
pub enum UnifyError {
    /// The actual type does not fit the wanted type.
    #[error("type mismatch in {}: expected {expected}, found {found}", .context.description())]
    Mismatch {
        expected: Type,
        found: Type,
        context: UnifyContext,
    },

    /// A placeholder was already bound to an incompatible type.
    #[error("conflicting bindings for {param}: {bound} and {found}")]
    Conflict {
        param: GenericParam,
        bound: Type,
        found: Type,
    },

    /// Function types with different parameter counts.
    #[error("expected {expected} function parameters, found {found}")]
    ArityMismatch { expected: usize, found: usize },
}

/// Where inside a signature a mismatch occurred.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum UnifyContext {
    #[default]
    TopLevel,
    /// Zero-based function parameter.
    FunctionParam { index: usize },
    FunctionReturn,
    ArrayElement,
    /// Zero-based type argument of a parameterized type.
    TypeArg { index: usize },
    QuotedBody,
}

impl UnifyContext {
    pub fn description(self) -> &'static str {
        match self {
            Self::TopLevel => "types",
            Self::FunctionParam { .. } => "function parameter",
            Self::FunctionReturn => "function return type",
            Self::ArrayElement => "array element type",
            Self::TypeArg { .. } => "type argument",
            Self::QuotedBody => "quoted function type",
        }
    }
}
