//! Compilation errors.
//!
//! Everything here is terminal: a failed compilation yields no graph.
//! Local failures (a candidate that does not type-check, a generic match
//! that does not fit) are handled inside the compiler and never surface
//! unless they leave it with nothing else to try.

use std::fmt;

use odq_types::Type;
use thiserror::Error;

/// Error returned by [`QueryCompiler`](crate::QueryCompiler).
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum CompileError {
    /// No registered function accepts the call.
    #[error("no function `{name}` taking {arity} argument(s) matches the given arguments")]
    UnknownFunction { name: String, arity: usize },

    /// A symbol is neither a parameter nor a member of the receiver.
    #[error("unknown symbol `{name}` on {on}")]
    UnknownSymbol { name: String, on: Type },

    /// A type name the resolver does not know.
    #[error("unknown type `{name}`")]
    UnknownType { name: String },

    /// A built-in construct was called with the wrong number of arguments.
    #[error("`{function}` takes {expected} argument(s), found {found}")]
    ArgumentCountMismatch {
        function: String,
        expected: String,
        found: usize,
    },

    /// Operand or argument types that cannot work together.
    #[error("type mismatch: {message}")]
    TypeMismatch { message: String },

    /// A well-formed tree using something the compiler does not handle.
    #[error("unsupported: {message}")]
    UnsupportedConstruct { message: String },
}

impl CompileError {
    pub fn type_mismatch(message: impl Into<String>) -> Self {
        Self::TypeMismatch {
            message: message.into(),
        }
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::UnsupportedConstruct {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownFunction { .. } => ErrorKind::UnknownFunction,
            Self::UnknownSymbol { .. } => ErrorKind::UnknownSymbol,
            Self::UnknownType { .. } => ErrorKind::UnknownType,
            Self::ArgumentCountMismatch { .. } => ErrorKind::ArgumentCountMismatch,
            Self::TypeMismatch { .. } => ErrorKind::TypeMismatch,
            Self::UnsupportedConstruct { .. } => ErrorKind::UnsupportedConstruct,
        }
    }

    /// Stable diagnostic code, e.g. `E2001`.
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }
}

/// Category of a [`CompileError`].
///
/// Codes follow the `E2xxx` range used for type errors.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorKind {
    UnknownFunction,
    UnknownSymbol,
    UnknownType,
    ArgumentCountMismatch,
    TypeMismatch,
    UnsupportedConstruct,
}

impl ErrorKind {
    pub const fn code(self) -> &'static str {
        match self {
            Self::UnknownFunction => "E2001",
            Self::UnknownSymbol => "E2002",
            Self::UnknownType => "E2003",
            Self::ArgumentCountMismatch => "E2004",
            Self::TypeMismatch => "E2005",
            Self::UnsupportedConstruct => "E2006",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
