//! odq IR - Query Syntax Tree
//!
//! This crate contains the syntax tree handed to the expression compiler by
//! the query parser:
//! - `Node`: binary operators, calls, indexers, symbols, lambdas and literals
//! - `BinaryOperator`: the operator kinds of the query language
//! - `Guid`: 128-bit identifier literal payload
//!
//! The tree is immutable once built. The compiler only borrows it and never
//! reports lexical or syntactic errors; those belong to the producer.
//!
//! With the `serde` feature enabled every type here can be read from and
//! written to JSON, which is how the `odqc` driver receives trees.

mod guid;
mod node;
mod operators;

pub use guid::{Guid, GuidParseError};
pub use node::{format_datetime, write_quoted, Node};
pub use operators::BinaryOperator;
