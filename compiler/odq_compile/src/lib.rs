//! odq Compile - Query Expression Compiler
//!
//! Turns a parsed query tree (`odq_ir::Node`) into a typed expression graph
//! over the host type system (`odq_types`), and back.
//!
//! - `FunctionRegistry`: query function names mapped to host members, with
//!   argument reordering and preferred call style
//! - `QueryCompiler`: node-to-expression compilation with overload
//!   selection, generic inference, enum and numeric coercion
//! - `QueryRenderer`: expression-to-query rendering
//! - `TypeResolver`: the caller's resource model; `SchemaResolver` is a
//!   ready-made implementation backed by a JSON schema
//!
//! # Example
//!
//! ```text
//! let registry = FunctionRegistry::standard()?;
//! let compiler = QueryCompiler::new(&registry, &resolver);
//! let predicate = compiler.compile_predicate(&Type::entity("Critter"), &node)?;
//! ```

mod compile;
mod error;
mod expr;
pub mod host;
mod registry;
mod render;
mod resolve;
mod schema;
mod stack;

pub use compile::{QueryCompiler, THIS_PARAM};
pub use error::{CompileError, ErrorKind};
pub use expr::{BinaryOp, Expr, ExprKind, Param, ParamId, Value};
pub use registry::{CallStyle, FunctionRegistry, MappingError, MemberMapping};
pub use render::{QueryRenderer, RenderError, RenderStyle};
pub use resolve::TypeResolver;
pub use schema::{EntityDecl, EnumDecl, EnumMemberDecl, Schema, SchemaError, SchemaResolver};
pub use stack::ensure_sufficient_stack;
