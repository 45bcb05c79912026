//! odqc - command-line driver for the odq query compiler.
//!
//! Reads a query tree and a schema as JSON, compiles the tree against the
//! standard function registry, and prints the expression graph and the
//! query rendered back from it.
//!
//! # Debugging
//!
//! - `RUST_LOG=odq_compile=debug`: resolved calls and registry construction
//! - `RUST_LOG=odq_compile=trace`: every candidate tried and rejected
//! - `--trace-tree`: the same events as an indented call tree

mod options;

pub use options::{parse_compile_options, CompileOptions, OptionsError};

use std::fmt::Write as _;
use std::sync::Once;

use odq_compile::{
    CallStyle, CompileError, FunctionRegistry, MappingError, QueryCompiler, QueryRenderer,
    RenderError, Schema, SchemaError, SchemaResolver,
};
use odq_ir::Node;
use thiserror::Error;

/// Failure of a driver command.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid JSON in {what}: {source}")]
    Json {
        what: &'static str,
        source: serde_json::Error,
    },

    #[error("schema: {0}")]
    Schema(#[from] SchemaError),

    #[error("registry: {0}")]
    Registry(#[from] MappingError),

    #[error("unknown root entity `{name}`")]
    UnknownRoot { name: String },

    #[error("error[{}]: {0}", .0.code())]
    Compile(#[from] CompileError),

    #[error("render: {0}")]
    Render(#[from] RenderError),
}

static TRACING_INIT: Once = Once::new();

/// Install a subscriber.
///
/// With `tree`, events are printed as an indented call tree filtered by
/// `RUST_LOG` (default `debug`). Otherwise logging is only enabled when
/// `RUST_LOG` is set. Safe to call more than once.
pub fn init_tracing(tree: bool) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if tree {
            let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
            tracing_subscriber::registry()
                .with(tracing_tree::HierarchicalLayer::new(2).with_targets(true))
                .with(filter)
                .init();
        } else if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .init();
        }
    });
}

/// Read `path`, naming it in the error.
pub fn read_file(path: &str) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Io {
        path: path.to_string(),
        source,
    })
}

/// `odqc compile`: compile `ast_json` against `schema_json`.
///
/// Returns the text to print: the graph dump when requested, then the
/// rendered query.
pub fn compile_source(
    schema_json: &str,
    ast_json: &str,
    options: &CompileOptions,
) -> Result<String, CliError> {
    let schema: Schema = serde_json::from_str(schema_json).map_err(|source| CliError::Json {
        what: "schema",
        source,
    })?;
    let node: Node = serde_json::from_str(ast_json).map_err(|source| CliError::Json {
        what: "query tree",
        source,
    })?;

    let resolver = SchemaResolver::new(&schema)?;
    let root = resolver
        .entity(&options.root)
        .ok_or_else(|| CliError::UnknownRoot {
            name: options.root.clone(),
        })?;
    let registry = FunctionRegistry::standard()?;
    let expr = QueryCompiler::new(&registry, &resolver).compile_predicate(&root, &node)?;
    let rendered = QueryRenderer::new(&registry, options.style).render(&expr)?;

    let mut out = String::new();
    if options.graph {
        out.push_str(&expr.dump());
    }
    out.push_str(&rendered);
    out.push('\n');
    Ok(out)
}

/// `odqc functions`: the standard registry, one mapping per line.
pub fn list_functions() -> Result<String, CliError> {
    let registry = FunctionRegistry::standard()?;
    let width = registry
        .iter()
        .map(|mapping| mapping.static_call_format().len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for mapping in registry.iter() {
        let chained = match mapping.preferred_style() {
            CallStyle::Chained => " (chained)",
            CallStyle::Static => "",
        };
        // Writing to a String cannot fail.
        let _ = writeln!(
            out,
            "{:width$}  {}{chained}",
            mapping.static_call_format(),
            mapping.member()
        );
    }
    Ok(out)
}
