//! `odqc compile` flags.

use odq_compile::RenderStyle;
use thiserror::Error;

#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum OptionsError {
    #[error("missing value for `{flag}`")]
    MissingValue { flag: &'static str },

    #[error("unknown render style `{0}`; expected `static` or `preferred`")]
    UnknownStyle(String),

    #[error("unknown option `{0}`")]
    UnknownOption(String),

    #[error("missing {0}")]
    Missing(&'static str),
}

/// Parsed `odqc compile` arguments.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CompileOptions {
    pub schema: String,
    pub root: String,
    pub ast: String,
    /// Print the expression graph before the rendered query.
    pub graph: bool,
    pub style: RenderStyle,
    pub trace_tree: bool,
}

/// Parse the arguments following `compile`.
pub fn parse_compile_options(args: &[String]) -> Result<CompileOptions, OptionsError> {
    let mut schema = None;
    let mut root = None;
    let mut ast = None;
    let mut graph = false;
    let mut style = RenderStyle::Preferred;
    let mut trace_tree = false;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--schema" => {
                schema = Some(iter.next().ok_or(OptionsError::MissingValue { flag: "--schema" })?);
            }
            "--root" => {
                root = Some(iter.next().ok_or(OptionsError::MissingValue { flag: "--root" })?);
            }
            "--style" => {
                let value = iter.next().ok_or(OptionsError::MissingValue { flag: "--style" })?;
                style = match value.as_str() {
                    "static" => RenderStyle::Static,
                    "preferred" => RenderStyle::Preferred,
                    other => return Err(OptionsError::UnknownStyle(other.to_string())),
                };
            }
            "--graph" => graph = true,
            "--trace-tree" => trace_tree = true,
            flag if flag.starts_with('-') => return Err(OptionsError::UnknownOption(flag.to_string())),
            _ if ast.is_none() => ast = Some(arg),
            other => return Err(OptionsError::UnknownOption(other.to_string())),
        }
    }

    Ok(CompileOptions {
        schema: schema.ok_or(OptionsError::Missing("--schema <file>"))?.clone(),
        root: root.ok_or(OptionsError::Missing("--root <Entity>"))?.clone(),
        ast: ast.ok_or(OptionsError::Missing("query tree file"))?.clone(),
        graph,
        style,
        trace_tree,
    })
}
