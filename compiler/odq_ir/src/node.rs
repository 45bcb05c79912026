//! Query syntax tree nodes.

use std::fmt;

use chrono::{NaiveDateTime, Timelike};

use crate::{BinaryOperator, Guid};

/// A node of the parsed query tree.
///
/// Children are owned; the tree is built once by the parser and then only
/// borrowed by the compiler.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Node {
    /// `left op right`, including member access (`Dot`).
    Binary {
        op: BinaryOperator,
        left: Box<Node>,
        right: Box<Node>,
    },
    /// `name(args...)`.
    MethodCall { name: String, args: Vec<Node> },
    /// `name[args...]`.
    IndexerAccess { name: String, args: Vec<Node> },
    /// A bare identifier: property name, lambda parameter, `this`, or one of
    /// the keywords `true`, `false`, `null`.
    Symbol(String),
    /// `x:body`.
    Lambda { params: Vec<String>, body: Box<Node> },
    /// `'text'`.
    String(String),
    /// Numeric literal, kept as written (including any type suffix).
    Number(String),
    /// `guid'...'`.
    Guid(Guid),
    /// `datetime'...'`.
    DateTime(NaiveDateTime),
    /// `[a, b, ...]`.
    Array(Vec<Node>),
}

impl Node {
    pub fn binary(op: BinaryOperator, left: Node, right: Node) -> Self {
        Node::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// `left.right`.
    pub fn dot(left: Node, right: Node) -> Self {
        Self::binary(BinaryOperator::Dot, left, right)
    }

    pub fn call(name: impl Into<String>, args: Vec<Node>) -> Self {
        Node::MethodCall {
            name: name.into(),
            args,
        }
    }

    pub fn indexer(name: impl Into<String>, args: Vec<Node>) -> Self {
        Node::IndexerAccess {
            name: name.into(),
            args,
        }
    }

    pub fn symbol(name: impl Into<String>) -> Self {
        Node::Symbol(name.into())
    }

    pub fn lambda<S: Into<String>>(params: impl IntoIterator<Item = S>, body: Node) -> Self {
        Node::Lambda {
            params: params.into_iter().map(Into::into).collect(),
            body: Box::new(body),
        }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Node::String(value.into())
    }

    pub fn number(text: impl Into<String>) -> Self {
        Node::Number(text.into())
    }

    pub fn array(items: Vec<Node>) -> Self {
        Node::Array(items)
    }

    /// Dotted path `a.b.c` built from symbols, left-associated.
    ///
    /// Returns `None` for an empty path.
    pub fn path<'a>(segments: impl IntoIterator<Item = &'a str>) -> Option<Self> {
        segments
            .into_iter()
            .map(Node::symbol)
            .reduce(Node::dot)
    }

    /// Short name of the variant, used in diagnostics.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Node::Binary { .. } => "binary operator",
            Node::MethodCall { .. } => "method call",
            Node::IndexerAccess { .. } => "indexer access",
            Node::Symbol(_) => "symbol",
            Node::Lambda { .. } => "lambda",
            Node::String(_) => "string literal",
            Node::Number(_) => "number literal",
            Node::Guid(_) => "guid literal",
            Node::DateTime(_) => "datetime literal",
            Node::Array(_) => "array literal",
        }
    }
}

/// Format a datetime the way `datetime'...'` literals are written.
///
/// Fractional seconds are only emitted when non-zero, without trailing zeros.
pub fn format_datetime(value: &NaiveDateTime) -> String {
    let mut text = value.format("%Y-%m-%dT%H:%M:%S").to_string();
    let nanos = value.nanosecond() % 1_000_000_000;
    if nanos != 0 {
        let fraction = format!("{nanos:09}");
        text.push('.');
        text.push_str(fraction.trim_end_matches('0'));
    }
    text
}

/// Write a single-quoted string literal, doubling embedded quotes.
pub fn write_quoted(f: &mut impl fmt::Write, value: &str) -> fmt::Result {
    f.write_char('\'')?;
    for ch in value.chars() {
        if ch == '\'' {
            f.write_str("''")?;
        } else {
            f.write_char(ch)?;
        }
    }
    f.write_char('\'')
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Node]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(",")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

/// Operators are left-associative, so a right operand of equal precedence
/// needs parentheses too (`a sub (b sub c)`).
fn write_operand(
    f: &mut fmt::Formatter<'_>,
    node: &Node,
    parent: BinaryOperator,
    is_right: bool,
) -> fmt::Result {
    match node {
        Node::Binary { op, .. }
            if op.precedence() < parent.precedence()
                || (is_right && parent != BinaryOperator::Dot && op.precedence() == parent.precedence()) =>
        {
            write!(f, "({node})")
        }
        Node::Lambda { .. } => write!(f, "({node})"),
        _ => write!(f, "{node}"),
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Binary { op, left, right } => {
                write_operand(f, left, *op, false)?;
                if *op == BinaryOperator::Dot {
                    f.write_str(".")?;
                } else {
                    write!(f, " {} ", op.keyword())?;
                }
                write_operand(f, right, *op, true)
            }
            Node::MethodCall { name, args } => {
                write!(f, "{name}(")?;
                write_list(f, args)?;
                f.write_str(")")
            }
            Node::IndexerAccess { name, args } => {
                write!(f, "{name}[")?;
                write_list(f, args)?;
                f.write_str("]")
            }
            Node::Symbol(name) => f.write_str(name),
            Node::Lambda { params, body } => {
                if params.len() == 1 {
                    write!(f, "{}:{body}", params[0])
                } else {
                    write!(f, "({}):{body}", params.join(","))
                }
            }
            Node::String(value) => write_quoted(f, value),
            Node::Number(text) => f.write_str(text),
            Node::Guid(value) => write!(f, "guid'{value}'"),
            Node::DateTime(value) => write!(f, "datetime'{}'", format_datetime(value)),
            Node::Array(items) => {
                f.write_str("[")?;
                write_list(f, items)?;
                f.write_str("]")
            }
        }
    }
}
