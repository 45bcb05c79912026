//! Expression-to-query rendering.
//!
//! The inverse of compilation: members go back to query functions through
//! the registry's reverse lookup, the two compiler helpers go back to their
//! syntax (`name['key']`, `x in [...]`), and enum comparisons go back to
//! member names. Output is a [`Node`]; its `Display` adds the minimal
//! parentheses.

use odq_ir::{BinaryOperator, Node};
use odq_types::Type;
use thiserror::Error;

use crate::expr::{ExprKind, ParamId};
use crate::host::{DICTIONARY_GET, ENUMERABLE_CONTAINS};
use crate::stack::ensure_sufficient_stack;
use crate::{CallStyle, Expr, FunctionRegistry, Value};

/// Error rendering a graph back to query text.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum RenderError {
    #[error("member `{member}` has no registered query function")]
    UnmappedMember { member: String },

    #[error("cannot render {message}")]
    UnsupportedShape { message: String },
}

impl RenderError {
    fn shape(message: impl Into<String>) -> Self {
        Self::UnsupportedShape {
            message: message.into(),
        }
    }
}

/// Call syntax used for registered functions.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum RenderStyle {
    /// Each function's preferred style.
    #[default]
    Preferred,
    /// Always `name(a, b)`.
    Static,
}

/// Renders compiled graphs as query text.
pub struct QueryRenderer<'r> {
    registry: &'r FunctionRegistry,
    style: RenderStyle,
}

impl<'r> QueryRenderer<'r> {
    pub fn new(registry: &'r FunctionRegistry, style: RenderStyle) -> Self {
        Self { registry, style }
    }

    /// Render `expr` as query text.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn render(&self, expr: &Expr) -> Result<String, RenderError> {
        self.to_node(expr).map(|node| node.to_string())
    }

    /// Rebuild the query tree for `expr`.
    ///
    /// A lambda at the root is a compiled predicate: its first parameter is
    /// the implicit receiver, so its properties render as bare names and
    /// the parameter itself as `this`.
    pub fn to_node(&self, expr: &Expr) -> Result<Node, RenderError> {
        match &expr.kind {
            ExprKind::Lambda { params, body } if !params.is_empty() => {
                let this = params.first().map(|param| param.id);
                Rendering { renderer: self, this }.node(body)
            }
            _ => Rendering {
                renderer: self,
                this: None,
            }
            .node(expr),
        }
    }
}

struct Rendering<'a, 'r> {
    renderer: &'a QueryRenderer<'r>,
    this: Option<ParamId>,
}

impl Rendering<'_, '_> {
    fn is_this(&self, expr: &Expr) -> bool {
        self.this.is_some_and(|id| expr.is_parameter(id))
    }

    fn node(&self, expr: &Expr) -> Result<Node, RenderError> {
        ensure_sufficient_stack(|| self.node_inner(expr))
    }

    fn node_inner(&self, expr: &Expr) -> Result<Node, RenderError> {
        match &expr.kind {
            ExprKind::Constant(value) => constant(value),
            ExprKind::Parameter(param) => Ok(if self.is_this(expr) {
                Node::symbol("this")
            } else {
                Node::symbol(param.name.as_str())
            }),
            ExprKind::Property { receiver, name } => self.member_of(receiver, Node::symbol(name.as_str())),
            ExprKind::MemberAccess { receiver, member } => {
                self.function(member, vec![self.node(receiver)?])
            }
            ExprKind::Call {
                receiver,
                member,
                args,
            } => {
                if member.id() == DICTIONARY_GET {
                    return self.indexer(receiver.as_deref(), args);
                }
                if member.id() == ENUMERABLE_CONTAINS {
                    let [array, value] = args.as_slice() else {
                        return Err(RenderError::shape("`Contains` without two arguments"));
                    };
                    return Ok(Node::binary(BinaryOperator::In, self.node(value)?, self.node(array)?));
                }
                let native = receiver
                    .as_deref()
                    .into_iter()
                    .chain(args)
                    .map(|arg| self.node(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                self.function(member, native)
            }
            ExprKind::Binary { op, left, right } => {
                let (left, right) = match (enum_member(left, right), enum_member(right, left)) {
                    (Some(name), _) => (self.node(left)?, Node::string(name)),
                    (_, Some(name)) => (Node::string(name), self.node(right)?),
                    _ => (self.node(left)?, self.node(right)?),
                };
                Ok(Node::binary(op.to_operator(), left, right))
            }
            ExprKind::Convert { operand, explicit } => {
                if *explicit {
                    self.type_operator("cast", operand, &expr.ty)
                } else {
                    self.node(operand)
                }
            }
            ExprKind::TypeIs { operand, target } => self.type_operator("isof", operand, target),
            ExprKind::NewArray { elements } => elements
                .iter()
                .map(|element| self.node(element))
                .collect::<Result<Vec<_>, _>>()
                .map(Node::array),
            ExprKind::Lambda { params, body } => Ok(Node::lambda(
                params.iter().map(|param| param.name.as_str()),
                self.node(body)?,
            )),
            ExprKind::Quote(inner) => self.node(inner),
        }
    }

    /// `member` on `receiver`; bare on `this`.
    fn member_of(&self, receiver: &Expr, member: Node) -> Result<Node, RenderError> {
        if self.is_this(receiver) {
            Ok(member)
        } else {
            Ok(Node::dot(self.node(receiver)?, member))
        }
    }

    fn function(&self, member: &odq_types::Member, native: Vec<Node>) -> Result<Node, RenderError> {
        let mapping = self
            .renderer
            .registry
            .reverse_lookup(member)
            .ok_or_else(|| RenderError::UnmappedMember {
                member: member.to_string(),
            })?;
        let mut args = mapping
            .to_query_order(native)
            .ok_or_else(|| RenderError::shape(format!("`{member}` with a wrong argument count")))?;

        let style = match self.renderer.style {
            RenderStyle::Preferred => mapping.preferred_style(),
            RenderStyle::Static => CallStyle::Static,
        };
        if style == CallStyle::Chained && !args.is_empty() {
            let first = args.remove(0);
            return Ok(Node::dot(first, Node::call(mapping.name(), args)));
        }
        Ok(Node::call(mapping.name(), args))
    }

    /// `name['key']` from a dictionary lookup on a property.
    fn indexer(&self, receiver: Option<&Expr>, args: &[Expr]) -> Result<Node, RenderError> {
        let (Some(Expr {
            kind: ExprKind::Property { receiver, name },
            ..
        }), [key]) = (receiver, args)
        else {
            return Err(RenderError::shape("dictionary lookup not on a property"));
        };
        let indexer = Node::indexer(name.as_str(), vec![self.node(key)?]);
        self.member_of(receiver, indexer)
    }

    /// `op(T)` on `this`, `op(x, T)` otherwise.
    fn type_operator(&self, op: &str, operand: &Expr, ty: &Type) -> Result<Node, RenderError> {
        let name = ty.to_string();
        let type_node = if name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            Node::symbol(name)
        } else {
            Node::string(name)
        };
        if self.is_this(operand) {
            Ok(Node::call(op, vec![type_node]))
        } else {
            Ok(Node::call(op, vec![self.node(operand)?, type_node]))
        }
    }
}

/// Member name for an enum comparison: `converted` is an enum widened to
/// its underlying type and `constant` an integral value.
fn enum_member<'e>(converted: &'e Expr, constant: &Expr) -> Option<&'e str> {
    let ExprKind::Convert {
        operand,
        explicit: false,
    } = &converted.kind
    else {
        return None;
    };
    let value = constant.as_constant()?.as_i64()?;
    operand.ty.as_enum()?.member_name(value)
}

fn constant(value: &Value) -> Result<Node, RenderError> {
    Ok(match value {
        Value::Null => Node::symbol("null"),
        Value::Bool(value) => Node::symbol(if *value { "true" } else { "false" }),
        Value::Byte(value) => Node::number(value.to_string()),
        Value::Int16(value) => Node::number(value.to_string()),
        Value::Int32(value) => Node::number(value.to_string()),
        Value::Int64(value) => Node::number(format!("{value}L")),
        Value::Single(value) => Node::number(format!("{value:?}f")),
        Value::Double(value) => Node::number(format!("{value:?}")),
        Value::Decimal(value) => Node::number(format!("{value}m")),
        Value::Char(value) => Node::string(value.to_string()),
        Value::String(value) => Node::string(value.as_str()),
        Value::Guid(value) => Node::Guid(*value),
        Value::DateTime(value) => Node::DateTime(*value),
        Value::Enum { def, value } => Node::string(def.member_name(*value).ok_or_else(|| {
            RenderError::shape(format!("value {value} of {}", def.name()))
        })?),
        Value::Array { items, .. } => Node::array(items.iter().map(constant).collect::<Result<_, _>>()?),
    })
}
