//! Typed expression graph produced by the compiler.
//!
//! Every node carries its result type. The graph is a plain owned tree;
//! the caller receives it by value and may inspect, render, or execute it.

mod value;

pub use value::Value;

use std::fmt::{self, Write as _};

use odq_ir::BinaryOperator;
use odq_types::{Member, Type};

use crate::stack::ensure_sufficient_stack;

/// Identity of a parameter within one compilation.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
pub struct ParamId(pub u32);

/// A lambda parameter or the receiver (`this`) parameter.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Param {
    pub id: ParamId,
    pub name: String,
    pub ty: Type,
}

impl Param {
    pub fn new(id: u32, name: impl Into<String>, ty: Type) -> Self {
        Self {
            id: ParamId(id),
            name: name.into(),
            ty,
        }
    }
}

/// Operators of the expression graph.
///
/// Member access and `in` are not operators here: they compile to member
/// nodes and calls.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    AndAlso,
    OrElse,
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Equal,
    NotEqual,
    LessThan,
    GreaterThan,
    LessThanOrEqual,
    GreaterThanOrEqual,
}

impl BinaryOp {
    pub fn from_operator(op: BinaryOperator) -> Option<Self> {
        Some(match op {
            BinaryOperator::AndAlso => Self::AndAlso,
            BinaryOperator::OrElse => Self::OrElse,
            BinaryOperator::Add => Self::Add,
            BinaryOperator::Subtract => Self::Subtract,
            BinaryOperator::Multiply => Self::Multiply,
            BinaryOperator::Divide => Self::Divide,
            BinaryOperator::Modulo => Self::Modulo,
            BinaryOperator::Equal => Self::Equal,
            BinaryOperator::NotEqual => Self::NotEqual,
            BinaryOperator::LessThan => Self::LessThan,
            BinaryOperator::GreaterThan => Self::GreaterThan,
            BinaryOperator::LessThanOrEqual => Self::LessThanOrEqual,
            BinaryOperator::GreaterThanOrEqual => Self::GreaterThanOrEqual,
            BinaryOperator::Dot | BinaryOperator::In => return None,
        })
    }

    pub const fn to_operator(self) -> BinaryOperator {
        match self {
            Self::AndAlso => BinaryOperator::AndAlso,
            Self::OrElse => BinaryOperator::OrElse,
            Self::Add => BinaryOperator::Add,
            Self::Subtract => BinaryOperator::Subtract,
            Self::Multiply => BinaryOperator::Multiply,
            Self::Divide => BinaryOperator::Divide,
            Self::Modulo => BinaryOperator::Modulo,
            Self::Equal => BinaryOperator::Equal,
            Self::NotEqual => BinaryOperator::NotEqual,
            Self::LessThan => BinaryOperator::LessThan,
            Self::GreaterThan => BinaryOperator::GreaterThan,
            Self::LessThanOrEqual => BinaryOperator::LessThanOrEqual,
            Self::GreaterThanOrEqual => BinaryOperator::GreaterThanOrEqual,
        }
    }

    pub const fn keyword(self) -> &'static str {
        self.to_operator().keyword()
    }
}

/// A typed expression node.
#[derive(Clone, Debug, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub ty: Type,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ExprKind {
    Constant(Value),
    Parameter(Param),
    /// Property supplied by the type resolver.
    Property { receiver: Box<Expr>, name: String },
    /// Property taken from the host member catalogue (`length`, `count`).
    MemberAccess { receiver: Box<Expr>, member: Member },
    /// Method call; `receiver` is `None` for static members.
    Call {
        receiver: Option<Box<Expr>>,
        member: Member,
        args: Vec<Expr>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Conversion to `Expr::ty`. `explicit` marks a `cast(..)` in the query;
    /// implicit conversions come from operand promotion.
    Convert { operand: Box<Expr>, explicit: bool },
    /// Runtime type test (`isof`); always `Bool`.
    TypeIs { operand: Box<Expr>, target: Type },
    /// Array built from non-constant elements.
    NewArray { elements: Vec<Expr> },
    Lambda { params: Vec<Param>, body: Box<Expr> },
    /// Lambda handed over as a deferred expression.
    Quote(Box<Expr>),
}

impl Expr {
    pub fn constant(value: Value) -> Self {
        let ty = value.ty();
        Self {
            kind: ExprKind::Constant(value),
            ty,
        }
    }

    pub fn parameter(param: &Param) -> Self {
        Self {
            ty: param.ty.clone(),
            kind: ExprKind::Parameter(param.clone()),
        }
    }

    pub fn property(receiver: Expr, name: impl Into<String>, ty: Type) -> Self {
        Self {
            kind: ExprKind::Property {
                receiver: Box::new(receiver),
                name: name.into(),
            },
            ty,
        }
    }

    pub fn member_access(receiver: Expr, member: Member) -> Self {
        Self {
            ty: member.ret(),
            kind: ExprKind::MemberAccess {
                receiver: Box::new(receiver),
                member,
            },
        }
    }

    pub fn call(receiver: Option<Expr>, member: Member, args: Vec<Expr>) -> Self {
        Self {
            ty: member.ret(),
            kind: ExprKind::Call {
                receiver: receiver.map(Box::new),
                member,
                args,
            },
        }
    }

    pub fn binary(op: BinaryOp, left: Expr, right: Expr, ty: Type) -> Self {
        Self {
            kind: ExprKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
            ty,
        }
    }

    pub fn convert(operand: Expr, ty: Type, explicit: bool) -> Self {
        Self {
            kind: ExprKind::Convert {
                operand: Box::new(operand),
                explicit,
            },
            ty,
        }
    }

    pub fn type_is(operand: Expr, target: Type) -> Self {
        Self {
            kind: ExprKind::TypeIs {
                operand: Box::new(operand),
                target,
            },
            ty: Type::Bool,
        }
    }

    pub fn new_array(elem: Type, elements: Vec<Expr>) -> Self {
        Self {
            kind: ExprKind::NewArray { elements },
            ty: Type::array(elem),
        }
    }

    pub fn lambda(params: Vec<Param>, body: Expr) -> Self {
        let ty = Type::function(
            params.iter().map(|param| param.ty.clone()).collect(),
            body.ty.clone(),
        );
        Self {
            kind: ExprKind::Lambda {
                params,
                body: Box::new(body),
            },
            ty,
        }
    }

    pub fn quote(lambda: Expr) -> Self {
        Self {
            ty: Type::quoted(lambda.ty.clone()),
            kind: ExprKind::Quote(Box::new(lambda)),
        }
    }

    pub fn as_constant(&self) -> Option<&Value> {
        match &self.kind {
            ExprKind::Constant(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_parameter(&self, id: ParamId) -> bool {
        matches!(&self.kind, ExprKind::Parameter(param) if param.id == id)
    }

    /// Multi-line tree dump, one node per line with its type.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        // Writing to a String cannot fail.
        let _ = self.dump_into(&mut out, 0);
        out
    }

    fn dump_into(&self, out: &mut String, depth: usize) -> fmt::Result {
        ensure_sufficient_stack(|| {
            let indent = depth * 2;
            write!(out, "{:indent$}", "")?;
            match &self.kind {
                ExprKind::Constant(value) => writeln!(out, "Constant {value} : {}", self.ty),
                ExprKind::Parameter(param) => {
                    writeln!(out, "Parameter {}#{} : {}", param.name, param.id.0, self.ty)
                }
                ExprKind::Property { receiver, name } => {
                    writeln!(out, "Property {name} : {}", self.ty)?;
                    receiver.dump_into(out, depth + 1)
                }
                ExprKind::MemberAccess { receiver, member } => {
                    writeln!(out, "MemberAccess {member} : {}", self.ty)?;
                    receiver.dump_into(out, depth + 1)
                }
                ExprKind::Call {
                    receiver,
                    member,
                    args,
                } => {
                    writeln!(out, "Call {member} : {}", self.ty)?;
                    if let Some(receiver) = receiver {
                        receiver.dump_into(out, depth + 1)?;
                    }
                    args.iter().try_for_each(|arg| arg.dump_into(out, depth + 1))
                }
                ExprKind::Binary { op, left, right } => {
                    writeln!(out, "Binary {} : {}", op.keyword(), self.ty)?;
                    left.dump_into(out, depth + 1)?;
                    right.dump_into(out, depth + 1)
                }
                ExprKind::Convert { operand, explicit } => {
                    let label = if *explicit { "Cast" } else { "Convert" };
                    writeln!(out, "{label} : {}", self.ty)?;
                    operand.dump_into(out, depth + 1)
                }
                ExprKind::TypeIs { operand, target } => {
                    writeln!(out, "TypeIs {target} : {}", self.ty)?;
                    operand.dump_into(out, depth + 1)
                }
                ExprKind::NewArray { elements } => {
                    writeln!(out, "NewArray : {}", self.ty)?;
                    elements
                        .iter()
                        .try_for_each(|element| element.dump_into(out, depth + 1))
                }
                ExprKind::Lambda { params, body } => {
                    let names: Vec<String> = params
                        .iter()
                        .map(|param| format!("{}#{}", param.name, param.id.0))
                        .collect();
                    writeln!(out, "Lambda ({}) : {}", names.join(", "), self.ty)?;
                    body.dump_into(out, depth + 1)
                }
                ExprKind::Quote(inner) => {
                    writeln!(out, "Quote : {}", self.ty)?;
                    inner.dump_into(out, depth + 1)
                }
            }
        })
    }
}
