//! Binary operators: logic, arithmetic, comparison, and `in`.

use odq_ir::{BinaryOperator, Node};
use odq_types::{is_assignable, promote_numeric, Member, Type};

use super::{Compilation, Scope};
use crate::expr::BinaryOp;
use crate::{host, CompileError, Expr, Value};

impl Compilation<'_> {
    pub(super) fn compile_binary(
        &self,
        scope: &Scope<'_>,
        op: BinaryOperator,
        left: &Node,
        right: &Node,
    ) -> Result<Expr, CompileError> {
        if op == BinaryOperator::In {
            return self.compile_in(scope, left, right);
        }
        let Some(op) = BinaryOp::from_operator(op) else {
            return Err(CompileError::unsupported(format!(
                "operator `{}` in this position",
                op.keyword()
            )));
        };

        let left = self.compile_node(scope, left, None, None)?;
        let right = self.compile_node(scope, right, None, None)?;

        match op {
            BinaryOp::AndAlso | BinaryOp::OrElse => {
                if left.ty != Type::Bool || right.ty != Type::Bool {
                    return Err(operand_mismatch(op, &left, &right));
                }
                Ok(Expr::binary(op, left, right, Type::Bool))
            }
            BinaryOp::Add
            | BinaryOp::Subtract
            | BinaryOp::Multiply
            | BinaryOp::Divide
            | BinaryOp::Modulo => {
                let ty = promote_numeric(&left.ty, &right.ty)
                    .ok_or_else(|| operand_mismatch(op, &left, &right))?;
                let left = coerce(left, &ty);
                let right = coerce(right, &ty);
                Ok(Expr::binary(op, left, right, ty))
            }
            BinaryOp::Equal | BinaryOp::NotEqual => {
                let (left, right) = coerce_enum_comparison(left, right)?;
                let (left, right) = self.equality_operands(op, left, right)?;
                Ok(Expr::binary(op, left, right, Type::Bool))
            }
            BinaryOp::LessThan
            | BinaryOp::GreaterThan
            | BinaryOp::LessThanOrEqual
            | BinaryOp::GreaterThanOrEqual => {
                let (left, right) = if let Some(ty) = promote_numeric(&left.ty, &right.ty) {
                    (coerce(left, &ty), coerce(right, &ty))
                } else if left.ty == right.ty && left.ty.is_ordered() {
                    (left, right)
                } else {
                    return Err(operand_mismatch(op, &left, &right));
                };
                Ok(Expr::binary(op, left, right, Type::Bool))
            }
        }
    }

    fn equality_operands(
        &self,
        op: BinaryOp,
        left: Expr,
        right: Expr,
    ) -> Result<(Expr, Expr), CompileError> {
        if left.ty == right.ty {
            return Ok((left, right));
        }
        if let Some(ty) = promote_numeric(&left.ty, &right.ty) {
            return Ok((coerce(left, &ty), coerce(right, &ty)));
        }
        if is_assignable(&left.ty, &right.ty, &self.hierarchy)
            || is_assignable(&right.ty, &left.ty, &self.hierarchy)
        {
            return Ok((left, right));
        }
        Err(operand_mismatch(op, &left, &right))
    }

    /// `x in [a, b, ...]`, compiled as `Enumerable.Contains(array, x)`.
    ///
    /// The array's element type must be exactly the type of `x`.
    fn compile_in(&self, scope: &Scope<'_>, left: &Node, right: &Node) -> Result<Expr, CompileError> {
        let left = self.compile_node(scope, left, None, None)?;
        let right = self.compile_node(scope, right, None, Some(&Type::array(left.ty.clone())))?;
        let Some(elem) = right.ty.array_element() else {
            return Err(CompileError::type_mismatch(format!(
                "`in` requires an array on the right, found {}",
                right.ty
            )));
        };
        if *elem != left.ty {
            return Err(CompileError::type_mismatch(format!(
                "`in` tests a {} against an array of {elem}",
                left.ty
            )));
        }
        let member = Member::instantiate(host::enumerable_contains(), &[], &[left.ty.clone()]);
        Ok(Expr::call(None, member, vec![right, left]))
    }
}

fn operand_mismatch(op: BinaryOp, left: &Expr, right: &Expr) -> CompileError {
    CompileError::type_mismatch(format!(
        "`{}` cannot be applied to {} and {}",
        op.keyword(),
        left.ty,
        right.ty
    ))
}

/// `expr` as `target`: numeric constants are converted in place, anything
/// else gets an implicit conversion node.
fn coerce(expr: Expr, target: &Type) -> Expr {
    if expr.ty == *target {
        return expr;
    }
    if let Some(value) = expr.as_constant().and_then(|value| value.convert_numeric(target)) {
        return Expr::constant(value);
    }
    Expr::convert(expr, target.clone(), false)
}

/// Compare an enum with a member name: `color eq 'green'`.
///
/// The enum side is converted to its underlying type and the string
/// replaced by the member's value. The check runs once as written and
/// once with the operands swapped; operand positions are kept.
fn coerce_enum_comparison(left: Expr, right: Expr) -> Result<(Expr, Expr), CompileError> {
    if let Some((left, right)) = enum_and_constant(&left, &right)? {
        return Ok((left, right));
    }
    if let Some((right, left)) = enum_and_constant(&right, &left)? {
        return Ok((left, right));
    }
    Ok((left, right))
}

fn enum_and_constant(enum_side: &Expr, other: &Expr) -> Result<Option<(Expr, Expr)>, CompileError> {
    let (Some(def), Some(Value::String(name))) = (enum_side.ty.as_enum(), other.as_constant()) else {
        return Ok(None);
    };
    let value = def.parse_member(name).ok_or_else(|| {
        CompileError::type_mismatch(format!("`{name}` is not a member of {}", def.name()))
    })?;
    let underlying = def.underlying().clone();
    let constant = Value::integral(&underlying, value).ok_or_else(|| {
        CompileError::type_mismatch(format!(
            "{}.{name} does not fit in {underlying}",
            def.name()
        ))
    })?;
    tracing::trace!(member = %name, value, "enum comparison");
    Ok(Some((
        Expr::convert(enum_side.clone(), underlying, false),
        Expr::constant(constant),
    )))
}
