//! Literal compilation: numbers and arrays.

use std::str::FromStr;

use odq_ir::Node;
use odq_types::Type;
use rust_decimal::Decimal;

use super::{Compilation, Scope};
use crate::{CompileError, Expr, Value};

/// A parsed numeric literal.
struct NumberLiteral<'t> {
    value: Value,
    /// Digits without the suffix.
    body: &'t str,
    /// An explicit type suffix pins the type.
    suffixed: bool,
}

impl<'t> NumberLiteral<'t> {
    /// Parse `text` with an optional suffix: `m` Decimal, `L` Int64,
    /// `f` Single, `d` Double.
    ///
    /// Without a suffix, literals with a fraction or exponent are `Double`;
    /// integers are `Int32`, or `Int64` when too large.
    fn parse(text: &'t str) -> Option<Self> {
        let last = text.chars().last()?;
        let suffix = matches!(last, 'm' | 'M' | 'l' | 'L' | 'f' | 'F' | 'd' | 'D')
            .then_some(last.to_ascii_lowercase());
        let body = if suffix.is_some() {
            text.get(..text.len() - 1)?
        } else {
            text
        };
        if body.is_empty() {
            return None;
        }
        let value = match suffix {
            Some('m') => Value::Decimal(parse_decimal(body)?),
            Some('l') => Value::Int64(body.parse().ok()?),
            Some('f') => Value::Single(parse_float(body)?),
            Some('d') => Value::Double(parse_float(body)?),
            _ if is_fractional(body) => Value::Double(parse_float(body)?),
            _ => body
                .parse::<i32>()
                .map(Value::Int32)
                .or_else(|_| body.parse::<i64>().map(Value::Int64))
                .ok()?,
        };
        Some(Self {
            value,
            body,
            suffixed: suffix.is_some(),
        })
    }

    /// The literal as `target`, if it is representable there.
    fn coerce(&self, target: &Type) -> Option<Value> {
        if !is_fractional(self.body) {
            return self.value.convert_numeric(target);
        }
        match target {
            Type::Single => parse_float(self.body).map(Value::Single),
            Type::Double => parse_float(self.body).map(Value::Double),
            Type::Decimal => parse_decimal(self.body).map(Value::Decimal),
            _ => None,
        }
    }
}

fn is_fractional(body: &str) -> bool {
    body.contains(['.', 'e', 'E'])
}

/// Finite floats only: `inf` and `NaN` are not query literals.
fn parse_float<F: FromStr + Into<f64> + Copy>(body: &str) -> Option<F> {
    let value: F = body.parse().ok()?;
    value.into().is_finite().then_some(value)
}

fn parse_decimal(body: &str) -> Option<Decimal> {
    Decimal::from_str(body)
        .or_else(|_| Decimal::from_scientific(body))
        .ok()
}

impl Compilation<'_> {
    pub(super) fn compile_number(
        &self,
        text: &str,
        expected: Option<&Type>,
    ) -> Result<Expr, CompileError> {
        let literal = NumberLiteral::parse(text)
            .ok_or_else(|| CompileError::unsupported(format!("malformed number literal `{text}`")))?;
        let value = match expected {
            Some(target) if target.is_numeric() && !literal.suffixed => {
                literal.coerce(target).unwrap_or(literal.value)
            }
            _ => literal.value,
        };
        Ok(Expr::constant(value))
    }

    /// `[a, b, ...]`.
    ///
    /// Elements share one type: the expected element type when the call
    /// site supplies one, otherwise the type of the first non-null element.
    /// All-constant arrays fold into a single constant.
    pub(super) fn compile_array(
        &self,
        scope: &Scope<'_>,
        items: &[Node],
        expected: Option<&Type>,
    ) -> Result<Expr, CompileError> {
        let expected_elem = expected
            .and_then(Type::array_element)
            .filter(|elem| !elem.has_params());
        let elements = items
            .iter()
            .map(|item| self.compile_node(scope, item, None, expected_elem))
            .collect::<Result<Vec<_>, _>>()?;

        let elem = match expected_elem {
            Some(elem) => elem.clone(),
            None => elements
                .iter()
                .map(|element| &element.ty)
                .find(|ty| **ty != Type::Null)
                .cloned()
                .ok_or_else(|| {
                    CompileError::unsupported("cannot infer the element type of an empty or all-null array")
                })?,
        };

        if let Some(odd) = elements
            .iter()
            .find(|element| element.ty != elem && !(element.ty == Type::Null && elem.is_reference()))
        {
            return Err(CompileError::type_mismatch(format!(
                "array of {elem} cannot hold an element of type {}",
                odd.ty
            )));
        }

        let constants: Option<Vec<Value>> = elements
            .iter()
            .map(|element| element.as_constant().cloned())
            .collect();
        Ok(match constants {
            Some(items) => Expr::constant(Value::Array { elem, items }),
            None => Expr::new_array(elem, elements),
        })
    }
}
