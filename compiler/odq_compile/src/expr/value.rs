//! Constant values.

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDateTime;
use odq_ir::{format_datetime, Guid};
use odq_types::{EnumDef, Type};
use rust_decimal::Decimal;

/// A constant carried by the expression graph.
///
/// Floating-point payloads make this `PartialEq` only.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Byte(u8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    Single(f32),
    Double(f64),
    Decimal(Decimal),
    Char(char),
    String(String),
    Guid(Guid),
    DateTime(NaiveDateTime),
    /// Enumeration member by value.
    Enum { def: Arc<EnumDef>, value: i64 },
    /// Array with a fixed element type.
    Array { elem: Type, items: Vec<Value> },
}

impl Value {
    pub fn ty(&self) -> Type {
        match self {
            Value::Null => Type::Null,
            Value::Bool(_) => Type::Bool,
            Value::Byte(_) => Type::Byte,
            Value::Int16(_) => Type::Int16,
            Value::Int32(_) => Type::Int32,
            Value::Int64(_) => Type::Int64,
            Value::Single(_) => Type::Single,
            Value::Double(_) => Type::Double,
            Value::Decimal(_) => Type::Decimal,
            Value::Char(_) => Type::Char,
            Value::String(_) => Type::String,
            Value::Guid(_) => Type::Guid,
            Value::DateTime(_) => Type::DateTime,
            Value::Enum { def, .. } => Type::Enum(Arc::clone(def)),
            Value::Array { elem, .. } => Type::array(elem.clone()),
        }
    }

    /// An integral constant of type `ty`, if `value` fits.
    pub fn integral(ty: &Type, value: i64) -> Option<Value> {
        match ty {
            Type::Byte => u8::try_from(value).ok().map(Value::Byte),
            Type::Int16 => i16::try_from(value).ok().map(Value::Int16),
            Type::Int32 => i32::try_from(value).ok().map(Value::Int32),
            Type::Int64 => Some(Value::Int64(value)),
            _ => None,
        }
    }

    /// Integral payload widened to `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Byte(v) => Some(i64::from(v)),
            Value::Int16(v) => Some(i64::from(v)),
            Value::Int32(v) => Some(i64::from(v)),
            Value::Int64(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Convert a numeric constant to another numeric type without loss.
    ///
    /// Returns `None` when the value does not fit or either side is not
    /// numeric. Integral values become floating point only when exactly
    /// representable.
    pub fn convert_numeric(&self, target: &Type) -> Option<Value> {
        if self.ty() == *target {
            return Some(self.clone());
        }
        if let Some(int) = self.as_i64() {
            return match target {
                Type::Byte | Type::Int16 | Type::Int32 | Type::Int64 => Value::integral(target, int),
                #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
                Type::Single => {
                    let value = int as f32;
                    (value as i128 == i128::from(int)).then_some(Value::Single(value))
                }
                #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
                Type::Double => {
                    let value = int as f64;
                    (value as i128 == i128::from(int)).then_some(Value::Double(value))
                }
                Type::Decimal => Some(Value::Decimal(Decimal::from(int))),
                _ => None,
            };
        }
        match (self, target) {
            (Value::Single(v), Type::Double) => Some(Value::Double(f64::from(*v))),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("null"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Byte(v) => write!(f, "{v}"),
            Value::Int16(v) => write!(f, "{v}"),
            Value::Int32(v) => write!(f, "{v}"),
            Value::Int64(v) => write!(f, "{v}"),
            Value::Single(v) => write!(f, "{v:?}"),
            Value::Double(v) => write!(f, "{v:?}"),
            Value::Decimal(v) => write!(f, "{v}"),
            Value::Char(v) => write!(f, "{v:?}"),
            Value::String(v) => write!(f, "{v:?}"),
            Value::Guid(v) => write!(f, "{v}"),
            Value::DateTime(v) => f.write_str(&format_datetime(v)),
            Value::Enum { def, value } => match def.member_name(*value) {
                Some(name) => write!(f, "{}.{name}", def.name()),
                None => write!(f, "{}({value})", def.name()),
            },
            Value::Array { items, .. } => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
        }
    }
}
