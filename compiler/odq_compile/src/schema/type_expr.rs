//! Type expressions: `Int32`, `List<String>`, `Dictionary<String, Int32>`,
//! `Int32[]`, and named enum or entity types.

use odq_types::{Type, TypeCtor};

use super::SchemaError;

/// The primitive type called `name`, if any.
pub(crate) fn primitive(name: &str) -> Option<Type> {
    Some(match name {
        "Bool" | "Boolean" => Type::Bool,
        "Byte" => Type::Byte,
        "Int16" => Type::Int16,
        "Int32" => Type::Int32,
        "Int64" => Type::Int64,
        "Single" => Type::Single,
        "Double" => Type::Double,
        "Decimal" => Type::Decimal,
        "Char" => Type::Char,
        "String" => Type::String,
        "Guid" => Type::Guid,
        "DateTime" => Type::DateTime,
        "Object" => Type::Object,
        _ => return None,
    })
}

/// Parse `text`, resolving non-primitive names through `named`.
pub(crate) fn parse_type_expr(
    text: &str,
    named: &dyn Fn(&str) -> Option<Type>,
) -> Result<Type, SchemaError> {
    let mut parser = Parser {
        text,
        pos: 0,
        named,
    };
    let ty = parser.ty()?;
    parser.skip_ws();
    if parser.pos != text.len() {
        return Err(parser.error("unexpected trailing input"));
    }
    Ok(ty)
}

struct Parser<'a> {
    text: &'a str,
    pos: usize,
    named: &'a dyn Fn(&str) -> Option<Type>,
}

impl Parser<'_> {
    fn error(&self, reason: &'static str) -> SchemaError {
        SchemaError::TypeSyntax {
            text: self.text.to_string(),
            reason,
        }
    }

    fn rest(&self) -> &str {
        self.text.get(self.pos..).unwrap_or_default()
    }

    fn skip_ws(&mut self) {
        let rest = self.rest();
        self.pos += rest.len() - rest.trim_start().len();
    }

    fn eat(&mut self, token: char) -> bool {
        self.skip_ws();
        if self.rest().starts_with(token) {
            self.pos += token.len_utf8();
            true
        } else {
            false
        }
    }

    fn ident(&mut self) -> Result<&str, SchemaError> {
        self.skip_ws();
        let start = self.pos;
        let len = self
            .rest()
            .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == '.'))
            .unwrap_or(self.rest().len());
        if len == 0 {
            return Err(self.error("expected a type name"));
        }
        self.pos += len;
        Ok(&self.text[start..self.pos])
    }

    fn ty(&mut self) -> Result<Type, SchemaError> {
        let name = self.ident()?.to_string();
        let mut ty = if self.eat('<') {
            let ctor = TypeCtor::from_name(&name).ok_or(SchemaError::UnknownType { name: name.clone() })?;
            let mut args = vec![self.ty()?];
            while self.eat(',') {
                args.push(self.ty()?);
            }
            if !self.eat('>') {
                return Err(self.error("expected `>`"));
            }
            if args.len() != ctor.arity() {
                return Err(self.error("wrong number of type arguments"));
            }
            Type::Applied { ctor, args }
        } else {
            primitive(&name)
                .or_else(|| (self.named)(&name))
                .ok_or(SchemaError::UnknownType { name })?
        };
        while self.eat('[') {
            if !self.eat(']') {
                return Err(self.error("expected `]`"));
            }
            ty = Type::array(ty);
        }
        Ok(ty)
    }
}
