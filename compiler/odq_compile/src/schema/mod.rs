//! Schema-backed type resolver.
//!
//! A `Schema` declares entities (with optional base entity and typed
//! properties) and enumerations. It is usually loaded from JSON:
//!
//! ```json
//! {
//!   "enums": [
//!     { "name": "Color", "members": [{ "name": "Red", "value": 1 }] }
//!   ],
//!   "entities": [
//!     { "name": "Animal", "properties": { "name": "String" } },
//!     { "name": "Dog", "base": "Animal", "properties": { "color": "Color" } }
//!   ]
//! }
//! ```
//!
//! [`SchemaResolver`] validates the schema once and answers property and
//! type lookups for the compiler.

mod type_expr;

use std::collections::BTreeMap;
use std::sync::Arc;

use odq_types::{EnumDef, Type};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Expr, TypeResolver};

/// Declared entities and enumerations.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default)]
    pub enums: Vec<EnumDecl>,
    #[serde(default)]
    pub entities: Vec<EntityDecl>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDecl {
    pub name: String,
    /// Underlying integral type; `Int32` when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub underlying: Option<String>,
    pub members: Vec<EnumMemberDecl>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumMemberDecl {
    pub name: String,
    pub value: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDecl {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    /// Property name to type expression.
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
}

/// Error validating a [`Schema`].
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum SchemaError {
    #[error("unknown type `{name}`")]
    UnknownType { name: String },

    #[error("malformed type expression `{text}`: {reason}")]
    TypeSyntax { text: String, reason: &'static str },

    #[error("`{name}` is declared more than once")]
    DuplicateName { name: String },

    #[error("enum `{name}` has non-integral underlying type `{underlying}`")]
    InvalidUnderlying { name: String, underlying: String },

    #[error("entity `{entity}` has unknown base `{base}`")]
    UnknownBase { entity: String, base: String },

    #[error("entity `{entity}` inherits from itself")]
    InheritanceCycle { entity: String },

    #[error("property `{entity}.{property}`: {source}")]
    Property {
        entity: String,
        property: String,
        source: Box<SchemaError>,
    },
}

#[derive(Debug)]
struct ResolvedEntity {
    base: Option<Arc<str>>,
    properties: FxHashMap<String, Type>,
}

/// [`TypeResolver`] over a validated [`Schema`].
#[derive(Debug)]
pub struct SchemaResolver {
    entities: FxHashMap<Arc<str>, ResolvedEntity>,
    enums: FxHashMap<String, Arc<EnumDef>>,
}

impl SchemaResolver {
    /// Validate `schema` and resolve all property types.
    #[tracing::instrument(level = "debug", skip_all, fields(
        entities = schema.entities.len(),
        enums = schema.enums.len(),
    ))]
    pub fn new(schema: &Schema) -> Result<Self, SchemaError> {
        let mut enums = FxHashMap::default();
        for decl in &schema.enums {
            let underlying = match decl.underlying.as_deref() {
                None => Type::Int32,
                Some(text) => type_expr::primitive(text)
                    .filter(Type::is_integral)
                    .ok_or_else(|| SchemaError::InvalidUnderlying {
                        name: decl.name.clone(),
                        underlying: text.to_string(),
                    })?,
            };
            let def = EnumDef::new(
                decl.name.clone(),
                decl.members.iter().map(|m| (m.name.clone(), m.value)),
            )
            .with_underlying(underlying);
            if enums.insert(decl.name.clone(), Arc::new(def)).is_some() {
                return Err(SchemaError::DuplicateName {
                    name: decl.name.clone(),
                });
            }
        }

        let mut names: FxHashMap<&str, Arc<str>> = FxHashMap::default();
        for decl in &schema.entities {
            if enums.contains_key(&decl.name)
                || names.insert(decl.name.as_str(), Arc::from(decl.name.as_str())).is_some()
            {
                return Err(SchemaError::DuplicateName {
                    name: decl.name.clone(),
                });
            }
        }

        let named = |name: &str| -> Option<Type> {
            names
                .get(name)
                .map(|name| Type::Entity(Arc::clone(name)))
                .or_else(|| enums.get(name).map(|def| Type::Enum(Arc::clone(def))))
        };

        let mut entities = FxHashMap::default();
        for decl in &schema.entities {
            let base = match &decl.base {
                None => None,
                Some(base) => Some(names.get(base.as_str()).cloned().ok_or_else(|| {
                    SchemaError::UnknownBase {
                        entity: decl.name.clone(),
                        base: base.clone(),
                    }
                })?),
            };
            let mut properties = FxHashMap::default();
            for (property, text) in &decl.properties {
                let ty = type_expr::parse_type_expr(text, &named).map_err(|source| {
                    SchemaError::Property {
                        entity: decl.name.clone(),
                        property: property.clone(),
                        source: Box::new(source),
                    }
                })?;
                properties.insert(property.clone(), ty);
            }
            let key = Arc::from(decl.name.as_str());
            entities.insert(key, ResolvedEntity { base, properties });
        }

        let resolver = Self { entities, enums };
        resolver.check_acyclic()?;
        tracing::debug!("schema resolved");
        Ok(resolver)
    }

    fn check_acyclic(&self) -> Result<(), SchemaError> {
        for name in self.entities.keys() {
            let mut current = self.entities.get(name).and_then(|e| e.base.clone());
            let mut steps = 0;
            while let Some(base) = current {
                if base == *name || steps > self.entities.len() {
                    return Err(SchemaError::InheritanceCycle {
                        entity: name.to_string(),
                    });
                }
                steps += 1;
                current = self.entities.get(&base).and_then(|e| e.base.clone());
            }
        }
        Ok(())
    }

    /// Entity type called `name`.
    pub fn entity(&self, name: &str) -> Option<Type> {
        self.entities
            .get_key_value(name)
            .map(|(key, _)| Type::Entity(Arc::clone(key)))
    }

    /// Enum type called `name`.
    pub fn enumeration(&self, name: &str) -> Option<Type> {
        self.enums.get(name).map(|def| Type::Enum(Arc::clone(def)))
    }

    fn named(&self, name: &str) -> Option<Type> {
        self.entity(name).or_else(|| self.enumeration(name))
    }

    /// Property type, searching `entity` and then its bases.
    fn property_type(&self, entity: &str, property: &str) -> Option<&Type> {
        let mut current = self.entities.get(entity);
        while let Some(resolved) = current {
            if let Some(ty) = resolved.properties.get(property) {
                return Some(ty);
            }
            current = resolved.base.as_ref().and_then(|base| self.entities.get(base));
        }
        None
    }
}

impl TypeResolver for SchemaResolver {
    fn resolve_property(&self, receiver: &Expr, name: &str) -> Option<Expr> {
        let Type::Entity(entity) = &receiver.ty else {
            return None;
        };
        let ty = self.property_type(entity, name)?;
        Some(Expr::property(receiver.clone(), name, ty.clone()))
    }

    fn resolve_type(&self, name: &str) -> Option<Type> {
        type_expr::parse_type_expr(name, &|n| self.named(n)).ok()
    }

    fn supertypes(&self, ty: &Type) -> Vec<Type> {
        match ty {
            Type::Entity(name) => self
                .entities
                .get(name)
                .and_then(|entity| entity.base.clone())
                .map(|base| vec![Type::Entity(base)])
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests;
