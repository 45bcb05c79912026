//! Shared fixture: a small animal-shelter schema.

#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::cell::Cell;

use odq_compile::{Expr, FunctionRegistry, Schema, SchemaResolver, TypeResolver};
use odq_types::Type;

pub const SCHEMA: &str = r#"{
    "enums": [
        { "name": "Color", "members": [
            { "name": "Red", "value": 1 },
            { "name": "Green", "value": 2 },
            { "name": "Blue", "value": 3 }
        ] }
    ],
    "entities": [
        { "name": "Animal", "properties": {
            "name": "String", "weight": "Double", "price": "Decimal", "age": "Int32"
        } },
        { "name": "Critter", "base": "Animal", "properties": {
            "color": "Color", "tags": "List<String>", "friends": "List<Critter>",
            "attributes": "Dictionary<String, String>"
        } }
    ]
}"#;

pub fn resolver() -> SchemaResolver {
    let schema: Schema = serde_json::from_str(SCHEMA).unwrap();
    SchemaResolver::new(&schema).unwrap()
}

pub fn registry() -> FunctionRegistry {
    FunctionRegistry::standard().unwrap()
}

pub fn critter() -> Type {
    Type::entity("Critter")
}

/// Resolver that counts property lookups.
pub struct CountingResolver {
    pub inner: SchemaResolver,
    pub lookups: Cell<usize>,
}

impl CountingResolver {
    pub fn new() -> Self {
        Self {
            inner: resolver(),
            lookups: Cell::new(0),
        }
    }
}

impl TypeResolver for CountingResolver {
    fn resolve_property(&self, receiver: &Expr, name: &str) -> Option<Expr> {
        self.lookups.set(self.lookups.get() + 1);
        self.inner.resolve_property(receiver, name)
    }

    fn resolve_type(&self, name: &str) -> Option<Type> {
        self.inner.resolve_type(name)
    }

    fn supertypes(&self, ty: &Type) -> Vec<Type> {
        self.inner.supertypes(ty)
    }
}
