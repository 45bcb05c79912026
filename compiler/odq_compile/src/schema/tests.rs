use super::*;
use crate::expr::Param;
use pretty_assertions::assert_eq;

const SCHEMA: &str = r#"{
    "enums": [
        { "name": "Color", "members": [
            { "name": "Red", "value": 1 },
            { "name": "Green", "value": 2 }
        ] },
        { "name": "Size", "underlying": "Byte", "members": [{ "name": "Small", "value": 0 }] }
    ],
    "entities": [
        { "name": "Dog", "base": "Animal", "properties": { "color": "Color", "friends": "List<Dog>" } },
        { "name": "Animal", "properties": { "name": "String", "tags": "String[]" } }
    ]
}"#;

fn resolver() -> SchemaResolver {
    let schema: Schema = serde_json::from_str(SCHEMA).unwrap();
    SchemaResolver::new(&schema).unwrap()
}

fn this(ty: Type) -> Expr {
    Expr::parameter(&Param::new(0, "_this", ty))
}

// ===== Lookup =====

#[test]
fn property_lookup_walks_base_chain() {
    let resolver = resolver();
    let dog = this(Type::entity("Dog"));

    let color = resolver.resolve_property(&dog, "color").unwrap();
    assert_eq!(color.ty.as_enum().map(EnumDef::name), Some("Color"));

    let name = resolver.resolve_property(&dog, "name").unwrap();
    assert_eq!(name.ty, Type::String);

    let friends = resolver.resolve_property(&dog, "friends").unwrap();
    assert_eq!(friends.ty, Type::list(Type::entity("Dog")));

    assert!(resolver.resolve_property(&dog, "wings").is_none());
    assert!(resolver
        .resolve_property(&this(Type::String), "name")
        .is_none());
}

#[test]
fn type_names_and_supertypes() {
    let resolver = resolver();
    assert_eq!(resolver.resolve_type("Dog"), Some(Type::entity("Dog")));
    assert_eq!(
        resolver.resolve_type("List<Animal>"),
        Some(Type::list(Type::entity("Animal")))
    );
    assert_eq!(resolver.resolve_type("Cat"), None);
    assert_eq!(
        resolver.supertypes(&Type::entity("Dog")),
        vec![Type::entity("Animal")]
    );
    assert!(resolver.supertypes(&Type::entity("Animal")).is_empty());
}

#[test]
fn enum_underlying_type() {
    let resolver = resolver();
    let size = resolver.enumeration("Size").unwrap();
    assert_eq!(size.as_enum().map(EnumDef::underlying), Some(&Type::Byte));
}

// ===== Validation =====

fn entity(name: &str, base: Option<&str>, properties: &[(&str, &str)]) -> EntityDecl {
    EntityDecl {
        name: name.to_string(),
        base: base.map(str::to_string),
        properties: properties
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect(),
    }
}

#[test]
fn rejects_unknown_base_and_cycles() {
    let schema = Schema {
        enums: Vec::new(),
        entities: vec![entity("A", Some("Missing"), &[])],
    };
    assert!(matches!(
        SchemaResolver::new(&schema),
        Err(SchemaError::UnknownBase { .. })
    ));

    let schema = Schema {
        enums: Vec::new(),
        entities: vec![entity("A", Some("B"), &[]), entity("B", Some("A"), &[])],
    };
    assert!(matches!(
        SchemaResolver::new(&schema),
        Err(SchemaError::InheritanceCycle { .. })
    ));
}

#[test]
fn rejects_duplicates_and_bad_property_types() {
    let schema = Schema {
        enums: Vec::new(),
        entities: vec![entity("A", None, &[]), entity("A", None, &[])],
    };
    assert!(matches!(
        SchemaResolver::new(&schema),
        Err(SchemaError::DuplicateName { .. })
    ));

    let schema = Schema {
        enums: Vec::new(),
        entities: vec![entity("A", None, &[("size", "Widget")])],
    };
    let err = SchemaResolver::new(&schema).unwrap_err();
    assert_eq!(err.to_string(), "property `A.size`: unknown type `Widget`");
}

#[test]
fn rejects_non_integral_underlying() {
    let schema = Schema {
        enums: vec![EnumDecl {
            name: "E".to_string(),
            underlying: Some("Double".to_string()),
            members: Vec::new(),
        }],
        entities: Vec::new(),
    };
    assert!(matches!(
        SchemaResolver::new(&schema),
        Err(SchemaError::InvalidUnderlying { .. })
    ));
}
