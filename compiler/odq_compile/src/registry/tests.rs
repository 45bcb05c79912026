use std::sync::Arc;

use super::*;
use crate::host;
use odq_types::{MemberTemplate, Type};
use pretty_assertions::assert_eq;

fn standard() -> FunctionRegistry {
    FunctionRegistry::standard().unwrap()
}

fn rotate3() -> Member {
    Member::definition(Arc::new(MemberTemplate::static_method(
        MemberId::new("test.rotate"),
        "Rotate",
        Type::entity("Test"),
        vec![Type::Int32, Type::String, Type::Bool],
        Type::Bool,
    )))
}

// ===== Format parsing =====

#[test]
fn chained_format_uses_first_query_argument_as_receiver() {
    let registry = standard();
    let substringof = registry.candidates("substringof", 2).next().unwrap();
    assert_eq!(substringof.argument_order(), &[1, 0]);
    assert_eq!(substringof.static_call_format(), "substringof({1},{0})");
    assert_eq!(substringof.chained_call_format(), "{1}.substringof({0})");

    let substring = registry.candidates("substring", 3).next().unwrap();
    assert_eq!(substring.chained_call_format(), "{0}.substring({1},{2})");
}

#[test]
fn malformed_formats_fail_at_registration() {
    let mut registry = FunctionRegistry::new();
    let member = || Member::definition(host::string_starts_with());

    let err = registry
        .register(member(), "startswith{0},{1}", CallStyle::Static)
        .unwrap_err();
    assert!(matches!(err, MappingError::MalformedFormat { .. }));

    let err = registry
        .register(member(), "startswith({0},{x})", CallStyle::Static)
        .unwrap_err();
    assert!(matches!(err, MappingError::MalformedIndex { ref text, .. } if text == "{x}"));

    let err = registry
        .register(member(), "startswith({0},{2})", CallStyle::Static)
        .unwrap_err();
    assert!(matches!(
        err,
        MappingError::IndexOutOfRange {
            index: 2,
            arity: 2,
            ..
        }
    ));

    let err = registry
        .register(member(), "startswith({1},{1})", CallStyle::Static)
        .unwrap_err();
    assert!(matches!(err, MappingError::DuplicateIndex { index: 1, .. }));

    let err = registry
        .register(member(), "startswith()", CallStyle::Static)
        .unwrap_err();
    assert!(matches!(err, MappingError::MalformedFormat { .. }));

    assert!(registry.is_empty());
}

#[test]
fn format_arity_must_match_member() {
    let mut registry = FunctionRegistry::new();
    let err = registry
        .register(
            Member::definition(host::string_starts_with()),
            "startswith({0})",
            CallStyle::Static,
        )
        .unwrap_err();
    assert!(matches!(
        err,
        MappingError::ArityMismatch {
            expected: 2,
            found: 1,
            ..
        }
    ));
}

// ===== Argument order =====

#[test]
fn reorder_places_query_arguments_at_native_positions() {
    let mut registry = FunctionRegistry::new();
    let mapping = registry
        .register(rotate3(), "rotate({1},{2},{0})", CallStyle::Static)
        .unwrap();
    let query = ["x", "y", "z"];
    let native: Vec<&str> = mapping
        .reorder(&query)
        .unwrap()
        .into_iter()
        .copied()
        .collect();
    assert_eq!(native, vec!["z", "x", "y"]);
    assert_eq!(mapping.to_query_order(native).unwrap(), vec!["x", "y", "z"]);
    assert!(mapping.reorder(&["x"]).is_none());
}

// ===== Lookup =====

#[test]
fn candidates_keep_registration_order() {
    let registry = standard();
    let ids: Vec<&str> = registry
        .candidates("replace", 3)
        .map(|mapping| mapping.member().id().as_str())
        .collect();
    assert_eq!(
        ids,
        vec!["string.replace(string,string)", "string.replace(char,char)"]
    );
    assert_eq!(registry.candidates("replace", 2).count(), 0);
    assert_eq!(registry.candidates("frobnicate", 1).count(), 0);
}

#[test]
fn overloads_of_one_name_and_arity() {
    let registry = standard();
    let count: Vec<&str> = registry
        .candidates("count", 1)
        .map(|mapping| mapping.member().id().as_str())
        .collect();
    assert_eq!(count, vec!["collection.count", "enumerable.count"]);
    assert_eq!(registry.candidates("sum", 1).count(), 4);
    assert_eq!(registry.candidates("round", 1).count(), 2);
}

#[test]
fn wildcards_register_generic_definitions() {
    let registry = standard();
    let count = registry.candidates("count", 1).next().unwrap();
    assert!(count.member().has_open_declaring());
    assert_eq!(count.member().declaring_args(), &[Type::declaring_param(0)]);

    let any = registry.candidates("any", 2).next().unwrap();
    assert!(any.member().has_open_method());
    assert_eq!(any.preferred_style(), CallStyle::Chained);
}

#[test]
fn reverse_lookup_by_identity() {
    let registry = standard();
    let instance = Member::instantiate(host::enumerable_any(), &[], &[Type::String]);
    let mapping = registry.reverse_lookup(&instance).unwrap();
    assert_eq!(mapping.name(), "any");

    let helper = Member::definition(host::enumerable_contains());
    assert!(registry.reverse_lookup(&helper).is_none());
}

#[test]
fn later_registration_wins_reverse_lookup() {
    let mut registry = FunctionRegistry::new();
    registry
        .register(rotate3(), "rotate({0},{1},{2})", CallStyle::Static)
        .unwrap();
    registry
        .register(rotate3(), "spin({0},{1},{2})", CallStyle::Static)
        .unwrap();
    assert_eq!(registry.reverse_lookup(&rotate3()).unwrap().name(), "spin");
    assert_eq!(registry.candidates("rotate", 3).count(), 1);
}

#[test]
fn standard_table_size() {
    assert_eq!(standard().len(), 38);
}

#[test]
fn registry_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<FunctionRegistry>();
}
