//! Host member catalogue.
//!
//! Templates for the library members queries can call: string and date
//! accessors, math helpers, and the generic sequence operators. Each
//! template carries a stable `MemberId`; the registry's reverse lookup and
//! the renderer key on it.
//!
//! Two helpers are used by the compiler directly rather than through the
//! registry: dictionary item lookup (indexers) and `Enumerable.Contains`
//! (the `in` operator).

use std::sync::Arc;

use odq_types::{MemberId, MemberTemplate, Type};

/// Item lookup on `Dictionary<T0, T1>`.
pub const DICTIONARY_GET: MemberId = MemberId::new("dictionary.get_item");

/// `Enumerable.Contains<M0>(Enumerable<M0>, M0)`.
pub const ENUMERABLE_CONTAINS: MemberId = MemberId::new("enumerable.contains");

fn t(index: u8) -> Type {
    Type::declaring_param(index)
}

fn m(index: u8) -> Type {
    Type::method_param(index)
}

fn static_class(name: &str) -> Type {
    Type::entity(name)
}

fn string_method(key: &'static str, name: &'static str, params: Vec<Type>, ret: Type) -> Arc<MemberTemplate> {
    Arc::new(MemberTemplate::method(
        MemberId::new(key),
        name,
        Type::String,
        params,
        ret,
    ))
}

// ===== String =====

pub fn string_length() -> Arc<MemberTemplate> {
    Arc::new(MemberTemplate::property(
        MemberId::new("string.length"),
        "Length",
        Type::String,
        Type::Int32,
    ))
}

pub fn string_starts_with() -> Arc<MemberTemplate> {
    string_method("string.startswith", "StartsWith", vec![Type::String], Type::Bool)
}

pub fn string_ends_with() -> Arc<MemberTemplate> {
    string_method("string.endswith", "EndsWith", vec![Type::String], Type::Bool)
}

pub fn string_contains() -> Arc<MemberTemplate> {
    string_method("string.contains", "Contains", vec![Type::String], Type::Bool)
}

pub fn string_substring_from() -> Arc<MemberTemplate> {
    string_method("string.substring(int)", "Substring", vec![Type::Int32], Type::String)
}

pub fn string_substring_range() -> Arc<MemberTemplate> {
    string_method(
        "string.substring(int,int)",
        "Substring",
        vec![Type::Int32, Type::Int32],
        Type::String,
    )
}

pub fn string_replace_string() -> Arc<MemberTemplate> {
    string_method(
        "string.replace(string,string)",
        "Replace",
        vec![Type::String, Type::String],
        Type::String,
    )
}

pub fn string_replace_char() -> Arc<MemberTemplate> {
    string_method(
        "string.replace(char,char)",
        "Replace",
        vec![Type::Char, Type::Char],
        Type::String,
    )
}

pub fn string_to_lower() -> Arc<MemberTemplate> {
    string_method("string.tolower", "ToLower", Vec::new(), Type::String)
}

pub fn string_to_upper() -> Arc<MemberTemplate> {
    string_method("string.toupper", "ToUpper", Vec::new(), Type::String)
}

pub fn string_trim() -> Arc<MemberTemplate> {
    string_method("string.trim", "Trim", Vec::new(), Type::String)
}

pub fn string_index_of_string() -> Arc<MemberTemplate> {
    string_method("string.indexof(string)", "IndexOf", vec![Type::String], Type::Int32)
}

pub fn string_index_of_char() -> Arc<MemberTemplate> {
    string_method("string.indexof(char)", "IndexOf", vec![Type::Char], Type::Int32)
}

pub fn string_concat() -> Arc<MemberTemplate> {
    Arc::new(MemberTemplate::static_method(
        MemberId::new("string.concat"),
        "Concat",
        Type::String,
        vec![Type::String, Type::String],
        Type::String,
    ))
}

// ===== DateTime =====

/// Integer component of a `DateTime` (`Day`, `Hour`, ...).
pub fn datetime_part(key: &'static str, name: &'static str) -> Arc<MemberTemplate> {
    Arc::new(MemberTemplate::property(
        MemberId::new(key),
        name,
        Type::DateTime,
        Type::Int32,
    ))
}

// ===== Math =====

/// Unary static function on `ty`, declared by `class`.
pub fn math_unary(key: &'static str, class: &str, name: &'static str, ty: Type) -> Arc<MemberTemplate> {
    Arc::new(MemberTemplate::static_method(
        MemberId::new(key),
        name,
        static_class(class),
        vec![ty.clone()],
        ty,
    ))
}

// ===== Sequences =====

pub fn collection_count() -> Arc<MemberTemplate> {
    Arc::new(MemberTemplate::property(
        MemberId::new("collection.count"),
        "Count",
        Type::collection(t(0)),
        Type::Int32,
    ))
}

pub fn enumerable_count() -> Arc<MemberTemplate> {
    Arc::new(MemberTemplate::static_method(
        MemberId::new("enumerable.count"),
        "Count",
        static_class("Enumerable"),
        vec![Type::enumerable(m(0))],
        Type::Int32,
    ))
}

fn enumerable_predicate(key: &'static str, name: &'static str) -> Arc<MemberTemplate> {
    Arc::new(MemberTemplate::static_method(
        MemberId::new(key),
        name,
        static_class("Enumerable"),
        vec![
            Type::enumerable(m(0)),
            Type::function(vec![m(0)], Type::Bool),
        ],
        Type::Bool,
    ))
}

pub fn enumerable_any() -> Arc<MemberTemplate> {
    enumerable_predicate("enumerable.any", "Any")
}

pub fn enumerable_all() -> Arc<MemberTemplate> {
    enumerable_predicate("enumerable.all", "All")
}

pub fn enumerable_select() -> Arc<MemberTemplate> {
    Arc::new(MemberTemplate::static_method(
        MemberId::new("enumerable.select"),
        "Select",
        static_class("Enumerable"),
        vec![Type::enumerable(m(0)), Type::function(vec![m(0)], m(1))],
        Type::enumerable(m(1)),
    ))
}

pub fn enumerable_where() -> Arc<MemberTemplate> {
    Arc::new(MemberTemplate::static_method(
        MemberId::new("enumerable.where"),
        "Where",
        static_class("Enumerable"),
        vec![
            Type::enumerable(m(0)),
            Type::function(vec![m(0)], Type::Bool),
        ],
        Type::enumerable(m(0)),
    ))
}

/// `Sum` over a sequence of `elem`.
pub fn enumerable_sum(key: &'static str, elem: Type) -> Arc<MemberTemplate> {
    Arc::new(MemberTemplate::static_method(
        MemberId::new(key),
        "Sum",
        static_class("Enumerable"),
        vec![Type::enumerable(elem.clone())],
        elem,
    ))
}

pub fn enumerable_contains() -> Arc<MemberTemplate> {
    Arc::new(MemberTemplate::static_method(
        ENUMERABLE_CONTAINS,
        "Contains",
        static_class("Enumerable"),
        vec![Type::enumerable(m(0)), m(0)],
        Type::Bool,
    ))
}

// ===== Dictionaries =====

pub fn dictionary_contains_key() -> Arc<MemberTemplate> {
    Arc::new(MemberTemplate::method(
        MemberId::new("dictionary.containskey"),
        "ContainsKey",
        Type::dictionary(t(0), t(1)),
        vec![t(0)],
        Type::Bool,
    ))
}

pub fn dictionary_get() -> Arc<MemberTemplate> {
    Arc::new(MemberTemplate::method(
        DICTIONARY_GET,
        "get_Item",
        Type::dictionary(t(0), t(1)),
        vec![t(0)],
        t(1),
    ))
}
