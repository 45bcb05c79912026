//! Standard function table.
//!
//! Registration order matters: overloads sharing a name and arity are tried
//! in the order listed here.

use std::sync::Arc;

use odq_types::{Member, MemberTemplate, Type};

use super::CallStyle;
use crate::host;

/// One row of the table.
pub(super) struct FunctionDef {
    pub(super) format: &'static str,
    pub(super) style: CallStyle,
    pub(super) member: fn() -> Member,
}

impl FunctionDef {
    const fn new(format: &'static str, member: fn() -> Member) -> Self {
        Self {
            format,
            style: CallStyle::Static,
            member,
        }
    }

    const fn chained(format: &'static str, member: fn() -> Member) -> Self {
        Self {
            format,
            style: CallStyle::Chained,
            member,
        }
    }
}

/// Generic sequence operator registered over any element type.
fn over_any_element(template: Arc<MemberTemplate>) -> Member {
    Member::instantiate(template, &[], &[Type::Wildcard])
}

pub(super) static STANDARD_FUNCTIONS: &[FunctionDef] = &[
    // strings
    FunctionDef::new("length({0})", || Member::definition(host::string_length())),
    FunctionDef::new("startswith({0},{1})", || Member::definition(host::string_starts_with())),
    FunctionDef::new("endswith({0},{1})", || Member::definition(host::string_ends_with())),
    FunctionDef::new("substringof({1},{0})", || Member::definition(host::string_contains())),
    FunctionDef::new("substring({0},{1})", || Member::definition(host::string_substring_from())),
    FunctionDef::new("substring({0},{1},{2})", || {
        Member::definition(host::string_substring_range())
    }),
    FunctionDef::new("replace({0},{1},{2})", || Member::definition(host::string_replace_string())),
    FunctionDef::new("replace({0},{1},{2})", || Member::definition(host::string_replace_char())),
    FunctionDef::new("tolower({0})", || Member::definition(host::string_to_lower())),
    FunctionDef::new("toupper({0})", || Member::definition(host::string_to_upper())),
    FunctionDef::new("trim({0})", || Member::definition(host::string_trim())),
    FunctionDef::new("indexof({0},{1})", || Member::definition(host::string_index_of_string())),
    FunctionDef::new("indexof({0},{1})", || Member::definition(host::string_index_of_char())),
    FunctionDef::new("concat({0},{1})", || Member::definition(host::string_concat())),
    // dates
    FunctionDef::new("day({0})", || Member::definition(host::datetime_part("datetime.day", "Day"))),
    FunctionDef::new("hour({0})", || Member::definition(host::datetime_part("datetime.hour", "Hour"))),
    FunctionDef::new("minute({0})", || {
        Member::definition(host::datetime_part("datetime.minute", "Minute"))
    }),
    FunctionDef::new("month({0})", || Member::definition(host::datetime_part("datetime.month", "Month"))),
    FunctionDef::new("second({0})", || {
        Member::definition(host::datetime_part("datetime.second", "Second"))
    }),
    FunctionDef::new("year({0})", || Member::definition(host::datetime_part("datetime.year", "Year"))),
    // math
    FunctionDef::new("sqrt({0})", || {
        Member::definition(host::math_unary("math.sqrt", "Math", "Sqrt", Type::Double))
    }),
    FunctionDef::new("round({0})", || {
        Member::definition(host::math_unary("math.round", "Math", "Round", Type::Double))
    }),
    FunctionDef::new("round({0})", || {
        Member::definition(host::math_unary("decimal.round", "Decimal", "Round", Type::Decimal))
    }),
    FunctionDef::new("floor({0})", || {
        Member::definition(host::math_unary("math.floor", "Math", "Floor", Type::Double))
    }),
    FunctionDef::new("floor({0})", || {
        Member::definition(host::math_unary("decimal.floor", "Decimal", "Floor", Type::Decimal))
    }),
    FunctionDef::new("ceiling({0})", || {
        Member::definition(host::math_unary("math.ceiling", "Math", "Ceiling", Type::Double))
    }),
    FunctionDef::new("ceiling({0})", || {
        Member::definition(host::math_unary("decimal.ceiling", "Decimal", "Ceiling", Type::Decimal))
    }),
    // sequences
    FunctionDef::new("count({0})", || {
        Member::instantiate(host::collection_count(), &[Type::Wildcard], &[])
    }),
    FunctionDef::new("count({0})", || over_any_element(host::enumerable_count())),
    FunctionDef::chained("any({0},{1})", || over_any_element(host::enumerable_any())),
    FunctionDef::chained("all({0},{1})", || over_any_element(host::enumerable_all())),
    FunctionDef::chained("select({0},{1})", || {
        Member::instantiate(host::enumerable_select(), &[], &[Type::Wildcard, Type::Wildcard])
    }),
    FunctionDef::chained("where({0},{1})", || over_any_element(host::enumerable_where())),
    FunctionDef::new("sum({0})", || Member::definition(host::enumerable_sum("enumerable.sum(int)", Type::Int32))),
    FunctionDef::new("sum({0})", || {
        Member::definition(host::enumerable_sum("enumerable.sum(double)", Type::Double))
    }),
    FunctionDef::new("sum({0})", || {
        Member::definition(host::enumerable_sum("enumerable.sum(single)", Type::Single))
    }),
    FunctionDef::new("sum({0})", || {
        Member::definition(host::enumerable_sum("enumerable.sum(decimal)", Type::Decimal))
    }),
    // dictionaries
    FunctionDef::chained("contains({0},{1})", || {
        Member::instantiate(
            host::dictionary_contains_key(),
            &[Type::Wildcard, Type::Wildcard],
            &[],
        )
    }),
];
