//! Member descriptors and call-format parsing.

use odq_types::Member;
use thiserror::Error;

/// How a function is written in query text.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum CallStyle {
    /// `name(a, b)`.
    #[default]
    Static,
    /// `a.name(b)`.
    Chained,
}

/// Error building a registry entry. Raised at startup, never at query time.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum MappingError {
    #[error("malformed call format `{format}`: {reason}")]
    MalformedFormat { format: String, reason: &'static str },

    #[error("malformed argument placeholder `{text}` in `{format}`")]
    MalformedIndex { format: String, text: String },

    #[error("argument index {index} out of range for {arity} argument(s) in `{format}`")]
    IndexOutOfRange {
        format: String,
        index: usize,
        arity: usize,
    },

    #[error("argument index {index} appears twice in `{format}`")]
    DuplicateIndex { format: String, index: usize },

    #[error("`{format}` takes {found} argument(s) but `{member}` needs {expected}")]
    ArityMismatch {
        format: String,
        member: String,
        expected: usize,
        found: usize,
    },
}

/// A registered function: query name, argument order, and the host member
/// it compiles to.
///
/// `argument_order[j]` is the native position of the `j`-th query argument.
/// Native position 0 is the receiver for instance members. For
/// `substringof({1},{0})` the first query argument is the needle (native 1)
/// and the second the string searched (native 0).
#[derive(Clone, Debug)]
pub struct MemberMapping {
    name: String,
    argument_order: Vec<usize>,
    static_call_format: String,
    chained_call_format: String,
    preferred_style: CallStyle,
    member: Member,
}

impl MemberMapping {
    /// Parse `format` and bind it to `member`.
    ///
    /// Wildcard instantiations of `member` are stored as the generic
    /// definition.
    pub fn parse(member: Member, format: &str, preferred_style: CallStyle) -> Result<Self, MappingError> {
        let (name, argument_order) = parse_format(format)?;
        let member = member.generic_definition_over_wildcard();
        if member.arity() != argument_order.len() {
            return Err(MappingError::ArityMismatch {
                format: format.to_string(),
                member: member.to_string(),
                expected: member.arity(),
                found: argument_order.len(),
            });
        }
        let chained_call_format = chained_format(&name, &argument_order);
        Ok(Self {
            name,
            argument_order,
            static_call_format: format.to_string(),
            chained_call_format,
            preferred_style,
            member,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> usize {
        self.argument_order.len()
    }

    pub fn argument_order(&self) -> &[usize] {
        &self.argument_order
    }

    pub fn static_call_format(&self) -> &str {
        &self.static_call_format
    }

    pub fn chained_call_format(&self) -> &str {
        &self.chained_call_format
    }

    pub fn preferred_style(&self) -> CallStyle {
        self.preferred_style
    }

    /// The underlying member, possibly a generic definition.
    pub fn member(&self) -> &Member {
        &self.member
    }

    /// Query-order arguments in native order.
    ///
    /// Returns `None` if the argument count does not match.
    pub fn reorder<'a, T>(&self, query_args: &'a [T]) -> Option<Vec<&'a T>> {
        if query_args.len() != self.argument_order.len() {
            return None;
        }
        let mut native: Vec<Option<&'a T>> = vec![None; query_args.len()];
        for (arg, &position) in query_args.iter().zip(&self.argument_order) {
            *native.get_mut(position)? = Some(arg);
        }
        native.into_iter().collect()
    }

    /// Native-order arguments in query order.
    ///
    /// Returns `None` if the argument count does not match.
    pub fn to_query_order<T>(&self, native_args: Vec<T>) -> Option<Vec<T>> {
        if native_args.len() != self.argument_order.len() {
            return None;
        }
        let mut native: Vec<Option<T>> = native_args.into_iter().map(Some).collect();
        self.argument_order
            .iter()
            .map(|&position| native.get_mut(position).and_then(Option::take))
            .collect()
    }
}

/// Split `name({i},{j},...)` into the name and the brace indices.
fn parse_format(format: &str) -> Result<(String, Vec<usize>), MappingError> {
    let malformed = |reason| MappingError::MalformedFormat {
        format: format.to_string(),
        reason,
    };

    let (name, rest) = format.split_once('(').ok_or_else(|| malformed("missing `(`"))?;
    let name = name.trim();
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(malformed("function name must be a plain identifier"));
    }
    let inside = rest
        .trim_end()
        .strip_suffix(')')
        .ok_or_else(|| malformed("missing closing `)`"))?;
    if inside.trim().is_empty() {
        return Err(malformed("at least one argument is required"));
    }

    let mut order = Vec::new();
    for piece in inside.split(',') {
        let text = piece.trim();
        let index = text
            .strip_prefix('{')
            .and_then(|t| t.strip_suffix('}'))
            .and_then(|digits| digits.trim().parse::<usize>().ok())
            .ok_or_else(|| MappingError::MalformedIndex {
                format: format.to_string(),
                text: text.to_string(),
            })?;
        order.push(index);
    }

    let arity = order.len();
    let mut seen = vec![false; arity];
    for &index in &order {
        match seen.get_mut(index) {
            None => {
                return Err(MappingError::IndexOutOfRange {
                    format: format.to_string(),
                    index,
                    arity,
                })
            }
            Some(true) => {
                return Err(MappingError::DuplicateIndex {
                    format: format.to_string(),
                    index,
                })
            }
            Some(slot) => *slot = true,
        }
    }
    Ok((name.to_string(), order))
}

/// `{order[0]}.name({order[1]},...)`.
fn chained_format(name: &str, order: &[usize]) -> String {
    let placeholders: Vec<String> = order.iter().map(|index| format!("{{{index}}}")).collect();
    match placeholders.split_first() {
        Some((receiver, rest)) => format!("{receiver}.{name}({})", rest.join(",")),
        None => format!("{name}()"),
    }
}
