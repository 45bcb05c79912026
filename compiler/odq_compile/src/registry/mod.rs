//! Function mapping registry.
//!
//! Maps query function names to host members. Lookups go two ways:
//!
//! - name + arity to the ordered list of candidate mappings (compilation)
//! - member identity to its mapping (rendering)
//!
//! A registry is built once, usually through [`FunctionRegistry::standard`],
//! and is read-only afterwards. It is `Send + Sync` and is shared by
//! reference between compilations.

mod mapping;
mod standard;

pub use mapping::{CallStyle, MappingError, MemberMapping};

use odq_types::{Member, MemberId};
use rustc_hash::FxHashMap;

/// Catalogue of query functions.
#[derive(Clone, Debug, Default)]
pub struct FunctionRegistry {
    /// All mappings in registration order.
    mappings: Vec<MemberMapping>,
    /// Name to indices into `mappings`, in registration order.
    by_name: FxHashMap<String, Vec<usize>>,
    /// Member identity to index into `mappings`. Later registrations win.
    by_member: FxHashMap<MemberId, usize>,
}

impl FunctionRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the standard function table.
    #[tracing::instrument(level = "debug")]
    pub fn standard() -> Result<Self, MappingError> {
        let mut registry = Self::new();
        for def in standard::STANDARD_FUNCTIONS {
            registry.register((def.member)(), def.format, def.style)?;
        }
        tracing::debug!(functions = registry.len(), "standard registry built");
        Ok(registry)
    }

    /// Register `member` under `format`, e.g. `"substring({0},{1})"`.
    ///
    /// Fails if the format is malformed or its argument count does not
    /// match the member (receiver included).
    pub fn register(
        &mut self,
        member: Member,
        format: &str,
        preferred_style: CallStyle,
    ) -> Result<&MemberMapping, MappingError> {
        let mapping = MemberMapping::parse(member, format, preferred_style)?;
        let index = self.mappings.len();
        tracing::trace!(
            name = mapping.name(),
            arity = mapping.arity(),
            member = %mapping.member(),
            "registered function"
        );
        self.by_name
            .entry(mapping.name().to_string())
            .or_default()
            .push(index);
        self.by_member.insert(mapping.member().id(), index);
        self.mappings.push(mapping);
        Ok(&self.mappings[index])
    }

    /// Mappings named `name` taking `arity` arguments, in registration order.
    pub fn candidates<'r>(&'r self, name: &str, arity: usize) -> impl Iterator<Item = &'r MemberMapping> + 'r {
        self.by_name
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .filter_map(|&index| self.mappings.get(index))
            .filter(move |mapping| mapping.arity() == arity)
    }

    /// The mapping registered for `member`, matched by identity.
    ///
    /// Any instantiation of a registered generic definition finds it.
    pub fn reverse_lookup(&self, member: &Member) -> Option<&MemberMapping> {
        self.by_member
            .get(&member.id())
            .and_then(|&index| self.mappings.get(index))
    }

    /// All mappings in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &MemberMapping> {
        self.mappings.iter()
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests;
