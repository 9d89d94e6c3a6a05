//! Registry snapshot and name↔id resolution.
//!
//! The tag and category registries live outside this crate; callers hand
//! the codec an immutable [`ResolverSnapshot`] built from the registry
//! contents at the moment of each encode/decode. The codec never holds a
//! live registry reference.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One tag row from the tag registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagEntry {
    pub id: String,
    pub name: String,
}

/// One category row from the category registry. Category ids are
/// externally issued opaque identifiers, not small integers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryEntry {
    pub id: String,
    pub name: String,
}

/// Bidirectional name↔id lookup over a registry snapshot.
///
/// Unknown names and ids are silently filtered on every operation: a rule
/// referencing a tag deleted after the rule was written must still encode
/// and decode to a valid wire form, just with that entry omitted.
#[derive(Debug, Clone, Default)]
pub struct ResolverSnapshot {
    tag_name_to_id: BTreeMap<String, String>,
    tag_id_to_name: BTreeMap<String, String>,
    category_name_to_id: BTreeMap<String, String>,
    category_id_to_name: BTreeMap<String, String>,
}

impl ResolverSnapshot {
    pub fn new(tags: &[TagEntry], categories: &[CategoryEntry]) -> Self {
        let mut snapshot = ResolverSnapshot::default();
        for tag in tags {
            snapshot
                .tag_name_to_id
                .insert(tag.name.clone(), tag.id.clone());
            snapshot
                .tag_id_to_name
                .insert(tag.id.clone(), tag.name.clone());
        }
        for category in categories {
            snapshot
                .category_name_to_id
                .insert(category.name.clone(), category.id.clone());
            snapshot
                .category_id_to_name
                .insert(category.id.clone(), category.name.clone());
        }
        snapshot
    }

    // ── Tags ──────────────────────────────────────────────────────────

    pub fn tag_id(&self, name: &str) -> Option<&str> {
        self.tag_name_to_id.get(name).map(String::as_str)
    }

    pub fn tag_name(&self, id: &str) -> Option<&str> {
        self.tag_id_to_name.get(id).map(String::as_str)
    }

    /// Resolve tag names to ids, dropping names no longer in the registry.
    pub fn tag_ids<'a, I>(&self, names: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        names
            .into_iter()
            .filter_map(|n| self.tag_id(n))
            .map(str::to_string)
            .collect()
    }

    /// Resolve tag ids to names, dropping ids no longer in the registry.
    pub fn tag_names<'a, I>(&self, ids: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        ids.into_iter()
            .filter_map(|i| self.tag_name(i))
            .map(str::to_string)
            .collect()
    }

    // ── Categories ────────────────────────────────────────────────────

    pub fn category_id(&self, name: &str) -> Option<&str> {
        self.category_name_to_id.get(name).map(String::as_str)
    }

    pub fn category_name(&self, id: &str) -> Option<&str> {
        self.category_id_to_name.get(id).map(String::as_str)
    }

    /// Resolve category names to ids, dropping unknown names.
    pub fn category_ids<'a, I>(&self, names: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        names
            .into_iter()
            .filter_map(|n| self.category_id(n))
            .map(str::to_string)
            .collect()
    }

    /// Resolve category ids to names, dropping unknown ids.
    pub fn category_names<'a, I>(&self, ids: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        ids.into_iter()
            .filter_map(|i| self.category_name(i))
            .map(str::to_string)
            .collect()
    }
}
