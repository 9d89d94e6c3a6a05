//! Registry file loading.
//!
//! The CLI reads tag/category registry snapshots from a JSON file:
//! `{ "tags": [{"id", "name"}...], "categories": [...] }`. Both arrays
//! are optional; a missing section just means nothing resolves.

use std::path::Path;

use serde::Deserialize;

use moneta_core::{CategoryEntry, ResolverSnapshot, TagEntry};

#[derive(Debug, Default, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    tags: Vec<TagEntry>,
    #[serde(default)]
    categories: Vec<CategoryEntry>,
}

pub(crate) fn load_registry(path: &Path) -> Result<ResolverSnapshot, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read registry file {}: {}", path.display(), e))?;
    let file: RegistryFile = serde_json::from_str(&text)
        .map_err(|e| format!("invalid registry file {}: {}", path.display(), e))?;
    Ok(ResolverSnapshot::new(&file.tags, &file.categories))
}
