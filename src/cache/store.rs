use std::collections::HashMap;

use super::schema::{CachedImport, ImportManifest};

/// Resolved imports for one run, keyed by resolved path.
///
/// Loaded from a cache directory at the start of a run (see `CacheLoader`)
/// and written back once when the run succeeds (see `CacheWriter`).
#[derive(Debug, Default)]
pub struct CacheStore {
    entries: HashMap<String, CachedImport>,
}

impl CacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&CachedImport> {
        self.entries.get(key)
    }

    /// Inserts or supersedes the entry for `key`
    pub fn put(&mut self, key: impl Into<String>, entry: CachedImport) {
        self.entries.insert(key.into(), entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(super) fn from_manifest(manifest: ImportManifest) -> Self {
        Self {
            entries: manifest.imports.into_iter().collect(),
        }
    }

    pub(super) fn to_manifest(&self) -> ImportManifest {
        let mut manifest = ImportManifest::new();
        manifest.imports = self
            .entries
            .iter()
            .map(|(key, entry)| (key.clone(), entry.clone()))
            .collect();
        manifest
    }
}
