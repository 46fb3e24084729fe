use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::model::Node;

use super::metadata::{CACHE_VERSION, FileMetadata};

/// One file that contributed to a cached import, or a lookup candidate
/// that must stay absent (`metadata: None`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceStamp {
    pub path: PathBuf,
    pub metadata: Option<FileMetadata>,
}

/// Fully inlined content of one import target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedImport {
    pub nodes: Vec<Node>,
    /// The target file and every file it pulled in
    #[serde(default)]
    pub sources: Vec<SourceStamp>,
}

/// On-disk layout of imports.json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportManifest {
    pub version: u32,
    pub tool_version: String,
    pub imports: BTreeMap<String, CachedImport>,
}

impl ImportManifest {
    pub fn new() -> Self {
        Self {
            version: CACHE_VERSION,
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            imports: BTreeMap::new(),
        }
    }

    pub fn is_compatible(&self) -> bool {
        self.version == CACHE_VERSION && self.tool_version == env!("CARGO_PKG_VERSION")
    }
}

impl Default for ImportManifest {
    fn default() -> Self {
        Self::new()
    }
}

impl CachedImport {
    /// Whether every recorded source still has the fingerprint it was cached with
    /// and every skipped candidate is still missing.
    /// `current` returns `None` for files that do not exist.
    pub fn is_fresh(&self, current: impl Fn(&Path) -> Option<FileMetadata>) -> bool {
        self.sources
            .iter()
            .all(|stamp| current(&stamp.path) == stamp.metadata)
    }
}
