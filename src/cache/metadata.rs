use std::fs;
use std::time::UNIX_EPOCH;

use serde::{Deserialize, Serialize};

/// Cache format version
/// v1: per-import node lists with source fingerprints
/// v2: optional fingerprints; `null` marks a candidate that must stay missing
pub const CACHE_VERSION: u32 = 2;

/// Manifest file name inside the cache directory
pub const MANIFEST_FILE_NAME: &str = "imports.json";

/// File fingerprint for cache validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    /// Modification time in nanoseconds since the Unix epoch
    pub mtime: u64,
    pub size: u64,
}

impl FileMetadata {
    pub fn from_fs(meta: &fs::Metadata) -> Self {
        let mtime = meta
            .modified()
            .ok()
            .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        Self {
            mtime,
            size: meta.len(),
        }
    }
}
