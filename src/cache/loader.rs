use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::CacheError;

use super::metadata::{CACHE_VERSION, MANIFEST_FILE_NAME};
use super::schema::ImportManifest;
use super::store::CacheStore;

/// Cache loader
pub struct CacheLoader {
    cache_dir: PathBuf,
}

impl CacheLoader {
    pub fn new(cache_dir: &Path) -> Self {
        Self {
            cache_dir: cache_dir.to_path_buf(),
        }
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.cache_dir.join(MANIFEST_FILE_NAME)
    }

    /// Loads the store, starting empty when the manifest is missing,
    /// unreadable, or written by another version.
    pub fn load(&self) -> CacheStore {
        match self.read_manifest() {
            Ok(manifest) => {
                info!(
                    "Loaded {} cached imports from {}",
                    manifest.imports.len(),
                    self.manifest_path().display()
                );
                CacheStore::from_manifest(manifest)
            }
            Err(CacheError::NotFound) => {
                debug!("No import cache at {}", self.manifest_path().display());
                CacheStore::new()
            }
            Err(e) => {
                warn!(
                    "Ignoring import cache at {}: {}",
                    self.manifest_path().display(),
                    e
                );
                CacheStore::new()
            }
        }
    }

    fn read_manifest(&self) -> Result<ImportManifest, CacheError> {
        let manifest_path = self.manifest_path();
        if !manifest_path.exists() {
            return Err(CacheError::NotFound);
        }

        let content = fs::read_to_string(&manifest_path)?;
        let manifest: ImportManifest = serde_json::from_str(&content)?;

        if !manifest.is_compatible() {
            warn!(
                "Cache version mismatch: {} (expected {})",
                manifest.version, CACHE_VERSION
            );
            return Err(CacheError::VersionMismatch);
        }

        Ok(manifest)
    }
}

impl CacheStore {
    /// Shorthand for `CacheLoader::new(cache_dir).load()`
    pub fn load(cache_dir: &Path) -> Self {
        CacheLoader::new(cache_dir).load()
    }
}
