use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::CacheError;

use super::metadata::MANIFEST_FILE_NAME;
use super::store::CacheStore;

/// Cache writer
pub struct CacheWriter {
    cache_dir: PathBuf,
}

impl CacheWriter {
    pub fn new(cache_dir: &Path) -> Self {
        Self {
            cache_dir: cache_dir.to_path_buf(),
        }
    }

    fn ensure_cache_dir(&self) -> std::io::Result<()> {
        if !self.cache_dir.exists() {
            fs::create_dir_all(&self.cache_dir)?;
        }
        Ok(())
    }

    /// Overwrites the manifest with the full contents of the store
    pub fn save(&self, store: &CacheStore) -> Result<(), CacheError> {
        self.ensure_cache_dir()?;

        let manifest = store.to_manifest();
        let json = serde_json::to_string_pretty(&manifest)?;
        let manifest_path = self.cache_dir.join(MANIFEST_FILE_NAME);
        fs::write(&manifest_path, &json)?;

        info!(
            "Saved import cache: {} entries, {} bytes",
            manifest.imports.len(),
            json.len()
        );

        Ok(())
    }
}

impl CacheStore {
    /// Shorthand for `CacheWriter::new(cache_dir).save(self)`
    pub fn flush(&self, cache_dir: &Path) -> Result<(), CacheError> {
        CacheWriter::new(cache_dir).save(self)
    }
}
