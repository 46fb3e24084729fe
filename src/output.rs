use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::ImportError;
use crate::model::Stylesheet;

/// `<dir>/<stem>-created.<ext>` next to the entry file
pub fn created_path(entry_path: &Path) -> PathBuf {
    let stem = entry_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match entry_path.extension() {
        Some(ext) => format!("{stem}-created.{}", ext.to_string_lossy()),
        None => format!("{stem}-created"),
    };
    entry_path.with_file_name(name)
}

/// Writes the merged stylesheet next to the entry file and returns its path
pub fn materialize(stylesheet: &Stylesheet, entry_path: &Path) -> Result<PathBuf, ImportError> {
    let path = created_path(entry_path);
    let css = stylesheet.to_string();
    fs::write(&path, &css).map_err(|source| ImportError::Write {
        path: path.clone(),
        source,
    })?;
    info!("Generated {} ({} bytes)", path.display(), css.len());
    Ok(path)
}
