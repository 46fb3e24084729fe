use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Config file looked up next to the entry stylesheet
pub const CONFIG_FILE_NAME: &str = "partial-import.json";

/// Import resolution options
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImportOptions {
    /// Persistent cache directory; caching across runs is off when absent
    #[serde(default)]
    pub cachedir: Option<PathBuf>,
    /// Write the merged stylesheet next to the entry as `<name>-created.<ext>`
    #[serde(default)]
    pub generate: bool,
    /// Extension appended to extension-less specifiers (without the dot)
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Prefix marking partial files, e.g. `_colors.css`
    #[serde(default = "default_prefix")]
    pub prefix: String,
}

fn default_extension() -> String {
    "css".to_string()
}

fn default_prefix() -> String {
    "_".to_string()
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            cachedir: None,
            generate: false,
            extension: default_extension(),
            prefix: default_prefix(),
        }
    }
}

impl ImportOptions {
    pub fn with_cachedir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cachedir = Some(dir.into());
        self
    }

    pub fn with_generate(mut self, generate: bool) -> Self {
        self.generate = generate;
        self
    }

    /// Reads partial-import.json from the given directory
    pub fn load_from_dir(dir: &Path) -> Self {
        Self::load_from_path(&dir.join(CONFIG_FILE_NAME))
    }

    /// Reads options from a JSON file, falling back to defaults
    pub fn load_from_path(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(options) => options,
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to read {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Extension with a leading dot, e.g. `.css`
    pub fn dotted_extension(&self) -> String {
        format!(".{}", self.extension.trim_start_matches('.'))
    }
}
