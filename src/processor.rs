use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::cache::CacheStore;
use crate::config::ImportOptions;
use crate::error::ImportError;
use crate::model::Stylesheet;
use crate::output::materialize;
use crate::parser::CssParser;
use crate::resolve::{FsLoader, Importer, Resolution, SourceLoader};
use crate::util::normalize_path;

/// Name used for string input that has no source file
const STDIN_NAME: &str = "<input>.css";

/// Runs import resolution with one set of options.
///
/// Each call is an independent run: the cache is loaded from `cachedir` at
/// the start and written back only when the whole tree resolved.
pub struct PartialImport<L: SourceLoader = FsLoader> {
    options: ImportOptions,
    loader: L,
    parser: CssParser,
}

impl PartialImport<FsLoader> {
    pub fn new(options: ImportOptions) -> Self {
        Self::with_loader(options, FsLoader)
    }
}

impl<L: SourceLoader> PartialImport<L> {
    pub fn with_loader(options: ImportOptions, loader: L) -> Self {
        Self {
            options,
            loader,
            parser: CssParser::new(),
        }
    }

    /// Parses and resolves CSS text.
    ///
    /// `from` is the file the text came from. Without it imports resolve from
    /// the current directory and `generate` has nowhere to write.
    pub fn process(&mut self, css: &str, from: Option<&Path>) -> Result<Resolution, ImportError> {
        let parsed = self.parser.parse(css);
        let (entry, has_source) = match from {
            Some(path) => (absolute_entry(path), true),
            None => (
                std::env::current_dir().unwrap_or_default().join(STDIN_NAME),
                false,
            ),
        };
        let warnings = parsed
            .errors
            .into_iter()
            .map(|e| format!("{}:{}", entry.display(), e))
            .collect();

        self.run(parsed.stylesheet, &entry, warnings, has_source)
    }

    /// Reads and resolves a stylesheet file
    pub fn process_file(&mut self, path: &Path) -> Result<Resolution, ImportError> {
        let css = self
            .loader
            .read_to_string(path)
            .map_err(|source| ImportError::UnreadableTarget {
                path: path.to_path_buf(),
                source,
            })?;
        self.process(&css, Some(path))
    }

    /// Resolves an already parsed tree that was read from `entry_path`
    pub fn resolve_tree(
        &mut self,
        tree: Stylesheet,
        entry_path: &Path,
    ) -> Result<Resolution, ImportError> {
        let entry = absolute_entry(entry_path);
        self.run(tree, &entry, Vec::new(), true)
    }

    fn run(
        &mut self,
        tree: Stylesheet,
        entry: &Path,
        warnings: Vec<String>,
        has_source: bool,
    ) -> Result<Resolution, ImportError> {
        let mut store = match &self.options.cachedir {
            Some(dir) => CacheStore::load(dir),
            None => CacheStore::new(),
        };

        let mut resolution = Importer::new(&self.options, &self.loader, &mut self.parser, &mut store)
            .with_warnings(warnings)
            .resolve_tree(tree, entry)?;
        debug!(
            "Resolved {} with {} dependencies",
            entry.display(),
            resolution.dependencies.len()
        );

        if let Some(dir) = &self.options.cachedir {
            store.flush(dir)?;
        }

        if self.options.generate {
            if has_source {
                materialize(&resolution.stylesheet, entry)?;
            } else {
                warn!("generate is set but the input has no source path");
                resolution
                    .warnings
                    .push("generate skipped: input has no source path".to_string());
            }
        }

        Ok(resolution)
    }
}

/// Absolute, lexically normalized form of the entry path
fn absolute_entry(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    normalize_path(&absolute)
}

/// One-shot resolution of a parsed tree with the filesystem loader
pub fn resolve_tree(
    tree: Stylesheet,
    entry_path: &Path,
    options: &ImportOptions,
) -> Result<Resolution, ImportError> {
    PartialImport::new(options.clone()).resolve_tree(tree, entry_path)
}
