use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cache::{CacheStore, CachedImport, SourceStamp};
use crate::config::ImportOptions;
use crate::error::ImportError;
use crate::model::{ImportRule, Node, NodeKind, Stylesheet};
use crate::parser::CssParser;

use super::path::{candidates, resolve};
use super::remote::is_remote;
use super::source::SourceLoader;
use super::Resolution;

/// Nodes produced by inlining, plus the files they came from
struct Expanded {
    nodes: Vec<Node>,
    sources: Vec<SourceStamp>,
}

/// Depth-first `@import` inliner for a single run.
///
/// Imports are expanded in source order, each one completely before the
/// next sibling. The store is consulted before any file is read and receives
/// one entry per distinct resolved path.
pub struct Importer<'a, L: SourceLoader> {
    options: &'a ImportOptions,
    loader: &'a L,
    parser: &'a mut CssParser,
    store: &'a mut CacheStore,
    /// Files currently being expanded, outermost first
    resolving: Vec<PathBuf>,
    warnings: Vec<String>,
    dependencies: Vec<PathBuf>,
}

impl<'a, L: SourceLoader> Importer<'a, L> {
    pub fn new(
        options: &'a ImportOptions,
        loader: &'a L,
        parser: &'a mut CssParser,
        store: &'a mut CacheStore,
    ) -> Self {
        Self {
            options,
            loader,
            parser,
            store,
            resolving: Vec::new(),
            warnings: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    /// Replaces every local import in `tree` with its fully resolved content.
    /// `entry_path` is the file `tree` was parsed from.
    pub fn resolve_tree(
        mut self,
        tree: Stylesheet,
        entry_path: &Path,
    ) -> Result<Resolution, ImportError> {
        let base_dir = entry_path.parent().unwrap_or(Path::new("")).to_path_buf();
        self.resolving.push(entry_path.to_path_buf());

        let expanded = self.expand(tree.nodes, &base_dir)?;

        Ok(Resolution {
            stylesheet: Stylesheet::new(expanded.nodes, tree.trailing),
            warnings: self.warnings,
            dependencies: self.dependencies,
        })
    }

    /// Carries `parse` warnings for the entry file into the result
    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }

    fn expand(&mut self, nodes: Vec<Node>, base_dir: &Path) -> Result<Expanded, ImportError> {
        let mut out = Vec::with_capacity(nodes.len());
        let mut sources = Vec::new();

        for Node { before, kind } in nodes {
            let rule = match kind {
                NodeKind::Import(rule) => rule,
                kind => {
                    out.push(Node { before, kind });
                    continue;
                }
            };

            if rule.is_empty() {
                return Err(ImportError::EmptyImport);
            }

            if is_remote(&rule.specifier) {
                debug!("Keeping remote import {}", rule.specifier);
                out.push(Node::import(before, rule));
                continue;
            }

            let inlined = self.inline(&rule, base_dir)?;
            merge_sources(&mut sources, inlined.sources);
            splice(before, rule.media.as_deref(), inlined.nodes, &mut out);
        }

        Ok(Expanded {
            nodes: out,
            sources,
        })
    }

    fn inline(&mut self, rule: &ImportRule, base_dir: &Path) -> Result<Expanded, ImportError> {
        let key_path = resolve(rule.target(), base_dir, self.options)?;
        self.check_cycle(&key_path)?;
        let key = key_path.to_string_lossy().into_owned();

        let loader = self.loader;
        if let Some(entry) = self
            .store
            .get(&key)
            .filter(|entry| entry.is_fresh(|path| loader.fingerprint(path)))
        {
            debug!("Cache hit for {}", key);
            let hit = Expanded {
                nodes: entry.nodes.clone(),
                sources: entry.sources.clone(),
            };
            for stamp in hit.sources.iter().filter(|s| s.metadata.is_some()) {
                self.note_dependency(&stamp.path);
            }
            return Ok(hit);
        }

        debug!("Cache miss for {}", key);
        let (path, skipped) = self.locate(rule.target(), base_dir, key_path)?;
        self.check_cycle(&path)?;

        let source = self
            .loader
            .read_to_string(&path)
            .map_err(|source| ImportError::UnreadableTarget {
                path: path.clone(),
                source,
            })?;
        let fingerprint = self.loader.fingerprint(&path);
        self.note_dependency(&path);

        let parsed = self.parser.parse(&source);
        self.warnings.extend(
            parsed
                .errors
                .into_iter()
                .map(|e| format!("{}:{}", path.display(), e)),
        );

        let child_dir = path.parent().unwrap_or(Path::new("")).to_path_buf();
        self.resolving.push(path.clone());
        let result = self.expand(parsed.stylesheet.nodes, &child_dir);
        self.resolving.pop();
        let mut expanded = result?;

        if fingerprint.is_some() {
            expanded.sources.insert(
                0,
                SourceStamp {
                    path,
                    metadata: fingerprint,
                },
            );
        }
        // A candidate that appears later would win the lookup.
        let absent = skipped.into_iter().map(|path| SourceStamp {
            path,
            metadata: None,
        });
        merge_sources(&mut expanded.sources, absent.collect());

        self.store.put(
            key,
            CachedImport {
                nodes: expanded.nodes.clone(),
                sources: expanded.sources.clone(),
            },
        );

        Ok(expanded)
    }

    /// First existing candidate, or the primary path so the read reports it.
    /// Also returns the higher-priority candidates that were missing.
    fn locate(
        &self,
        target: &str,
        base_dir: &Path,
        primary: PathBuf,
    ) -> Result<(PathBuf, Vec<PathBuf>), ImportError> {
        let mut skipped = Vec::new();
        for path in candidates(target, base_dir, self.options)? {
            if self.loader.is_file(&path) {
                return Ok((path, skipped));
            }
            skipped.push(path);
        }
        Ok((primary, Vec::new()))
    }

    fn check_cycle(&self, path: &Path) -> Result<(), ImportError> {
        match self.resolving.iter().position(|p| p == path) {
            Some(start) => {
                let mut chain = self.resolving[start..].to_vec();
                chain.push(path.to_path_buf());
                Err(ImportError::CyclicImport { chain })
            }
            None => Ok(()),
        }
    }

    fn note_dependency(&mut self, path: &Path) {
        if !self.dependencies.iter().any(|p| p == path) {
            self.dependencies.push(path.to_path_buf());
        }
    }
}

fn merge_sources(into: &mut Vec<SourceStamp>, from: Vec<SourceStamp>) {
    for stamp in from {
        if !into.iter().any(|s| s.path == stamp.path) {
            into.push(stamp);
        }
    }
}

/// Puts inlined nodes where the directive was. The first node takes the
/// directive's leading whitespace; a media condition wraps them all.
fn splice(before: String, media: Option<&str>, mut nodes: Vec<Node>, out: &mut Vec<Node>) {
    if nodes.is_empty() {
        return;
    }
    match media {
        Some(condition) => out.push(Node::media_block(before, condition, nodes)),
        None => {
            nodes[0].before = before;
            out.extend(nodes);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::FileMetadata;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::io;

    /// In-memory sources that record every read
    #[derive(Default)]
    struct MemoryLoader {
        files: HashMap<PathBuf, String>,
        reads: RefCell<Vec<PathBuf>>,
    }

    impl MemoryLoader {
        fn with(mut self, path: &str, content: &str) -> Self {
            self.files.insert(PathBuf::from(path), content.to_string());
            self
        }

        fn read_count(&self) -> usize {
            self.reads.borrow().len()
        }
    }

    impl SourceLoader for MemoryLoader {
        fn read_to_string(&self, path: &Path) -> io::Result<String> {
            self.reads.borrow_mut().push(path.to_path_buf());
            self.files
                .get(path)
                .cloned()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
        }

        fn is_file(&self, path: &Path) -> bool {
            self.files.contains_key(path)
        }

        fn fingerprint(&self, path: &Path) -> Option<FileMetadata> {
            self.files.get(path).map(|content| FileMetadata {
                mtime: 1,
                size: content.len() as u64,
            })
        }
    }

    fn run(
        loader: &MemoryLoader,
        store: &mut CacheStore,
        source: &str,
    ) -> Result<Resolution, ImportError> {
        let options = ImportOptions::default();
        let mut parser = CssParser::new();
        let tree = parser.parse(source).stylesheet;
        Importer::new(&options, loader, &mut parser, store)
            .resolve_tree(tree, Path::new("/styles/main.css"))
    }

    #[test]
    fn test_inlines_in_source_order() {
        let loader = MemoryLoader::default()
            .with("/styles/a.css", ".a { color: red }\n")
            .with("/styles/b.css", ".b { color: blue }\n");
        let mut store = CacheStore::new();

        let result = run(
            &loader,
            &mut store,
            "@import \"a\";\n.main {}\n@import \"b\";\n",
        )
        .unwrap();

        assert_eq!(
            result.css(),
            ".a { color: red }\n.main {}\n.b { color: blue }\n"
        );
        assert!(result.warnings.is_empty());
        assert_eq!(
            result.dependencies,
            vec![PathBuf::from("/styles/a.css"), PathBuf::from("/styles/b.css")]
        );
    }

    #[test]
    fn test_nested_imports_resolve_from_their_own_directory() {
        let loader = MemoryLoader::default()
            .with("/styles/level1/a.css", "@import \"../shared/c\";\n.a {}\n")
            .with("/styles/shared/c.css", ".c {}\n");
        let mut store = CacheStore::new();

        let result = run(&loader, &mut store, "@import \"level1/a\";\n").unwrap();

        assert_eq!(result.css(), ".c {}\n.a {}\n");
        assert_eq!(store.len(), 2);
        assert!(store.get("/styles/level1/a.css").is_some());
        assert!(store.get("/styles/shared/c.css").is_some());
    }

    #[test]
    fn test_partial_and_index_candidates() {
        let loader = MemoryLoader::default()
            .with("/styles/_colors.css", ".colors {}")
            .with("/styles/theme/index.css", ".theme {}");
        let mut store = CacheStore::new();

        let result = run(&loader, &mut store, "@import \"colors\";\n@import \"theme\";").unwrap();

        assert_eq!(result.css(), ".colors {}\n.theme {}");
    }

    #[test]
    fn test_repeated_import_reads_once_inlines_twice() {
        let loader = MemoryLoader::default().with("/styles/a.css", ".a {}");
        let mut store = CacheStore::new();

        let result = run(&loader, &mut store, "@import \"a\";\n@import \"a\";").unwrap();

        assert_eq!(result.css(), ".a {}\n.a {}");
        assert_eq!(loader.read_count(), 1);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_media_wrapping() {
        let loader = MemoryLoader::default().with("/styles/a.css", ".a {}\n.b {}\n");
        let mut store = CacheStore::new();

        let result = run(&loader, &mut store, "@import \"a\" screen and (min-width: 40em);\n")
            .unwrap();

        assert_eq!(
            result.css(),
            "@media screen and (min-width: 40em) {\n.a {}\n.b {}\n}\n"
        );
    }

    #[test]
    fn test_remote_import_untouched() {
        let loader = MemoryLoader::default();
        let mut store = CacheStore::new();
        let source = "@import url(\"https://example.com/a.css\");\n@import \"//cdn.example.com/b.css\" print;\n.x {}\n";

        let result = run(&loader, &mut store, source).unwrap();

        assert_eq!(result.css(), source);
        assert_eq!(loader.read_count(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_empty_import_fails() {
        let loader = MemoryLoader::default().with("/styles/a.css", ".a {}");
        let mut store = CacheStore::new();

        let err = run(&loader, &mut store, "@import \"a\";\n@import \"\";\n").unwrap_err();
        assert_eq!(err.to_string(), "Empty import detected");
    }

    #[test]
    fn test_nested_empty_import_fails() {
        let loader = MemoryLoader::default().with("/styles/a.css", "@import '  ';\n.a {}");
        let mut store = CacheStore::new();

        let err = run(&loader, &mut store, "@import \"a\";\n").unwrap_err();
        assert!(matches!(err, ImportError::EmptyImport));
    }

    #[test]
    fn test_missing_target_names_path() {
        let loader = MemoryLoader::default();
        let mut store = CacheStore::new();

        let err = run(&loader, &mut store, "@import \"missing\";\n").unwrap_err();
        match err {
            ImportError::UnreadableTarget { path, .. } => {
                assert_eq!(path, PathBuf::from("/styles/missing.css"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_cycle_detected() {
        let loader = MemoryLoader::default()
            .with("/styles/a.css", "@import \"b\";")
            .with("/styles/b.css", "@import \"a\";");
        let mut store = CacheStore::new();

        let err = run(&loader, &mut store, "@import \"a\";").unwrap_err();
        match err {
            ImportError::CyclicImport { chain } => {
                assert_eq!(
                    chain,
                    vec![
                        PathBuf::from("/styles/a.css"),
                        PathBuf::from("/styles/b.css"),
                        PathBuf::from("/styles/a.css"),
                    ]
                );
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_self_import_of_entry_detected() {
        let loader = MemoryLoader::default();
        let mut store = CacheStore::new();

        let err = run(&loader, &mut store, "@import \"main\";").unwrap_err();
        assert!(matches!(err, ImportError::CyclicImport { .. }));
    }

    #[test]
    fn test_cache_hit_skips_reads() {
        let loader = MemoryLoader::default()
            .with("/styles/a.css", "@import \"b\";\n.a {}")
            .with("/styles/b.css", ".b {}");
        let mut store = CacheStore::new();

        let first = run(&loader, &mut store, "@import \"a\";").unwrap();
        assert_eq!(loader.read_count(), 2);

        let second = run(&loader, &mut store, "@import \"a\";").unwrap();
        assert_eq!(loader.read_count(), 2);
        assert_eq!(first.css(), second.css());
        assert_eq!(second.dependencies.len(), 2);
    }

    #[test]
    fn test_stale_nested_source_invalidates_entry() {
        let loader = MemoryLoader::default()
            .with("/styles/a.css", "@import \"b\";\n.a {}")
            .with("/styles/b.css", ".b {}");
        let mut store = CacheStore::new();
        run(&loader, &mut store, "@import \"a\";").unwrap();

        let loader = loader.with("/styles/b.css", ".b { color: red }");
        let result = run(&loader, &mut store, "@import \"a\";").unwrap();

        assert_eq!(result.css(), ".b { color: red }\n.a {}");
        assert_eq!(loader.read_count(), 4);
    }

    #[test]
    fn test_new_primary_file_invalidates_partial_entry() {
        let loader = MemoryLoader::default().with("/styles/_foo.css", ".partial {}\n");
        let mut store = CacheStore::new();
        let cached = run(&loader, &mut store, "@import \"foo\";\n").unwrap();
        assert_eq!(cached.css(), ".partial {}\n");

        let loader = loader.with("/styles/foo.css", ".full {}\n");
        let warm = run(&loader, &mut store, "@import \"foo\";\n").unwrap();
        let cold = run(&loader, &mut CacheStore::new(), "@import \"foo\";\n").unwrap();

        assert_eq!(warm.css(), ".full {}\n");
        assert_eq!(warm.css(), cold.css());
        assert_eq!(warm.dependencies, vec![PathBuf::from("/styles/foo.css")]);
    }

    #[test]
    fn test_partial_entry_hit_while_primary_absent() {
        let loader = MemoryLoader::default().with("/styles/theme/index.css", ".theme {}");
        let mut store = CacheStore::new();
        run(&loader, &mut store, "@import \"theme\";").unwrap();

        let result = run(&loader, &mut store, "@import \"theme\";").unwrap();

        assert_eq!(result.css(), ".theme {}");
        assert_eq!(loader.read_count(), 1);
        assert_eq!(
            result.dependencies,
            vec![PathBuf::from("/styles/theme/index.css")]
        );
    }

    #[test]
    fn test_media_import_nests_existing_media() {
        let loader = MemoryLoader::default()
            .with("/styles/a.css", ".a {}\n@media print {\n  .b {}\n}\n");
        let mut store = CacheStore::new();

        let result = run(&loader, &mut store, "@import \"a\" screen;\n").unwrap();

        assert_eq!(
            result.css(),
            "@media screen {\n.a {}\n@media print {\n  .b {}\n}\n}\n"
        );
    }
}
