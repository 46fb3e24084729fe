use std::path::{Path, PathBuf};

use crate::config::ImportOptions;
use crate::error::ImportError;
use crate::util::{normalize_path, strip_import_keyword, unquote};

/// Bare target of a specifier: no `@import`, no `;`, no quotes.
fn clean_specifier(specifier: &str) -> &str {
    let s = strip_import_keyword(specifier.trim()).trim();
    let s = s.strip_suffix(';').unwrap_or(s);
    unquote(s).trim()
}

fn has_extension(target: &str, options: &ImportOptions) -> bool {
    Path::new(target)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case(options.extension.trim_start_matches('.')))
}

/// Primary path for a specifier relative to `base_dir`.
///
/// Pure path algebra: quoting and a leading `@import` are stripped, the
/// configured extension is appended when missing, and `.`/`..` are folded.
/// This path is also the cache identity of the import.
pub fn resolve(
    specifier: &str,
    base_dir: &Path,
    options: &ImportOptions,
) -> Result<PathBuf, ImportError> {
    let target = clean_specifier(specifier);
    if target.is_empty() {
        return Err(ImportError::EmptyImport);
    }

    if target.ends_with('/') {
        return Ok(normalize_path(
            &base_dir.join(target).join(format!("index{}", options.dotted_extension())),
        ));
    }

    let file = if has_extension(target, options) {
        target.to_string()
    } else {
        format!("{target}{}", options.dotted_extension())
    };
    Ok(normalize_path(&base_dir.join(file)))
}

/// Every path the specifier may refer to, most specific first:
/// `name.css`, `_name.css`, then `name/index.css` and `name/_index.css`
/// for extension-less specifiers.
pub fn candidates(
    specifier: &str,
    base_dir: &Path,
    options: &ImportOptions,
) -> Result<Vec<PathBuf>, ImportError> {
    let primary = resolve(specifier, base_dir, options)?;
    let target = clean_specifier(specifier);
    let mut out = vec![primary.clone()];

    if let Some(partial) = partial_of(&primary, options) {
        out.push(partial);
    }

    if !target.ends_with('/') && !has_extension(target, options) {
        let index = normalize_path(&base_dir.join(target))
            .join(format!("index{}", options.dotted_extension()));
        let partial = partial_of(&index, options);
        out.push(index);
        out.extend(partial);
    }

    Ok(out)
}

fn partial_of(path: &Path, options: &ImportOptions) -> Option<PathBuf> {
    if options.prefix.is_empty() {
        return None;
    }
    let name = path.file_name()?.to_str()?;
    if name.starts_with(&options.prefix) {
        return None;
    }
    Some(path.with_file_name(format!("{}{name}", options.prefix)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("foo", "/styles/foo.css")]
    #[case(r#""foo""#, "/styles/foo.css")]
    #[case("'level1/bar'", "/styles/level1/bar.css")]
    #[case(r#"@import "foo";"#, "/styles/foo.css")]
    #[case("foo.css", "/styles/foo.css")]
    #[case("foo.min", "/styles/foo.min.css")]
    #[case("../shared/colors", "/shared/colors.css")]
    #[case("./a/../b", "/styles/b.css")]
    #[case("/abs/reset", "/abs/reset.css")]
    #[case("theme/", "/styles/theme/index.css")]
    fn test_resolve(#[case] specifier: &str, #[case] expected: &str) {
        let options = ImportOptions::default();
        let path = resolve(specifier, Path::new("/styles"), &options).unwrap();
        assert_eq!(path, PathBuf::from(expected));
    }

    #[rstest]
    #[case("")]
    #[case(r#""""#)]
    #[case("'   '")]
    #[case("@import ;")]
    fn test_resolve_empty(#[case] specifier: &str) {
        let err = resolve(specifier, Path::new("/styles"), &ImportOptions::default()).unwrap_err();
        assert!(matches!(err, ImportError::EmptyImport));
    }

    #[test]
    fn test_resolve_is_deterministic() {
        let options = ImportOptions::default();
        let a = resolve("x/y", Path::new("/base"), &options).unwrap();
        let b = resolve("x/y", Path::new("/base"), &options).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_candidates_without_extension() {
        let found = candidates("level1/foo", Path::new("/styles"), &ImportOptions::default())
            .unwrap();
        assert_eq!(
            found,
            vec![
                PathBuf::from("/styles/level1/foo.css"),
                PathBuf::from("/styles/level1/_foo.css"),
                PathBuf::from("/styles/level1/foo/index.css"),
                PathBuf::from("/styles/level1/foo/_index.css"),
            ]
        );
    }

    #[test]
    fn test_candidates_with_extension() {
        let found =
            candidates("foo.css", Path::new("/styles"), &ImportOptions::default()).unwrap();
        assert_eq!(
            found,
            vec![
                PathBuf::from("/styles/foo.css"),
                PathBuf::from("/styles/_foo.css"),
            ]
        );
    }

    #[test]
    fn test_candidates_already_partial() {
        let found =
            candidates("_foo.css", Path::new("/styles"), &ImportOptions::default()).unwrap();
        assert_eq!(found, vec![PathBuf::from("/styles/_foo.css")]);
    }

    #[test]
    fn test_custom_extension_and_prefix() {
        let options = ImportOptions {
            extension: "pcss".to_string(),
            prefix: String::new(),
            ..ImportOptions::default()
        };
        let found = candidates("foo", Path::new("/s"), &options).unwrap();
        assert_eq!(
            found,
            vec![
                PathBuf::from("/s/foo.pcss"),
                PathBuf::from("/s/foo/index.pcss"),
            ]
        );
    }
}
