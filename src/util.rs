use std::path::{Component, Path, PathBuf};

/// Removes one layer of surrounding `"` or `'` quotes.
/// An unterminated opening quote is dropped as well.
pub fn unquote(s: &str) -> &str {
    let s = s.trim();
    for quote in ['"', '\''] {
        if let Some(inner) = s.strip_prefix(quote) {
            return inner.strip_suffix(quote).unwrap_or(inner);
        }
    }
    s
}

/// Strips a leading `@import` keyword (ASCII case-insensitive)
pub fn strip_import_keyword(s: &str) -> &str {
    match s.get(..7) {
        Some(head) if head.eq_ignore_ascii_case("@import") => &s[7..],
        _ => s,
    }
}

/// Whether the text starts with an `@import` keyword
pub fn starts_with_import(s: &str) -> bool {
    s.trim_start()
        .get(..7)
        .is_some_and(|head| head.eq_ignore_ascii_case("@import"))
}

/// Folds `.` and `..` components without touching the filesystem.
/// `..` above the root is discarded.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}
