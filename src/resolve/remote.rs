use crate::util::{strip_import_keyword, unquote};

/// Whether an import specifier is left for the browser to fetch.
///
/// Remote means a `url(...)` call, a protocol-relative `//host/...`, or an
/// absolute URL with a scheme such as `https:` or `data:`.
pub fn is_remote(specifier: &str) -> bool {
    let s = strip_import_keyword(specifier.trim()).trim();

    if s.get(..4).is_some_and(|head| head.eq_ignore_ascii_case("url(")) {
        return true;
    }

    let target = unquote(s);
    target.starts_with("//") || has_scheme(target)
}

/// `scheme:` per RFC 3986. Single letters are rejected so that Windows
/// drive paths like `C:\styles` stay local.
fn has_scheme(target: &str) -> bool {
    let Some((scheme, _)) = target.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    scheme.len() > 1
        && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
