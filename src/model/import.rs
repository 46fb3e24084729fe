use serde::{Deserialize, Serialize};

use crate::util::{strip_import_keyword, unquote};

/// A single `@import` directive as written in the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportRule {
    /// Directive text exactly as it appeared, including `@import` and `;`
    pub raw: String,
    /// Specifier token, still quoted or wrapped in `url(...)`
    pub specifier: String,
    /// Trailing media query list, if any
    pub media: Option<String>,
}

impl ImportRule {
    /// Splits raw directive text into specifier and media condition.
    ///
    /// The specifier is a quoted string, a whole `url(...)` call, or a bare
    /// token up to the first whitespace. Whatever follows is the media
    /// condition.
    pub fn parse(raw: &str) -> Self {
        let body = strip_import_keyword(raw.trim()).trim();
        let body = body.strip_suffix(';').unwrap_or(body).trim();

        let (specifier, rest) = split_specifier(body);
        let media = rest.trim();

        Self {
            raw: raw.to_string(),
            specifier: specifier.to_string(),
            media: (!media.is_empty()).then(|| media.to_string()),
        }
    }

    /// Specifier with quoting removed and whitespace trimmed
    pub fn target(&self) -> &str {
        unquote(&self.specifier).trim()
    }

    pub fn is_empty(&self) -> bool {
        self.target().is_empty()
    }
}

fn split_specifier(body: &str) -> (&str, &str) {
    if let Some(quote) = body.chars().next().filter(|c| *c == '"' || *c == '\'') {
        let mut escaped = false;
        for (i, c) in body.char_indices().skip(1) {
            match c {
                '\\' if !escaped => escaped = true,
                c if c == quote && !escaped => return body.split_at(i + c.len_utf8()),
                _ => escaped = false,
            }
        }
        return (body, "");
    }

    let is_url = body
        .get(..4)
        .is_some_and(|head| head.eq_ignore_ascii_case("url("));
    if is_url {
        if let Some(close) = body.find(')') {
            return body.split_at(close + 1);
        }
        return (body, "");
    }

    match body.find(char::is_whitespace) {
        Some(i) => body.split_at(i),
        None => (body, ""),
    }
}
