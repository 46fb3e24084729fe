use tree_sitter::Parser;

use crate::model::{ImportRule, Node, Stylesheet};
use crate::util::starts_with_import;

/// Parse result: the stylesheet plus recoverable syntax problems
#[derive(Debug, Clone)]
pub struct Parsed {
    pub stylesheet: Stylesheet,
    pub errors: Vec<String>,
}

/// Splits CSS source into top-level statements using tree-sitter-css
pub struct CssParser {
    parser: Parser,
}

impl CssParser {
    pub fn new() -> Self {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_css::LANGUAGE.into())
            .expect("Failed to load CSS grammar");

        Self { parser }
    }

    pub fn parse(&mut self, source: &str) -> Parsed {
        let Some(tree) = self.parser.parse(source, None) else {
            // Parsing only fails on cancellation; keep the text untouched.
            return Parsed {
                stylesheet: Stylesheet::new(vec![Node::raw("", source)], ""),
                errors: vec!["1: unparseable CSS".to_string()],
            };
        };

        let root = tree.root_node();
        let mut nodes = Vec::new();
        let mut errors = Vec::new();
        let mut cursor = root.walk();
        let mut last_end = 0;

        for child in root.children(&mut cursor) {
            let (start, end) = (child.start_byte(), child.end_byte());
            if start == end || start < last_end {
                continue;
            }
            let before = &source[last_end..start];
            let text = &source[start..end];
            last_end = end;

            let well_formed = !(child.is_error() || child.has_error());

            // Uppercase keywords and a missing final `;` come back as error
            // nodes or generic at-rules; they are still usable imports.
            let clean = if child.kind() == "import_statement" {
                let rule = ImportRule::parse(text);
                let clean = well_formed || !rule.is_empty();
                nodes.push(Node::import(before, rule));
                clean
            } else if (child.is_error() || child.kind() == "at_rule") && starts_with_import(text) {
                split_broken_import(before, text, &mut nodes) || well_formed
            } else {
                nodes.push(Node::raw(before, text));
                well_formed
            };

            if !clean {
                errors.push(format!("{}: unparseable CSS", child.start_position().row + 1));
            }
        }

        Parsed {
            stylesheet: Stylesheet::new(nodes, &source[last_end..]),
            errors,
        }
    }
}

impl Default for CssParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Error recovery may swallow the statements after a malformed `@import`.
/// Keep the directive up to its `;` and the rest verbatim.
/// Returns false when the directive has no target.
fn split_broken_import(before: &str, text: &str, nodes: &mut Vec<Node>) -> bool {
    let leading = text.len() - text.trim_start().len();
    let (before, text) = if leading > 0 {
        (format!("{before}{}", &text[..leading]), &text[leading..])
    } else {
        (before.to_string(), text)
    };

    match text.find(';') {
        Some(i) if i + 1 < text.len() => {
            let (directive, rest) = text.split_at(i + 1);
            let trimmed = rest.trim_start();
            let gap = &rest[..rest.len() - trimmed.len()];
            let rule = ImportRule::parse(directive);
            let clean = !rule.is_empty();
            nodes.push(Node::import(before, rule));
            if !trimmed.is_empty() {
                nodes.push(Node::raw(gap, trimmed));
            }
            clean
        }
        _ => {
            let rule = ImportRule::parse(text);
            let clean = !rule.is_empty();
            nodes.push(Node::import(before, rule));
            clean
        }
    }
}
