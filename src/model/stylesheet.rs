use std::fmt;

use serde::{Deserialize, Serialize};

use super::import::ImportRule;

/// Ordered top-level nodes of one stylesheet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stylesheet {
    pub nodes: Vec<Node>,
    /// Text after the last node (usually the final newline)
    #[serde(default)]
    pub trailing: String,
}

/// A node plus the whitespace that preceded it in the source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    #[serde(default)]
    pub before: String,
    pub kind: NodeKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Import(ImportRule),
    /// At-rule wrapping child nodes, e.g. `@media screen { ... }`
    Block {
        prelude: String,
        nodes: Vec<Node>,
        trailing: String,
    },
    /// Any other statement or comment, kept verbatim
    Raw(String),
}

impl Stylesheet {
    pub fn new(nodes: Vec<Node>, trailing: impl Into<String>) -> Self {
        Self {
            nodes,
            trailing: trailing.into(),
        }
    }

    /// Import directives at the top level, in source order
    pub fn imports(&self) -> impl Iterator<Item = &ImportRule> {
        self.nodes.iter().filter_map(|node| match &node.kind {
            NodeKind::Import(rule) => Some(rule),
            _ => None,
        })
    }
}

impl Node {
    pub fn raw(before: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            before: before.into(),
            kind: NodeKind::Raw(text.into()),
        }
    }

    pub fn import(before: impl Into<String>, rule: ImportRule) -> Self {
        Self {
            before: before.into(),
            kind: NodeKind::Import(rule),
        }
    }

    /// Wraps `nodes` in `@media <condition> { ... }`.
    ///
    /// Child nodes keep their own media blocks as-is; conditions are nested,
    /// never merged.
    pub fn media_block(before: impl Into<String>, condition: &str, mut nodes: Vec<Node>) -> Self {
        if let Some(first) = nodes.first_mut() {
            if !first.before.contains('\n') {
                first.before = "\n".to_string();
            }
        }
        Self {
            before: before.into(),
            kind: NodeKind::Block {
                prelude: format!("@media {condition}"),
                nodes,
                trailing: "\n".to_string(),
            },
        }
    }
}

impl fmt::Display for Stylesheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.nodes {
            write!(f, "{node}")?;
        }
        f.write_str(&self.trailing)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.before)?;
        match &self.kind {
            NodeKind::Import(rule) => f.write_str(&rule.raw),
            NodeKind::Raw(text) => f.write_str(text),
            NodeKind::Block {
                prelude,
                nodes,
                trailing,
            } => {
                write!(f, "{prelude} {{")?;
                for node in nodes {
                    write!(f, "{node}")?;
                }
                write!(f, "{trailing}}}")
            }
        }
    }
}
