pub mod import;
pub mod stylesheet;

pub use import::ImportRule;
pub use stylesheet::{Node, NodeKind, Stylesheet};
