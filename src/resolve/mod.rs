mod importer;
mod path;
mod remote;
mod source;

use std::path::PathBuf;

use crate::model::Stylesheet;

pub use importer::Importer;
pub use path::{candidates, resolve};
pub use remote::is_remote;
pub use source::{FsLoader, SourceLoader};

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Input with every local import inlined
    pub stylesheet: Stylesheet,
    /// Recoverable problems, e.g. unparseable statements. Empty on clean input.
    pub warnings: Vec<String>,
    /// Local files that contributed, in first-seen order
    pub dependencies: Vec<PathBuf>,
}

impl Resolution {
    /// Merged stylesheet as text
    pub fn css(&self) -> String {
        self.stylesheet.to_string()
    }
}
