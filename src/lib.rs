pub mod cache;
pub mod config;
pub mod error;
pub mod model;
pub mod output;
pub mod parser;
pub mod processor;
pub mod resolve;
pub mod util;

pub use config::ImportOptions;
pub use error::{CacheError, ImportError};
pub use processor::{PartialImport, resolve_tree};
pub use resolve::Resolution;
