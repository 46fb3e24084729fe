pub mod options;

pub use options::{CONFIG_FILE_NAME, ImportOptions};
