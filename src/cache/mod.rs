pub mod loader;
pub mod metadata;
pub mod schema;
pub mod store;
pub mod writer;

pub use loader::CacheLoader;
pub use metadata::{FileMetadata, MANIFEST_FILE_NAME};
pub use schema::{CachedImport, SourceStamp};
pub use store::CacheStore;
pub use writer::CacheWriter;
