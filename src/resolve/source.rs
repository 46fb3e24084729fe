use std::fs;
use std::io;
use std::path::Path;

use crate::cache::FileMetadata;

/// Read access to stylesheet sources.
///
/// The importer never touches the filesystem except through this trait.
pub trait SourceLoader {
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    fn is_file(&self, path: &Path) -> bool;

    /// Current fingerprint, or `None` if no regular file is there
    fn fingerprint(&self, path: &Path) -> Option<FileMetadata>;
}

/// `SourceLoader` backed by `std::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLoader;

impl SourceLoader for FsLoader {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn fingerprint(&self, path: &Path) -> Option<FileMetadata> {
        fs::metadata(path)
            .ok()
            .filter(|meta| meta.is_file())
            .map(|meta| FileMetadata::from_fs(&meta))
    }
}

impl<L: SourceLoader + ?Sized> SourceLoader for &L {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        (**self).read_to_string(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        (**self).is_file(path)
    }

    fn fingerprint(&self, path: &Path) -> Option<FileMetadata> {
        (**self).fingerprint(path)
    }
}
