//! Filesystem side of GET and PUT.
//!
//! Request paths are resolved against a root directory. Resolution is purely
//! lexical: `.` and `..` are folded without touching the disk, and anything
//! that would land outside the root is refused.

use std::fs::{self, File};
use std::io;
use std::path::{Component, Path, PathBuf};

use tracing::debug;

#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Maps a request path (leading `/` already stripped) to a location under
    /// the root. Returns `None` if the path escapes the root.
    pub fn resolve(&self, request_path: &str) -> Option<PathBuf> {
        let mut relative = PathBuf::new();

        for comp in Path::new(request_path).components() {
            match comp {
                Component::Normal(part) => relative.push(part),
                Component::CurDir => {}
                Component::ParentDir => {
                    if !relative.pop() {
                        return None;
                    }
                }
                Component::RootDir | Component::Prefix(_) => return None,
            }
        }

        if relative.as_os_str().is_empty() {
            return None;
        }

        Some(self.root.join(relative))
    }

    /// Opens a regular file for streaming.
    ///
    /// `Ok(None)` means there is nothing to serve: the path is outside the
    /// root, missing, or not a regular file.
    pub fn open(&self, request_path: &str) -> io::Result<Option<File>> {
        let Some(path) = self.resolve(request_path) else {
            return Ok(None);
        };

        let metadata = match fs::metadata(&path) {
            Ok(m) => m,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };

        if !metadata.is_file() {
            return Ok(None);
        }

        debug!(path = %path.display(), size = metadata.len(), "Opening file");
        File::open(&path).map(Some)
    }

    /// Creates or truncates the file at `request_path` and writes `body`.
    pub fn persist(&self, request_path: &str, body: &[u8]) -> io::Result<PathBuf> {
        let path = self.resolve(request_path).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("path escapes root directory: {request_path}"),
            )
        })?;

        fs::write(&path, body)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_folds_dot_segments() {
        let store = FileStore::new("/srv");
        assert_eq!(
            store.resolve("a/./b/../c.txt"),
            Some(PathBuf::from("/srv/a/c.txt"))
        );
    }

    #[test]
    fn resolve_refuses_escape() {
        let store = FileStore::new("/srv");
        assert_eq!(store.resolve("../etc/passwd"), None);
        assert_eq!(store.resolve("a/../../b"), None);
        assert_eq!(store.resolve("/etc/passwd"), None);
        assert_eq!(store.resolve("."), None);
    }

    #[test]
    fn open_missing_file_is_none() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::new(tmp.path());
        assert!(store.open("nope.txt").unwrap().is_none());
    }

    #[test]
    fn open_directory_is_none() {
        let tmp = tempfile::tempdir().unwrap();
        fs::create_dir(tmp.path().join("dir")).unwrap();
        let store = FileStore::new(tmp.path());
        assert!(store.open("dir").unwrap().is_none());
    }

    #[test]
    fn persist_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let store = FileStore::new(tmp.path());

        store.persist("out.bin", b"first version").unwrap();
        let path = store.persist("out.bin", b"second").unwrap();

        assert_eq!(fs::read(path).unwrap(), b"second");
    }
}
