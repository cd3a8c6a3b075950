//! Deterministic in-memory filesystem for permission and ownership
//! scenarios that would otherwise require root privileges or real symlinks
//! on disk.

use std::collections::BTreeMap;
use std::io;
use std::path::Path;
use std::path::PathBuf;

use crate::fs::FileKind;
use crate::fs::FileMeta;
use crate::fs::Filesystem;

/// In-memory [`Filesystem`]. Paths that were never inserted stat as
/// `NotFound`.
#[derive(Clone, Debug, Default)]
pub struct FakeFilesystem {
    entries: BTreeMap<PathBuf, FileMeta>,
}

impl FakeFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_dir(&mut self, path: impl Into<PathBuf>, mode: u32, uid: u32, gid: u32) {
        self.entries.insert(
            path.into(),
            FileMeta {
                kind: FileKind::Directory,
                mode,
                uid,
                gid,
            },
        );
    }

    pub fn insert_file(&mut self, path: impl Into<PathBuf>, mode: u32, uid: u32, gid: u32) {
        self.entries.insert(
            path.into(),
            FileMeta {
                kind: FileKind::File,
                mode,
                uid,
                gid,
            },
        );
    }

    pub fn insert_symlink(&mut self, path: impl Into<PathBuf>, uid: u32, gid: u32) {
        self.entries.insert(
            path.into(),
            FileMeta {
                kind: FileKind::Symlink,
                mode: 0o777,
                uid,
                gid,
            },
        );
    }

    /// Inserts `path` and every ancestor up to `/` as a directory with the
    /// given mode and ownership.
    pub fn insert_dir_chain(&mut self, path: impl AsRef<Path>, mode: u32, uid: u32, gid: u32) {
        for ancestor in path.as_ref().ancestors() {
            self.insert_dir(ancestor, mode, uid, gid);
        }
    }
}

impl Filesystem for FakeFilesystem {
    fn symlink_metadata(&self, path: &Path) -> io::Result<FileMeta> {
        self.entries.get(path).copied().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("{} not found", path.display()))
        })
    }
}
