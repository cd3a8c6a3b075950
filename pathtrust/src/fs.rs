use std::io;
use std::path::Path;

/// What kind of entry a path component is, as reported by a non-following
/// stat.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FileKind {
    Directory,
    File,
    Symlink,
    Other,
}

/// The subset of stat output the validator needs.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FileMeta {
    pub kind: FileKind,
    /// Permission bits only (`st_mode & 0o7777`).
    pub mode: u32,
    pub uid: u32,
    pub gid: u32,
}

impl FileMeta {
    pub fn is_world_writable(&self) -> bool {
        self.mode & 0o002 != 0
    }

    pub fn is_group_writable(&self) -> bool {
        self.mode & 0o020 != 0
    }
}

/// Read-only filesystem capability used by the validator. Implementations
/// must not follow symlinks: a symlink component has to be reported as
/// [`FileKind::Symlink`], never as its target.
pub trait Filesystem {
    fn symlink_metadata(&self, path: &Path) -> io::Result<FileMeta>;
}

/// [`Filesystem`] backed by the real OS.
#[derive(Clone, Copy, Debug, Default)]
pub struct RealFilesystem;

#[cfg(unix)]
impl Filesystem for RealFilesystem {
    fn symlink_metadata(&self, path: &Path) -> io::Result<FileMeta> {
        use std::os::unix::fs::MetadataExt;

        let metadata = std::fs::symlink_metadata(path)?;
        let file_type = metadata.file_type();
        let kind = if file_type.is_symlink() {
            FileKind::Symlink
        } else if file_type.is_dir() {
            FileKind::Directory
        } else if file_type.is_file() {
            FileKind::File
        } else {
            FileKind::Other
        };
        Ok(FileMeta {
            kind,
            mode: metadata.mode() & 0o7777,
            uid: metadata.uid(),
            gid: metadata.gid(),
        })
    }
}
