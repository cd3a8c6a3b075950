use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Structural problems with the input path itself: empty, relative, or
    /// longer than the configured maximum. No filesystem access happens
    /// before this check.
    #[error("invalid path: {reason}")]
    InvalidPath { reason: String },

    /// A component of the ancestor chain is a symlink or not a directory.
    /// Symlinks are rejected unconditionally, including as the terminal
    /// component; resolving one would reintroduce a check-to-use race.
    #[error("insecure path component {path}: {reason}")]
    InsecurePathComponent { path: PathBuf, reason: String },

    /// A component of the ancestor chain violates the ownership or mode
    /// policy (world-writable, group-writable outside the trusted identity,
    /// or owned by an untrusted user).
    #[error("invalid directory permissions: {path}: {reason}")]
    InvalidDirPermissions { path: PathBuf, reason: String },

    /// The target file violates the mode policy or is not a regular file.
    #[error("invalid file permissions: {path}: {reason}")]
    InvalidFilePermissions { path: PathBuf, reason: String },

    /// stat failed for a component. The source is preserved so callers can
    /// distinguish "missing" from "insecure".
    #[error("failed to stat {path}")]
    Stat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// True when the failure is a plain not-found for some component, as
    /// opposed to a policy violation.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Stat { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}
