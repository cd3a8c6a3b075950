use std::path::Path;
use std::path::PathBuf;

use path_absolutize::Absolutize;

use crate::error::Error;
use crate::error::Result;
use crate::fs::FileKind;
use crate::fs::FileMeta;
use crate::fs::Filesystem;
use crate::fs::RealFilesystem;

/// Ownership and mode policy for trusted paths. Immutable once constructed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PathValidationConfig {
    /// The only uid allowed to own any component of a trusted path.
    pub trusted_uid: u32,
    /// The gid that, together with `trusted_uid` ownership, makes
    /// group-write acceptable.
    pub trusted_gid: u32,
    /// Maximum accepted length of a cleaned path, in bytes.
    pub max_path_length: usize,
    /// Maximum permission bits accepted on a validated regular file.
    pub max_file_mode: u32,
}

impl Default for PathValidationConfig {
    fn default() -> Self {
        Self {
            trusted_uid: 0,
            trusted_gid: 0,
            max_path_length: 4096,
            max_file_mode: 0o644,
        }
    }
}

/// Validates that the full ancestor chain of a path cannot have been
/// tampered with by an untrusted principal.
///
/// Stateless apart from the injected filesystem; safe to call concurrently
/// for independent paths.
#[derive(Clone, Debug)]
pub struct PathTrustValidator<F = RealFilesystem> {
    fs: F,
    config: PathValidationConfig,
}

impl PathTrustValidator<RealFilesystem> {
    pub fn new(config: PathValidationConfig) -> Self {
        Self::with_filesystem(RealFilesystem, config)
    }
}

impl<F: Filesystem> PathTrustValidator<F> {
    pub fn with_filesystem(fs: F, config: PathValidationConfig) -> Self {
        Self { fs, config }
    }

    /// Validates every directory component from `/` through the target
    /// itself, in order. The first failing component aborts the walk.
    pub fn validate_directory_permissions(&self, path: &Path) -> Result<()> {
        let clean = self.cleaned(path)?;
        tracing::debug!(path = %clean.display(), "validating directory trust chain");

        let mut chain: Vec<&Path> = clean.ancestors().collect();
        chain.reverse();
        for component in chain {
            let meta = self.stat(component)?;
            self.check_directory_component(component, &meta)?;
        }

        tracing::debug!(path = %clean.display(), "directory trust chain validated");
        Ok(())
    }

    /// Validates the target as a regular file: it must not be a symlink and
    /// its permission bits must not exceed the configured maximum.
    pub fn validate_file_permissions(&self, path: &Path) -> Result<()> {
        let clean = self.cleaned(path)?;
        let meta = self.stat(&clean)?;

        match meta.kind {
            FileKind::File => {}
            FileKind::Symlink => {
                return Err(Error::InsecurePathComponent {
                    path: clean,
                    reason: "file is a symlink".to_string(),
                });
            }
            FileKind::Directory | FileKind::Other => {
                return Err(Error::InvalidFilePermissions {
                    path: clean,
                    reason: "not a regular file".to_string(),
                });
            }
        }

        let disallowed = meta.mode & !self.config.max_file_mode;
        if disallowed != 0 {
            tracing::warn!(
                path = %clean.display(),
                mode = format_args!("{:04o}", meta.mode),
                disallowed = format_args!("{disallowed:04o}"),
                "insecure file permissions detected"
            );
            return Err(Error::InvalidFilePermissions {
                path: clean,
                reason: format!(
                    "mode {:04o} has disallowed bits {:04o}, maximum allowed is {:04o}",
                    meta.mode, disallowed, self.config.max_file_mode
                ),
            });
        }
        Ok(())
    }

    /// Rejects empty, relative, and over-long paths, then cleans the path
    /// lexically. No symlink resolution happens here.
    fn cleaned(&self, path: &Path) -> Result<PathBuf> {
        if path.as_os_str().is_empty() {
            return Err(Error::InvalidPath {
                reason: "empty path".to_string(),
            });
        }
        if !path.is_absolute() {
            return Err(Error::InvalidPath {
                reason: format!("path must be absolute, got relative path: {}", path.display()),
            });
        }
        let clean = path
            .absolutize()
            .map_err(|source| Error::Stat {
                path: path.to_path_buf(),
                source,
            })?
            .into_owned();
        if clean.as_os_str().len() > self.config.max_path_length {
            return Err(Error::InvalidPath {
                reason: format!(
                    "path too long ({} > {})",
                    clean.as_os_str().len(),
                    self.config.max_path_length
                ),
            });
        }
        Ok(clean)
    }

    fn stat(&self, path: &Path) -> Result<FileMeta> {
        self.fs.symlink_metadata(path).map_err(|source| Error::Stat {
            path: path.to_path_buf(),
            source,
        })
    }

    fn check_directory_component(&self, path: &Path, meta: &FileMeta) -> Result<()> {
        match meta.kind {
            FileKind::Directory => {}
            FileKind::Symlink => {
                return Err(Error::InsecurePathComponent {
                    path: path.to_path_buf(),
                    reason: "path component is a symlink".to_string(),
                });
            }
            FileKind::File | FileKind::Other => {
                return Err(Error::InsecurePathComponent {
                    path: path.to_path_buf(),
                    reason: "path component is not a directory".to_string(),
                });
            }
        }

        if meta.is_world_writable() {
            tracing::warn!(
                path = %path.display(),
                mode = format_args!("{:04o}", meta.mode),
                "directory writable by others detected"
            );
            return Err(Error::InvalidDirPermissions {
                path: path.to_path_buf(),
                reason: format!("writable by others ({:04o})", meta.mode),
            });
        }

        // Group-write collapses to "only trusted principals can write here"
        // only when both the owner and the group are the trusted identity.
        if meta.is_group_writable()
            && !(meta.uid == self.config.trusted_uid && meta.gid == self.config.trusted_gid)
        {
            tracing::warn!(
                path = %path.display(),
                mode = format_args!("{:04o}", meta.mode),
                uid = meta.uid,
                gid = meta.gid,
                "group-writable directory outside trusted ownership"
            );
            return Err(Error::InvalidDirPermissions {
                path: path.to_path_buf(),
                reason: format!(
                    "group writable ({:04o}) but not owned by trusted identity (uid={}, gid={})",
                    meta.mode, meta.uid, meta.gid
                ),
            });
        }

        // An attacker-owned ancestor can replace its descendants, so the
        // owner check applies at every level.
        if meta.uid != self.config.trusted_uid {
            tracing::warn!(
                path = %path.display(),
                uid = meta.uid,
                trusted_uid = self.config.trusted_uid,
                "directory owned by untrusted user"
            );
            return Err(Error::InvalidDirPermissions {
                path: path.to_path_buf(),
                reason: format!(
                    "owned by untrusted user (uid={}, trusted uid={})",
                    meta.uid, self.config.trusted_uid
                ),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::testing::FakeFilesystem;

    fn validator(fs: FakeFilesystem) -> PathTrustValidator<FakeFilesystem> {
        PathTrustValidator::with_filesystem(fs, PathValidationConfig::default())
    }

    fn trusted_chain() -> FakeFilesystem {
        let mut fs = FakeFilesystem::new();
        fs.insert_dir_chain("/usr/local/etc/app/hashes", 0o755, 0, 0);
        fs
    }

    #[test]
    fn relative_path_fails_without_filesystem_access() {
        let v = validator(FakeFilesystem::new());
        let err = v
            .validate_directory_permissions(Path::new("etc/app"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidPath { .. }), "{err:?}");
    }

    #[test]
    fn empty_path_fails() {
        let v = validator(FakeFilesystem::new());
        let err = v.validate_directory_permissions(Path::new("")).unwrap_err();
        assert!(matches!(err, Error::InvalidPath { .. }), "{err:?}");
    }

    #[test]
    fn over_long_path_fails() {
        let v = PathTrustValidator::with_filesystem(
            trusted_chain(),
            PathValidationConfig {
                max_path_length: 8,
                ..PathValidationConfig::default()
            },
        );
        let err = v
            .validate_directory_permissions(Path::new("/usr/local/etc"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidPath { .. }), "{err:?}");
    }

    #[test]
    fn fully_trusted_chain_passes() {
        let v = validator(trusted_chain());
        v.validate_directory_permissions(Path::new("/usr/local/etc/app/hashes"))
            .unwrap();
    }

    #[test]
    fn dot_components_are_cleaned_before_validation() {
        let v = validator(trusted_chain());
        v.validate_directory_permissions(Path::new("/usr/local/./etc/app/../app/hashes"))
            .unwrap();
    }

    #[test]
    fn world_writable_intermediate_fails() {
        let mut fs = trusted_chain();
        fs.insert_dir("/usr/local", 0o777, 0, 0);
        let err = validator(fs)
            .validate_directory_permissions(Path::new("/usr/local/etc/app/hashes"))
            .unwrap_err();
        match err {
            Error::InvalidDirPermissions { path, .. } => {
                assert_eq!(path, Path::new("/usr/local"));
            }
            other => panic!("expected InvalidDirPermissions, got {other:?}"),
        }
    }

    #[test]
    fn world_writable_root_fails_like_any_other_level() {
        let mut fs = trusted_chain();
        fs.insert_dir("/", 0o777, 0, 0);
        let err = validator(fs)
            .validate_directory_permissions(Path::new("/usr/local/etc/app/hashes"))
            .unwrap_err();
        match err {
            Error::InvalidDirPermissions { path, .. } => {
                assert_eq!(path, Path::new("/"));
            }
            other => panic!("expected InvalidDirPermissions, got {other:?}"),
        }
    }

    #[test]
    fn symlink_component_fails_anywhere_in_chain() {
        let mut fs = trusted_chain();
        fs.insert_symlink("/usr/local/etc", 0, 0);
        let err = validator(fs)
            .validate_directory_permissions(Path::new("/usr/local/etc/app/hashes"))
            .unwrap_err();
        assert!(matches!(err, Error::InsecurePathComponent { .. }), "{err:?}");
    }

    #[test]
    fn symlink_as_terminal_component_fails() {
        let mut fs = trusted_chain();
        fs.insert_symlink("/usr/local/etc/app/hashes", 0, 0);
        let err = validator(fs)
            .validate_directory_permissions(Path::new("/usr/local/etc/app/hashes"))
            .unwrap_err();
        assert!(matches!(err, Error::InsecurePathComponent { .. }), "{err:?}");
    }

    #[test]
    fn group_writable_trusted_identity_passes() {
        let mut fs = trusted_chain();
        fs.insert_dir("/usr/local", 0o775, 0, 0);
        validator(fs)
            .validate_directory_permissions(Path::new("/usr/local/etc/app/hashes"))
            .unwrap();
    }

    #[test]
    fn group_writable_untrusted_group_fails() {
        let mut fs = trusted_chain();
        fs.insert_dir("/usr/local", 0o775, 0, 50);
        let err = validator(fs)
            .validate_directory_permissions(Path::new("/usr/local/etc/app/hashes"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidDirPermissions { .. }), "{err:?}");
    }

    #[test]
    fn untrusted_owner_fails_even_without_write_bits() {
        let mut fs = trusted_chain();
        fs.insert_dir("/usr/local/etc", 0o555, 1000, 0);
        let err = validator(fs)
            .validate_directory_permissions(Path::new("/usr/local/etc/app/hashes"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidDirPermissions { .. }), "{err:?}");
    }

    #[test]
    fn missing_component_is_distinguishable_from_policy_violations() {
        let mut fs = FakeFilesystem::new();
        fs.insert_dir_chain("/usr/local", 0o755, 0, 0);
        let err = validator(fs)
            .validate_directory_permissions(Path::new("/usr/local/etc"))
            .unwrap_err();
        assert!(err.is_not_found(), "{err:?}");
    }

    #[test]
    fn first_failure_wins_walking_from_the_root() {
        // Both /usr (untrusted owner) and /usr/local (world-writable) are
        // bad; the root-first walk must report /usr.
        let mut fs = trusted_chain();
        fs.insert_dir("/usr", 0o755, 1000, 0);
        fs.insert_dir("/usr/local", 0o777, 0, 0);
        let err = validator(fs)
            .validate_directory_permissions(Path::new("/usr/local/etc"))
            .unwrap_err();
        match err {
            Error::InvalidDirPermissions { path, .. } => assert_eq!(path, Path::new("/usr")),
            other => panic!("expected InvalidDirPermissions, got {other:?}"),
        }
    }

    #[test]
    fn regular_file_within_mode_limit_passes() {
        let mut fs = trusted_chain();
        fs.insert_file("/usr/local/etc/app/hashes/manifest", 0o644, 0, 0);
        validator(fs)
            .validate_file_permissions(Path::new("/usr/local/etc/app/hashes/manifest"))
            .unwrap();
    }

    #[test]
    fn group_writable_file_fails() {
        let mut fs = trusted_chain();
        fs.insert_file("/usr/local/etc/app/hashes/manifest", 0o664, 0, 0);
        let err = validator(fs)
            .validate_file_permissions(Path::new("/usr/local/etc/app/hashes/manifest"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidFilePermissions { .. }), "{err:?}");
    }

    #[test]
    fn symlink_file_fails() {
        let mut fs = trusted_chain();
        fs.insert_symlink("/usr/local/etc/app/hashes/manifest", 0, 0);
        let err = validator(fs)
            .validate_file_permissions(Path::new("/usr/local/etc/app/hashes/manifest"))
            .unwrap_err();
        assert!(matches!(err, Error::InsecurePathComponent { .. }), "{err:?}");
    }

    #[test]
    fn directory_target_fails_file_validation() {
        let fs = trusted_chain();
        let err = validator(fs)
            .validate_file_permissions(Path::new("/usr/local/etc"))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidFilePermissions { .. }), "{err:?}");
    }

    #[cfg(unix)]
    #[test]
    fn real_filesystem_reports_kind_and_mode() {
        use std::os::unix::fs::MetadataExt;

        let dir = tempfile::tempdir().unwrap();
        let meta = RealFilesystem.symlink_metadata(dir.path()).unwrap();
        assert_eq!(meta.kind, FileKind::Directory);
        let expected = std::fs::symlink_metadata(dir.path()).unwrap();
        assert_eq!(meta.uid, expected.uid());
        assert_eq!(meta.mode, expected.mode() & 0o7777);
    }
}
