//! Filesystem trust validation for security-sensitive paths.
//!
//! Before the runner trusts a file (hash store, config, verified binary), every
//! directory component from the root down to the target must be proven
//! untamperable: owned by the trusted identity, never world-writable, never a
//! symlink. Checking only the leaf is not enough — an attacker-writable
//! intermediate directory can be used to relocate or replace a secured leaf,
//! and resolving symlinks instead of rejecting them reopens the TOCTOU window
//! this validator exists to close.
//!
//! The filesystem is an injected capability ([`Filesystem`]) so ownership and
//! permission scenarios can be constructed deterministically in tests without
//! root privileges; production code uses [`RealFilesystem`].

mod error;
mod fs;
pub mod testing;
mod validator;

pub use error::Error;
pub use error::Result;
pub use fs::FileKind;
pub use fs::FileMeta;
pub use fs::Filesystem;
pub use fs::RealFilesystem;
pub use validator::PathTrustValidator;
pub use validator::PathValidationConfig;
