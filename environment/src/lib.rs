//! Per-group environment variable allowlist resolution.
//!
//! A command group forwards an environment variable to its child processes
//! only when the group's *effective* allowlist contains it. The effective
//! allowlist is derived from the shape of the group's configured list:
//! absent means inherit the global allowlist, explicitly empty means reject
//! everything, non-empty means use exactly that list. The shape distinction
//! lives in [`determine_inheritance_mode`], the single source of truth —
//! losing the absent-vs-empty distinction at an API boundary has been the
//! primary historical source of allowlist bugs.

mod allowlist;
mod inheritance;

pub use allowlist::AllowlistResolution;
pub use allowlist::AllowlistResolutionBuilder;
pub use inheritance::InheritanceMode;
pub use inheritance::ParseInheritanceModeError;
pub use inheritance::determine_inheritance_mode;
