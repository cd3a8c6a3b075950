//! Command risk classification and privilege-escalation detection.
//!
//! Maps a command (path plus arguments) to an ordered [`RiskLevel`] and, for
//! privilege-escalation commands (`sudo`, `su`, `doas`), attaches structured
//! [`PrivilegeEscalationInfo`]. When a command's risk exceeds the configured
//! ceiling, the gate builds a [`SecurityViolation`]: an audit-ready value
//! object rendered purely from structured fields so attacker-influenced
//! strings cannot forge log lines.
//!
//! Everything here is a pure function over strings; filesystem-dependent
//! defenses (symlinked binaries, tampered paths) belong to the trust
//! validator.

mod classifier;
mod error;
mod profiles;
mod risk_level;
mod violation;

pub use classifier::RiskAssessment;
pub use classifier::classify_command;
pub use classifier::classify_command_line;
pub use error::Error;
pub use error::Result;
pub use risk_level::RiskLevel;
pub use risk_level::default_max_risk_level;
pub use risk_level::max_risk_level;
pub use risk_level::parse_risk_level;
pub use violation::PrivilegeEscalationInfo;
pub use violation::SecurityViolation;
