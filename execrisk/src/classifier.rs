use std::path::Path;

use crate::profiles;
use crate::risk_level::RiskLevel;
use crate::violation::PrivilegeEscalationInfo;

/// Result of classifying one command: the detected level, the pattern that
/// produced it, and escalation metadata when the command is a
/// privilege-escalation command.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    /// The pattern that triggered the classification; empty when the
    /// command fell through to the default level.
    pub detected_pattern: String,
    pub reason: &'static str,
    pub escalation: Option<PrivilegeEscalationInfo>,
}

impl RiskAssessment {
    fn low() -> Self {
        Self {
            level: RiskLevel::Low,
            detected_pattern: String::new(),
            reason: "no dangerous pattern detected",
            escalation: None,
        }
    }
}

/// Classifies a command by its path and arguments.
///
/// Checks run in severity order and the first match wins: privilege
/// escalation, destructive file operations, network operations, system
/// modification, then the `Low` default.
pub fn classify_command(command_path: &str, args: &[String]) -> RiskAssessment {
    let basename = Path::new(command_path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(command_path);

    if let Some(profile) = profiles::escalation_profile(basename) {
        return RiskAssessment {
            level: RiskLevel::Critical,
            detected_pattern: basename.to_string(),
            reason: "allows execution with elevated privileges",
            escalation: Some(PrivilegeEscalationInfo {
                is_escalation: true,
                escalation_type: profile.escalation_type.to_string(),
                required_privileges: profile
                    .required_privileges
                    .iter()
                    .map(ToString::to_string)
                    .collect(),
                detected_pattern: basename.to_string(),
            }),
        };
    }

    if profiles::is_destructive_command(basename) {
        return RiskAssessment {
            level: RiskLevel::High,
            detected_pattern: basename.to_string(),
            reason: "destructive file operation",
            escalation: None,
        };
    }
    if let Some(pattern) = profiles::has_destructive_arguments(basename, args) {
        return RiskAssessment {
            level: RiskLevel::High,
            detected_pattern: pattern.to_string(),
            reason: "destructive file operation",
            escalation: None,
        };
    }

    if profiles::is_always_network(basename) {
        return RiskAssessment {
            level: RiskLevel::Medium,
            detected_pattern: basename.to_string(),
            reason: "network operation",
            escalation: None,
        };
    }
    if basename == "git"
        && let Some(subcommand) = profiles::find_first_subcommand(args)
        && profiles::is_git_network_subcommand(subcommand)
    {
        return RiskAssessment {
            level: RiskLevel::Medium,
            detected_pattern: format!("git {subcommand}"),
            reason: "network operation",
            escalation: None,
        };
    }
    if profiles::has_network_arguments(args) {
        return RiskAssessment {
            level: RiskLevel::Medium,
            detected_pattern: basename.to_string(),
            reason: "network operation",
            escalation: None,
        };
    }

    if profiles::is_system_modification(basename, args) {
        return RiskAssessment {
            level: RiskLevel::Medium,
            detected_pattern: basename.to_string(),
            reason: "system modification",
            escalation: None,
        };
    }

    RiskAssessment::low()
}

/// Splits a raw command line with shell quoting rules and classifies it.
/// Returns `None` for an empty or unparsable line.
pub fn classify_command_line(line: &str) -> Option<RiskAssessment> {
    let tokens = shlex::split(line)?;
    let (command, args) = tokens.split_first()?;
    Some(classify_command(command, args))
}
