use saferun_execrisk::RiskLevel;
use saferun_execrisk::SecurityViolation;
use saferun_execrisk::classify_command;
use saferun_execrisk::max_risk_level;
use uuid::Uuid;

use crate::error::Error;
use crate::error::Result;

/// One command execution to be authorized.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommandRequest {
    /// Configured command name, for audit correlation.
    pub name: String,
    /// Resolved absolute path of the executable.
    pub command_path: String,
    pub args: Vec<String>,
    /// Whether the configuration explicitly allows privileged execution.
    pub privileged: bool,
    /// Configured risk ceiling; `None` means the privileged-derived
    /// default applies.
    pub max_risk_level: Option<String>,
    /// Caller-supplied run identifier; generated when absent.
    pub run_id: Option<String>,
}

/// A granted authorization: the run identifier and the risk the command was
/// admitted at.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Authorization {
    pub run_id: String,
    pub risk: RiskLevel,
}

/// Decides whether one command may execute.
///
/// Order matters and mirrors the enforcement hierarchy: privilege
/// escalation without the `privileged` flag is denied first; escalation
/// with the flag is admitted (the flag is the operator's explicit consent);
/// only then is the detected risk compared against the ceiling.
pub fn evaluate_command_execution(request: &CommandRequest) -> Result<Authorization> {
    let ceiling = max_risk_level(request.max_risk_level.as_deref(), request.privileged)?;
    let assessment = classify_command(&request.command_path, &request.args);
    let run_id = request
        .run_id
        .clone()
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    if let Some(escalation) = &assessment.escalation {
        if !request.privileged {
            tracing::warn!(
                command = %request.name,
                risk = %assessment.level,
                pattern = %assessment.detected_pattern,
                escalation_type = %escalation.escalation_type,
                "privilege escalation denied"
            );
            return Err(Error::Violation(Box::new(SecurityViolation {
                command: request.name.clone(),
                detected_risk: assessment.level,
                detected_pattern: assessment.detected_pattern.clone(),
                required_setting: "privileged = true".to_string(),
                command_path: request.command_path.clone(),
                run_id,
                privilege_info: Some(escalation.clone()),
            })));
        }

        tracing::info!(
            command = %request.name,
            escalation_type = %escalation.escalation_type,
            risk = %assessment.level,
            "privilege escalation allowed by privileged flag"
        );
        return Ok(Authorization {
            run_id,
            risk: assessment.level,
        });
    }

    if assessment.level > ceiling {
        tracing::warn!(
            command = %request.name,
            risk = %assessment.level,
            ceiling = %ceiling,
            pattern = %assessment.detected_pattern,
            reason = assessment.reason,
            "risk ceiling exceeded"
        );
        return Err(Error::Violation(Box::new(SecurityViolation {
            command: request.name.clone(),
            detected_risk: assessment.level,
            detected_pattern: assessment.detected_pattern.clone(),
            required_setting: required_setting(assessment.level),
            command_path: request.command_path.clone(),
            run_id,
            privilege_info: None,
        })));
    }

    tracing::debug!(
        command = %request.name,
        risk = %assessment.level,
        ceiling = %ceiling,
        privileged = request.privileged,
        "command execution allowed"
    );
    Ok(Authorization {
        run_id,
        risk: assessment.level,
    })
}

/// Human-readable setting that would admit the command. `Critical` is not
/// configurable, so it never gets a `max_risk_level` suggestion.
fn required_setting(detected: RiskLevel) -> String {
    if detected == RiskLevel::Critical {
        "privileged = true".to_string()
    } else {
        format!("max_risk_level = \"{detected}\"")
    }
}
