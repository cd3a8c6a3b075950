use std::fmt;

use serde::Serialize;

use crate::risk_level::RiskLevel;

/// Structured metadata describing that a command attempts to gain elevated
/// privileges. Attached to a [`SecurityViolation`] and never mutated.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct PrivilegeEscalationInfo {
    pub is_escalation: bool,
    pub escalation_type: String,
    pub required_privileges: Vec<String>,
    pub detected_pattern: String,
}

/// One denied command, constructed once per denial.
///
/// The rendered message is built from the structured fields only — never by
/// interpolating unvalidated external strings — so the audit trail cannot be
/// forged through a crafted command or pattern.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SecurityViolation {
    pub command: String,
    pub detected_risk: RiskLevel,
    pub detected_pattern: String,
    /// What configuration change would allow this command.
    pub required_setting: String,
    pub command_path: String,
    /// Correlates the denial with the audit trail of one run.
    pub run_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub privilege_info: Option<PrivilegeEscalationInfo>,
}

impl fmt::Display for SecurityViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "security violation: command '{}' detected as {} risk",
            self.command, self.detected_risk
        )?;

        match &self.privilege_info {
            Some(info) if info.is_escalation => {
                write!(f, " with privilege escalation ({})", info.escalation_type)?;
                write!(f, ". Pattern: {}", self.detected_pattern)?;
                // Repeating an identical pattern is noise; only distinct
                // escalation patterns get their own clause.
                if info.detected_pattern != self.detected_pattern {
                    write!(f, ". Escalation pattern: {}", info.detected_pattern)?;
                }
            }
            _ => {
                write!(f, ". Pattern: {}", self.detected_pattern)?;
            }
        }

        write!(f, ". Required setting: {}", self.required_setting)
    }
}

impl std::error::Error for SecurityViolation {}

impl SecurityViolation {
    /// JSON form for the audit sink: the structured fields plus the
    /// rendered message.
    pub fn to_audit_json(&self) -> serde_json::Value {
        let mut value = match serde_json::to_value(self) {
            Ok(value) => value,
            Err(_) => serde_json::Value::Null,
        };
        if let serde_json::Value::Object(map) = &mut value {
            map.insert(
                "type".to_string(),
                serde_json::Value::String("SecurityViolation".to_string()),
            );
            map.insert(
                "message".to_string(),
                serde_json::Value::String(self.to_string()),
            );
        }
        value
    }
}
