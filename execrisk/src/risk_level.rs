use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::de::Error as SerdeError;

use crate::error::Error;
use crate::error::Result;

/// Ordered classification of how dangerous a command is judged to be.
///
/// The derive order is the threshold order: `Unknown < Low < Medium < High <
/// Critical`. `Critical` is reserved for internal detection results and can
/// never be requested from configuration.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum RiskLevel {
    Unknown,
    Low,
    Medium,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        parse_risk_level(s)
    }
}

impl Serialize for RiskLevel {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RiskLevel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse_risk_level(&raw).map_err(SerdeError::custom)
    }
}

/// Parses an operator-configured risk level.
///
/// The empty string means "unspecified, assume moderate caution" and maps to
/// [`RiskLevel::Low`]. `"critical"` is rejected with a dedicated error; any
/// other unrecognized value is a parse error carrying the offending text.
pub fn parse_risk_level(s: &str) -> Result<RiskLevel> {
    match s {
        "" => Ok(RiskLevel::Low),
        "unknown" => Ok(RiskLevel::Unknown),
        "low" => Ok(RiskLevel::Low),
        "medium" => Ok(RiskLevel::Medium),
        "high" => Ok(RiskLevel::High),
        "critical" => Err(Error::CriticalRiskNotConfigurable),
        other => Err(Error::InvalidRiskLevel(other.to_string())),
    }
}

/// The ceiling applied when a command configures no explicit risk level:
/// privileged commands default to `High`, everything else to `Medium`.
pub fn default_max_risk_level(privileged: bool) -> RiskLevel {
    if privileged {
        RiskLevel::High
    } else {
        RiskLevel::Medium
    }
}

/// Resolves a command's maximum allowed risk level. An explicit configured
/// value always overrides the privileged-derived default.
pub fn max_risk_level(configured: Option<&str>, privileged: bool) -> Result<RiskLevel> {
    match configured {
        None => Ok(default_max_risk_level(privileged)),
        Some(value) => parse_risk_level(value),
    }
}
