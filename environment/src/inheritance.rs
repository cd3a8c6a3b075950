use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::de::Error as SerdeError;
use thiserror::Error;

/// How a group's effective environment allowlist is derived. Immutable once
/// computed from the configured shape.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum InheritanceMode {
    /// The group inherits the global allowlist (field absent in config).
    Inherit,
    /// The group uses its own explicit allowlist (non-empty list in config).
    Explicit,
    /// The group rejects all environment variables (explicit empty list).
    Reject,
}

impl InheritanceMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inherit => "inherit",
            Self::Explicit => "explicit",
            Self::Reject => "reject",
        }
    }
}

impl fmt::Display for InheritanceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse failure for a textual inheritance mode.
///
/// Deliberately carries no copy of the offending input: inheritance-mode
/// text can originate close to untrusted input paths, and echoing it would
/// let an attacker forge log lines through the error message.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("invalid inheritance mode")]
pub struct ParseInheritanceModeError;

impl FromStr for InheritanceMode {
    type Err = ParseInheritanceModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "inherit" => Ok(Self::Inherit),
            "explicit" => Ok(Self::Explicit),
            "reject" => Ok(Self::Reject),
            _ => Err(ParseInheritanceModeError),
        }
    }
}

impl Serialize for InheritanceMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for InheritanceMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Hand-written rather than derived: the derive's "unknown variant"
        // error would echo the raw value into the message.
        let raw = String::deserialize(deserializer)?;
        raw.parse()
            .map_err(|_| D::Error::custom("invalid inheritance mode"))
    }
}

/// Maps the three possible config-level shapes of a group allowlist to the
/// three inheritance modes:
///
/// - field absent (`None`) → [`InheritanceMode::Inherit`]
/// - present but empty → [`InheritanceMode::Reject`]
/// - present and non-empty → [`InheritanceMode::Explicit`]
///
/// Every place that needs an inheritance mode must go through this
/// function.
pub fn determine_inheritance_mode(group_allowlist: Option<&[String]>) -> InheritanceMode {
    match group_allowlist {
        None => InheritanceMode::Inherit,
        Some([]) => InheritanceMode::Reject,
        Some(_) => InheritanceMode::Explicit,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn mode_determination_is_total_over_the_three_shapes() {
        let empty: Vec<String> = Vec::new();
        let single = vec!["PATH".to_string()];
        let several = vec!["PATH".to_string(), "HOME".to_string()];

        assert_eq!(determine_inheritance_mode(None), InheritanceMode::Inherit);
        assert_eq!(
            determine_inheritance_mode(Some(empty.as_slice())),
            InheritanceMode::Reject
        );
        assert_eq!(
            determine_inheritance_mode(Some(single.as_slice())),
            InheritanceMode::Explicit
        );
        assert_eq!(
            determine_inheritance_mode(Some(several.as_slice())),
            InheritanceMode::Explicit
        );
    }

    #[test]
    fn display_and_parse_round_trip() {
        for mode in [
            InheritanceMode::Inherit,
            InheritanceMode::Explicit,
            InheritanceMode::Reject,
        ] {
            assert_eq!(mode.to_string().parse::<InheritanceMode>(), Ok(mode));
        }
    }

    #[test]
    fn parse_rejects_unknown_values() {
        assert_eq!(
            "everything".parse::<InheritanceMode>(),
            Err(ParseInheritanceModeError)
        );
        assert_eq!("".parse::<InheritanceMode>(), Err(ParseInheritanceModeError));
        assert_eq!(
            "Inherit".parse::<InheritanceMode>(),
            Err(ParseInheritanceModeError)
        );
    }

    #[test]
    fn serde_round_trip() {
        let json = serde_json::to_string(&InheritanceMode::Reject).unwrap();
        assert_eq!(json, "\"reject\"");
        let back: InheritanceMode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, InheritanceMode::Reject);
    }

    #[test]
    fn decode_error_never_echoes_raw_input() {
        for raw in [
            "bogus-mode",
            "inherit\nFORGED LOG LINE",
            "reject\u{1b}[31m",
            "\0\0",
        ] {
            let json = serde_json::to_string(raw).unwrap();
            let err = serde_json::from_str::<InheritanceMode>(&json).unwrap_err();
            let message = err.to_string();
            let printable: String = raw.chars().filter(|c| !c.is_control()).collect();
            if !printable.is_empty() {
                assert!(
                    !message.contains(&printable),
                    "decode error leaked raw input: {message}"
                );
            }
        }
    }
}
