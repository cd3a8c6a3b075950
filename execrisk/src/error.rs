use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum Error {
    /// The configured risk level string is not one of the accepted values.
    /// The value is operator-authored configuration, not attacker-controlled
    /// input, so including it is safe and helps fix the config.
    #[error("invalid risk level: {0:?}")]
    InvalidRiskLevel(String),

    /// "critical" is produced internally for privilege-escalation detection
    /// and can never be requested from configuration.
    #[error("risk level \"critical\" is reserved for internal use and cannot be set in configuration")]
    CriticalRiskNotConfigurable,
}
