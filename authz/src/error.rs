use saferun_execrisk::SecurityViolation;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Invalid operator configuration (e.g. an unparseable risk level).
    #[error(transparent)]
    Risk(#[from] saferun_execrisk::Error),

    /// A security-sensitive path failed trust validation.
    #[error(transparent)]
    PathTrust(#[from] saferun_pathtrust::Error),

    /// The command was denied by policy.
    #[error(transparent)]
    Violation(#[from] Box<SecurityViolation>),
}

impl Error {
    /// The structured violation, when the denial was a policy decision.
    pub fn violation(&self) -> Option<&SecurityViolation> {
        match self {
            Error::Violation(violation) => Some(violation),
            _ => None,
        }
    }
}
