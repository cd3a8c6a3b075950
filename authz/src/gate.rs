use std::path::PathBuf;

use saferun_environment::AllowlistResolution;
use saferun_pathtrust::Filesystem;
use saferun_pathtrust::PathTrustValidator;
use saferun_pathtrust::PathValidationConfig;
use saferun_pathtrust::RealFilesystem;

use crate::error::Result;
use crate::evaluator::Authorization;
use crate::evaluator::CommandRequest;
use crate::evaluator::evaluate_command_execution;

/// Everything the gate needs to decide one execution.
pub struct AuthorizationRequest<'a> {
    pub command: CommandRequest,
    /// Paths whose contents influence this run (config files, the
    /// executable's directory). Each full ancestor chain must be trusted.
    pub sensitive_paths: Vec<PathBuf>,
    pub allowlist: &'a AllowlistResolution,
}

/// The authorization gate: path trust, allowlist snapshot, and risk
/// evaluation in that order, all of which must pass.
pub struct Gate<F = RealFilesystem> {
    validator: PathTrustValidator<F>,
}

impl Gate<RealFilesystem> {
    pub fn new(config: PathValidationConfig) -> Self {
        Self {
            validator: PathTrustValidator::new(config),
        }
    }
}

impl<F: Filesystem> Gate<F> {
    pub fn with_filesystem(fs: F, config: PathValidationConfig) -> Self {
        Self {
            validator: PathTrustValidator::with_filesystem(fs, config),
        }
    }

    /// Runs every check and returns the authorization, or the first denial.
    ///
    /// Path trust runs first: a writable ancestor taints everything read
    /// from under it, including the command definition itself, so no risk
    /// verdict based on that definition can be trusted.
    pub fn authorize(&self, request: &AuthorizationRequest<'_>) -> Result<Authorization> {
        for path in &request.sensitive_paths {
            self.validator.validate_directory_permissions(path)?;
        }

        tracing::debug!(
            command = %request.command.name,
            allowlist_mode = %request.allowlist.mode(),
            env_allowlist = ?request.allowlist.effective_list(),
            "environment allowlist resolved"
        );

        evaluate_command_execution(&request.command)
    }
}
