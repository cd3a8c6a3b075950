//! Authorization gate for the privileged command runner.
//!
//! Combines the three independent verdicts — filesystem trust for
//! security-sensitive paths, the per-group environment allowlist, and the
//! command risk classification — with boolean AND: any denial blocks
//! dispatch. Denials are surfaced as structured values for the audit trail;
//! the gate never retries and never silently downgrades one.

mod error;
mod evaluator;
mod gate;

pub use error::Error;
pub use error::Result;
pub use evaluator::Authorization;
pub use evaluator::CommandRequest;
pub use evaluator::evaluate_command_execution;
pub use gate::AuthorizationRequest;
pub use gate::Gate;
