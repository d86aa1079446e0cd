//! Optional observability helpers for token, credential, and rate-limit operations.
//!
//! # Feature Flags
//!
//! - Enable `tracing` (on by default) to emit spans named `tokengate.op` with the `op` and
//!   `stage` fields, plus structured events for rejected tokens, throttled clients, and request
//!   timings.
//! - Enable `metrics` to increment the `tokengate_op_total` counter for every
//!   attempt/success/failure, labeled by `op` + `outcome`.

mod metrics;
mod tracing;

pub use metrics::*;
pub use tracing::*;

// self
use crate::_prelude::*;

/// Operations observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AuthOp {
	/// Token signing.
	Issue,
	/// Token verification.
	Verify,
	/// User registration.
	Register,
	/// Username/password login.
	Login,
	/// Refresh-token exchange.
	Refresh,
	/// API-key lookup.
	ApiKey,
	/// Rate-limit evaluation.
	RateLimit,
}
impl AuthOp {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			AuthOp::Issue => "issue",
			AuthOp::Verify => "verify",
			AuthOp::Register => "register",
			AuthOp::Login => "login",
			AuthOp::Refresh => "refresh",
			AuthOp::ApiKey => "api_key",
			AuthOp::RateLimit => "rate_limit",
		}
	}
}
impl Display for AuthOp {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpOutcome {
	/// Entry to an operation.
	Attempt,
	/// Successful completion (for rate limiting: the request was admitted).
	Success,
	/// Failure or rejection reported back to the caller.
	Failure,
}
impl OpOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OpOutcome::Attempt => "attempt",
			OpOutcome::Success => "success",
			OpOutcome::Failure => "failure",
		}
	}
}
impl Display for OpOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
