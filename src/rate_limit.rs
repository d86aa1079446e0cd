//! Rate limit policy contracts consulted before a request reaches its handler.

pub mod window;

pub use window::*;

// self
use crate::{_prelude::*, auth::ClientKey};

/// Strategy that decides whether a client's next request may proceed.
pub trait RateLimitPolicy
where
	Self: Send + Sync,
{
	/// Records the request described by `context` and decides whether it may proceed.
	fn evaluate(&self, context: &RateLimitContext) -> RateLimitDecision;
}
impl<P> RateLimitPolicy for Arc<P>
where
	P: ?Sized + RateLimitPolicy,
{
	fn evaluate(&self, context: &RateLimitContext) -> RateLimitDecision {
		(**self).evaluate(context)
	}
}

/// Context shared with a [`RateLimitPolicy`] for one inbound request.
#[derive(Clone, Debug)]
pub struct RateLimitContext {
	/// Identity the request is counted against.
	pub client: ClientKey,
	/// Timestamp observed before invoking the policy.
	pub observed_at: OffsetDateTime,
}
impl RateLimitContext {
	/// Creates a context for `client` stamped with the current clock.
	pub fn new(client: ClientKey) -> Self {
		Self { client, observed_at: OffsetDateTime::now_utc() }
	}

	/// Overrides the timestamp associated with the observation.
	pub fn with_observed_at(mut self, instant: OffsetDateTime) -> Self {
		self.observed_at = instant;

		self
	}
}

/// Result emitted by a [`RateLimitPolicy`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RateLimitDecision {
	/// The request may proceed immediately.
	Allow,
	/// The request is rejected; retry later.
	Delay(RetryDirective),
}
impl RateLimitDecision {
	/// Returns `true` for [`RateLimitDecision::Allow`].
	pub fn is_allowed(&self) -> bool {
		matches!(self, RateLimitDecision::Allow)
	}
}

/// Advises callers when to retry after a [`RateLimitDecision::Delay`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryDirective {
	/// Instant from which a new request would be admitted.
	pub earliest_retry_at: OffsetDateTime,
	/// Suggested backoff duration relative to the rejected request.
	pub recommended_backoff: Duration,
	/// Optional descriptive string.
	pub reason: Option<String>,
}
impl RetryDirective {
	/// Creates a new directive with the provided timing metadata.
	pub fn new(earliest_retry_at: OffsetDateTime, recommended_backoff: Duration) -> Self {
		Self { earliest_retry_at, recommended_backoff, reason: None }
	}

	/// Adds a human-readable reason.
	pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
		self.reason = Some(reason.into());

		self
	}

	/// Backoff rounded up to whole seconds (at least one), as sent in `Retry-After`.
	pub fn retry_after_secs(&self) -> i64 {
		let secs = self.recommended_backoff.whole_seconds();
		let secs = if self.recommended_backoff > Duration::seconds(secs) { secs + 1 } else { secs };

		secs.max(1)
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn retry_after_rounds_up_to_a_second() {
		let at = macros::datetime!(2025-01-01 00:00 UTC);

		assert_eq!(RetryDirective::new(at, Duration::milliseconds(200)).retry_after_secs(), 1);
		assert_eq!(RetryDirective::new(at, Duration::milliseconds(1_200)).retry_after_secs(), 2);
		assert_eq!(RetryDirective::new(at, Duration::seconds(3)).retry_after_secs(), 3);
		assert_eq!(RetryDirective::new(at, Duration::ZERO).retry_after_secs(), 1);
	}

	#[test]
	fn context_observation_can_be_pinned() {
		let at = macros::datetime!(2025-01-01 00:00 UTC);
		let context = RateLimitContext::new(ClientKey::unknown()).with_observed_at(at);

		assert_eq!(context.observed_at, at);
		assert!(RateLimitDecision::Allow.is_allowed());
	}
}
