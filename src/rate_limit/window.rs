//! Per-client sliding-window counter with bounded, sharded state.
//!
//! Each client key maps to the arrival times of its recent requests. On every request the
//! limiter drops timestamps at or before `now - window`, appends `now`, and rejects the request
//! when more than `max_requests` timestamps remain. Rejected requests are recorded too, so a
//! client that keeps hammering stays throttled.
//!
//! Records live in independently locked shards selected by key hash. The shard count is clamped
//! to `capacity` and each shard holds at most `floor(capacity / shards)` keys, so the total never
//! exceeds `capacity`. Admitting a new key into a full shard first drops stale records (nothing
//! inside the window, equivalent to having no record) and then the least-recently-seen one.
//!
//! Instant arithmetic saturates at the edges of the representable date range, so a window of
//! any length is safe.

// self
use crate::{
	_prelude::*,
	auth::ClientKey,
	config::RateLimitConfig,
	obs::{self, AuthOp, OpOutcome},
	rate_limit::{RateLimitContext, RateLimitDecision, RateLimitPolicy, RetryDirective},
};

type Shard = Mutex<HashMap<ClientKey, ClientRecord>>;

#[derive(Debug, Default)]
struct ClientRecord {
	// Sorted ascending; trimmed to the newest `max_requests` entries, which is enough to
	// reproduce every future decision.
	timestamps: VecDeque<OffsetDateTime>,
}
impl ClientRecord {
	fn prune(&mut self, cutoff: OffsetDateTime) {
		while self.timestamps.front().is_some_and(|t| *t <= cutoff) {
			self.timestamps.pop_front();
		}
	}

	fn record(&mut self, now: OffsetDateTime) {
		let idx = self.timestamps.partition_point(|t| *t <= now);

		self.timestamps.insert(idx, now);
	}

	fn last_seen(&self) -> Option<OffsetDateTime> {
		self.timestamps.back().copied()
	}

	fn is_stale(&self, cutoff: OffsetDateTime) -> bool {
		self.last_seen().is_none_or(|t| t <= cutoff)
	}
}

/// In-process [`RateLimitPolicy`] counting requests per client inside a sliding window.
#[derive(Debug)]
pub struct SlidingWindowLimiter {
	window: Duration,
	max_requests: usize,
	shard_capacity: usize,
	shards: Box<[Shard]>,
}
impl SlidingWindowLimiter {
	/// Builds a limiter from a validated rate-limit configuration.
	pub fn new(config: &RateLimitConfig) -> Self {
		let capacity = config.capacity.max(1);
		let shard_count = config.shards.clamp(1, capacity);
		let shard_capacity = capacity / shard_count;
		let shards = (0..shard_count).map(|_| Shard::default()).collect();

		Self {
			window: config.window,
			max_requests: config.max_requests.max(1),
			shard_capacity,
			shards,
		}
	}

	/// Window length.
	pub fn window(&self) -> Duration {
		self.window
	}

	/// Requests admitted per client inside one window.
	pub fn max_requests(&self) -> usize {
		self.max_requests
	}

	/// Records a request from `client` at the current instant.
	pub fn check(&self, client: &ClientKey) -> RateLimitDecision {
		self.check_at(client, OffsetDateTime::now_utc())
	}

	/// Records a request from `client` at `now` and decides whether it may proceed.
	pub fn check_at(&self, client: &ClientKey, now: OffsetDateTime) -> RateLimitDecision {
		let cutoff = now.saturating_sub(self.window);
		let mut shard = self.shard(client).lock();

		if !shard.contains_key(client) {
			Self::make_room(&mut shard, self.shard_capacity, cutoff);
		}

		let record = shard.entry(client.clone()).or_default();

		record.prune(cutoff);
		record.record(now);

		let len = record.timestamps.len();

		if len <= self.max_requests {
			return RateLimitDecision::Allow;
		}

		let earliest_retry_at =
			record.timestamps[len - self.max_requests].saturating_add(self.window);

		while record.timestamps.len() > self.max_requests {
			record.timestamps.pop_front();
		}

		RateLimitDecision::Delay(
			RetryDirective::new(earliest_retry_at, earliest_retry_at - now).with_reason(format!(
				"Rate limit exceeded. Max {} requests per {} allowed.",
				self.max_requests, self.window
			)),
		)
	}

	/// Drops every record with no timestamp inside the window ending at `now`.
	///
	/// Returns the number of client keys removed.
	pub fn sweep(&self, now: OffsetDateTime) -> usize {
		let cutoff = now.saturating_sub(self.window);

		self.shards
			.iter()
			.map(|shard| {
				let mut guard = shard.lock();
				let before = guard.len();

				guard.retain(|_, record| !record.is_stale(cutoff));

				before - guard.len()
			})
			.sum()
	}

	/// Number of client keys currently tracked.
	pub fn tracked_clients(&self) -> usize {
		self.shards.iter().map(|shard| shard.lock().len()).sum()
	}

	fn shard(&self, client: &ClientKey) -> &Shard {
		let mut hasher = DefaultHasher::new();

		client.hash(&mut hasher);

		let idx = (hasher.finish() % self.shards.len() as u64) as usize;

		&self.shards[idx]
	}

	fn make_room(
		shard: &mut HashMap<ClientKey, ClientRecord>,
		capacity: usize,
		cutoff: OffsetDateTime,
	) {
		if shard.len() < capacity {
			return;
		}

		shard.retain(|_, record| !record.is_stale(cutoff));

		if shard.len() < capacity {
			return;
		}

		let oldest = shard
			.iter()
			.min_by_key(|(_, record)| record.last_seen())
			.map(|(key, _)| key.clone());

		if let Some(key) = oldest {
			shard.remove(&key);
		}
	}
}
impl RateLimitPolicy for SlidingWindowLimiter {
	fn evaluate(&self, context: &RateLimitContext) -> RateLimitDecision {
		let decision = self.check_at(&context.client, context.observed_at);

		match &decision {
			RateLimitDecision::Allow =>
				obs::record_op_outcome(AuthOp::RateLimit, OpOutcome::Success),
			RateLimitDecision::Delay(directive) => {
				obs::log_rate_limited(
					&context.client,
					directive.recommended_backoff.whole_milliseconds() as i64,
				);
				obs::record_op_outcome(AuthOp::RateLimit, OpOutcome::Failure);
			},
		}

		decision
	}
}
