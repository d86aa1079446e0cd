// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for credential flow outcomes.
#[derive(Debug, Default)]
pub struct AuthMetrics {
	registrations: AtomicU64,
	login_attempts: AtomicU64,
	login_successes: AtomicU64,
	login_failures: AtomicU64,
	refreshes: AtomicU64,
	refresh_failures: AtomicU64,
}
impl AuthMetrics {
	/// Returns the number of successful registrations.
	pub fn registrations(&self) -> u64 {
		self.registrations.load(Ordering::Relaxed)
	}

	/// Returns the total number of login attempts.
	pub fn login_attempts(&self) -> u64 {
		self.login_attempts.load(Ordering::Relaxed)
	}

	/// Returns the number of logins that issued a token pair.
	pub fn login_successes(&self) -> u64 {
		self.login_successes.load(Ordering::Relaxed)
	}

	/// Returns the number of rejected logins.
	pub fn login_failures(&self) -> u64 {
		self.login_failures.load(Ordering::Relaxed)
	}

	/// Returns the number of refresh exchanges that issued an access token.
	pub fn refreshes(&self) -> u64 {
		self.refreshes.load(Ordering::Relaxed)
	}

	/// Returns the number of rejected refresh exchanges.
	pub fn refresh_failures(&self) -> u64 {
		self.refresh_failures.load(Ordering::Relaxed)
	}

	pub(crate) fn record_registration(&self) {
		self.registrations.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_login_attempt(&self) {
		self.login_attempts.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_login_success(&self) {
		self.login_successes.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_login_failure(&self) {
		self.login_failures.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_refresh(&self) {
		self.refreshes.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_refresh_failure(&self) {
		self.refresh_failures.fetch_add(1, Ordering::Relaxed);
	}
}
