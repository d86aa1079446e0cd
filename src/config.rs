//! Explicit configuration for token classes, rate limiting, and password hashing.
//!
//! Every tunable lives on [`AuthConfig`]; nothing is read from module-level state. Build one
//! with [`AuthConfig::builder`], parse a JSON document with [`AuthConfig::from_json_str`], or
//! read `TOKENGATE_*` variables with [`AuthConfig::from_env`]. All three paths end in the same
//! validation.

mod document;
mod env;

// crates.io
use jsonwebtoken::Algorithm;
// self
use crate::{
	_prelude::*,
	auth::{PasswordAlgorithm, SigningSecret, TokenKind},
	error::ConfigError,
};

/// Signing material and lifetime for one token class.
#[derive(Clone, Debug)]
pub struct TokenClassConfig {
	/// Symmetric key used to sign and verify tokens of this class.
	pub secret: SigningSecret,
	/// HMAC algorithm embedded in the token header.
	pub algorithm: Algorithm,
	/// Lifetime applied when the issuer does not pass an explicit duration.
	pub lifetime: Duration,
}
impl TokenClassConfig {
	/// Creates a class configuration with HS256 and the class's default lifetime.
	pub fn new(kind: TokenKind, secret: SigningSecret) -> Self {
		Self { secret, algorithm: Algorithm::HS256, lifetime: kind.default_lifetime() }
	}

	fn validate(&self, kind: TokenKind) -> Result<(), ConfigError> {
		if self.secret.is_empty() {
			return Err(ConfigError::EmptySecret { class: kind.as_str() });
		}
		if !matches!(self.algorithm, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
			return Err(ConfigError::UnsupportedAlgorithm {
				name: format!("{:?}", self.algorithm),
			});
		}
		if !self.lifetime.is_positive() {
			return Err(ConfigError::NonPositiveDuration {
				field: match kind {
					TokenKind::Access => "access lifetime",
					TokenKind::Refresh => "refresh lifetime",
				},
			});
		}

		Ok(())
	}
}

/// Sliding-window limiter settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
	/// Length of the window requests are counted in.
	pub window: Duration,
	/// Requests admitted per client inside one window.
	pub max_requests: usize,
	/// Upper bound on tracked client keys across all shards.
	pub capacity: usize,
	/// Number of independently locked partitions.
	pub shards: usize,
}
impl RateLimitConfig {
	/// Default window length.
	pub const DEFAULT_WINDOW: Duration = Duration::SECOND;
	/// Default requests per window.
	pub const DEFAULT_MAX_REQUESTS: usize = 2;
	/// Default tracked-client capacity.
	pub const DEFAULT_CAPACITY: usize = 10_000;
	/// Default shard count.
	pub const DEFAULT_SHARDS: usize = 16;

	/// Checks that every field is usable.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if !self.window.is_positive() {
			return Err(ConfigError::NonPositiveDuration { field: "rate limit window" });
		}
		if self.max_requests == 0 {
			return Err(ConfigError::ZeroCount { field: "max_requests" });
		}
		if self.capacity == 0 {
			return Err(ConfigError::ZeroCount { field: "capacity" });
		}
		if self.shards == 0 {
			return Err(ConfigError::ZeroCount { field: "shards" });
		}

		Ok(())
	}
}
impl Default for RateLimitConfig {
	fn default() -> Self {
		Self {
			window: Self::DEFAULT_WINDOW,
			max_requests: Self::DEFAULT_MAX_REQUESTS,
			capacity: Self::DEFAULT_CAPACITY,
			shards: Self::DEFAULT_SHARDS,
		}
	}
}

/// Argon2 variant and cost parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PasswordConfig {
	/// Argon2 variant.
	pub variant: PasswordAlgorithm,
	/// Memory cost in KiB.
	pub memory_kib: u32,
	/// Number of passes.
	pub iterations: u32,
	/// Degree of parallelism.
	pub parallelism: u32,
}
impl PasswordConfig {
	/// Builds the Argon2 parameter block, rejecting out-of-range costs.
	pub fn params(&self) -> Result<argon2::Params, ConfigError> {
		argon2::Params::new(self.memory_kib, self.iterations, self.parallelism, None)
			.map_err(|e| ConfigError::PasswordParams { message: e.to_string() })
	}
}
impl Default for PasswordConfig {
	fn default() -> Self {
		Self {
			variant: PasswordAlgorithm::default(),
			memory_kib: argon2::Params::DEFAULT_M_COST,
			iterations: argon2::Params::DEFAULT_T_COST,
			parallelism: argon2::Params::DEFAULT_P_COST,
		}
	}
}

/// Complete, validated configuration.
#[derive(Clone, Debug)]
pub struct AuthConfig {
	/// Access-token class settings.
	pub access: TokenClassConfig,
	/// Refresh-token class settings.
	pub refresh: TokenClassConfig,
	/// Rate limiter settings.
	pub rate_limit: RateLimitConfig,
	/// Password hashing settings.
	pub password: PasswordConfig,
}
impl AuthConfig {
	/// Returns a builder seeded with the two class secrets and every default.
	pub fn builder(
		access_secret: SigningSecret,
		refresh_secret: SigningSecret,
	) -> AuthConfigBuilder {
		AuthConfigBuilder::new(access_secret, refresh_secret)
	}

	/// Returns the settings of one token class.
	pub fn class(&self, kind: TokenKind) -> &TokenClassConfig {
		match kind {
			TokenKind::Access => &self.access,
			TokenKind::Refresh => &self.refresh,
		}
	}

	/// Checks every section plus the cross-class secret rule.
	pub fn validate(&self) -> Result<(), ConfigError> {
		self.access.validate(TokenKind::Access)?;
		self.refresh.validate(TokenKind::Refresh)?;

		if self.access.secret == self.refresh.secret {
			return Err(ConfigError::SharedSecret);
		}

		self.rate_limit.validate()?;
		self.password.params()?;

		Ok(())
	}
}

/// Builder for [`AuthConfig`].
#[derive(Clone, Debug)]
pub struct AuthConfigBuilder {
	config: AuthConfig,
}
impl AuthConfigBuilder {
	fn new(access_secret: SigningSecret, refresh_secret: SigningSecret) -> Self {
		Self {
			config: AuthConfig {
				access: TokenClassConfig::new(TokenKind::Access, access_secret),
				refresh: TokenClassConfig::new(TokenKind::Refresh, refresh_secret),
				rate_limit: RateLimitConfig::default(),
				password: PasswordConfig::default(),
			},
		}
	}

	/// Sets the signing algorithm of both token classes.
	pub fn algorithm(mut self, algorithm: Algorithm) -> Self {
		self.config.access.algorithm = algorithm;
		self.config.refresh.algorithm = algorithm;

		self
	}

	/// Sets the signing algorithm of refresh tokens only.
	pub fn refresh_algorithm(mut self, algorithm: Algorithm) -> Self {
		self.config.refresh.algorithm = algorithm;

		self
	}

	/// Overrides the default access-token lifetime.
	pub fn access_lifetime(mut self, lifetime: Duration) -> Self {
		self.config.access.lifetime = lifetime;

		self
	}

	/// Overrides the default refresh-token lifetime.
	pub fn refresh_lifetime(mut self, lifetime: Duration) -> Self {
		self.config.refresh.lifetime = lifetime;

		self
	}

	/// Overrides the rate-limit window.
	pub fn rate_window(mut self, window: Duration) -> Self {
		self.config.rate_limit.window = window;

		self
	}

	/// Overrides the requests admitted per window.
	pub fn rate_max(mut self, max_requests: usize) -> Self {
		self.config.rate_limit.max_requests = max_requests;

		self
	}

	/// Overrides the tracked-client capacity.
	pub fn rate_capacity(mut self, capacity: usize) -> Self {
		self.config.rate_limit.capacity = capacity;

		self
	}

	/// Overrides the limiter shard count.
	pub fn rate_shards(mut self, shards: usize) -> Self {
		self.config.rate_limit.shards = shards;

		self
	}

	/// Selects the Argon2 variant.
	pub fn password_variant(mut self, variant: PasswordAlgorithm) -> Self {
		self.config.password.variant = variant;

		self
	}

	/// Overrides the Argon2 memory, iteration, and parallelism costs.
	pub fn password_cost(mut self, memory_kib: u32, iterations: u32, parallelism: u32) -> Self {
		self.config.password.memory_kib = memory_kib;
		self.config.password.iterations = iterations;
		self.config.password.parallelism = parallelism;

		self
	}

	/// Validates and returns the configuration.
	pub fn build(self) -> Result<AuthConfig, ConfigError> {
		self.config.validate()?;

		Ok(self.config)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	fn builder() -> AuthConfigBuilder {
		AuthConfig::builder(
			SigningSecret::new("access-secret"),
			SigningSecret::new("refresh-secret"),
		)
	}

	#[test]
	fn defaults_match_documented_values() {
		let config = builder().build().expect("Default configuration should build.");

		assert_eq!(config.access.algorithm, Algorithm::HS256);
		assert_eq!(config.access.lifetime, Duration::minutes(30));
		assert_eq!(config.refresh.lifetime, Duration::days(7));
		assert_eq!(config.rate_limit.window, Duration::SECOND);
		assert_eq!(config.rate_limit.max_requests, 2);
		assert_eq!(config.password.variant, PasswordAlgorithm::Argon2id);
	}

	#[test]
	fn shared_secret_is_rejected() {
		let err = AuthConfig::builder(SigningSecret::new("same"), SigningSecret::new("same"))
			.build()
			.expect_err("Shared secrets must be rejected.");

		assert!(matches!(err, ConfigError::SharedSecret));
	}

	#[test]
	fn invalid_values_are_rejected() {
		assert!(matches!(
			AuthConfig::builder(SigningSecret::new(""), SigningSecret::new("x")).build(),
			Err(ConfigError::EmptySecret { class: "access" })
		));
		assert!(matches!(
			builder().algorithm(Algorithm::RS256).build(),
			Err(ConfigError::UnsupportedAlgorithm { .. })
		));
		assert!(matches!(
			builder().access_lifetime(Duration::ZERO).build(),
			Err(ConfigError::NonPositiveDuration { field: "access lifetime" })
		));
		assert!(matches!(
			builder().rate_window(Duration::seconds(-1)).build(),
			Err(ConfigError::NonPositiveDuration { field: "rate limit window" })
		));
		assert!(matches!(builder().rate_max(0).build(), Err(ConfigError::ZeroCount { .. })));
		assert!(matches!(builder().rate_shards(0).build(), Err(ConfigError::ZeroCount { .. })));
		assert!(matches!(
			builder().password_cost(1, 1, 1).build(),
			Err(ConfigError::PasswordParams { .. })
		));
	}

	#[test]
	fn refresh_algorithm_can_diverge() {
		let config = builder()
			.algorithm(Algorithm::HS384)
			.refresh_algorithm(Algorithm::HS512)
			.build()
			.expect("Distinct HMAC algorithms should be accepted.");

		assert_eq!(config.class(TokenKind::Access).algorithm, Algorithm::HS384);
		assert_eq!(config.class(TokenKind::Refresh).algorithm, Algorithm::HS512);
	}
}
