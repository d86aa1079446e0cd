//! Credential flows that tie the password hasher, token service, and credential store together.

mod login;
mod metrics;
mod refresh;
pub mod register;

pub use metrics::AuthMetrics;
pub use register::*;

// self
use crate::{
	_prelude::*,
	auth::{PasswordHasher, TokenService},
	config::AuthConfig,
	store::CredentialStore,
};

const DUMMY_PASSWORD: &str = "tokengate-dummy-password";

/// Coordinates registration, login, refresh, and API-key lookups against one credential store.
///
/// The authenticator owns the token service, the password hasher, and the store handle so
/// individual flows only deal with their own input validation. A digest of a fixed dummy
/// password is computed up front; logins for unknown users verify against it so that the
/// response time does not reveal whether a username exists.
#[derive(Clone)]
pub struct Authenticator {
	/// Credential store holding registered users.
	pub store: Arc<dyn CredentialStore>,
	/// Token service shared with middleware.
	pub tokens: Arc<TokenService>,
	/// Shared counters for login and refresh outcomes.
	pub metrics: Arc<AuthMetrics>,
	hasher: PasswordHasher,
	dummy_digest: String,
}
impl Authenticator {
	/// Builds an authenticator and its token service from a validated configuration.
	pub fn from_config(store: Arc<dyn CredentialStore>, config: &AuthConfig) -> Result<Self> {
		Self::with_token_service(store, Arc::new(TokenService::from_config(config)), config)
	}

	/// Builds an authenticator that reuses an existing token service.
	pub fn with_token_service(
		store: Arc<dyn CredentialStore>,
		tokens: Arc<TokenService>,
		config: &AuthConfig,
	) -> Result<Self> {
		let hasher = PasswordHasher::from_config(&config.password)?;
		let dummy_digest = hasher.hash(DUMMY_PASSWORD)?;

		Ok(Self { store, tokens, metrics: Default::default(), hasher, dummy_digest })
	}

	/// Password hasher used for new digests.
	pub fn hasher(&self) -> &PasswordHasher {
		&self.hasher
	}
}
impl Debug for Authenticator {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Authenticator")
			.field("tokens", &self.tokens)
			.field("hasher", &self.hasher)
			.field("metrics", &self.metrics)
			.finish()
	}
}
