//! Signed bearer tokens, password hashing, and per-client rate limiting for tower-based HTTP
//! services, configured through one explicit object instead of module-level constants.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod error;
pub mod flows;
pub mod middleware;
pub mod obs;
pub mod rate_limit;
pub mod store;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::{SigningSecret, TokenService},
		config::AuthConfig,
		flows::Authenticator,
		store::{CredentialStore, MemoryStore},
	};

	/// Access-token secret shared by test fixtures.
	pub const TEST_ACCESS_SECRET: &str = "test-access-secret-which-is-long-enough";
	/// Refresh-token secret shared by test fixtures.
	pub const TEST_REFRESH_SECRET: &str = "test-refresh-secret-which-is-long-enough";

	/// Builds a configuration with distinct test secrets, cheap Argon2 parameters, and the
	/// default token lifetimes and rate limits.
	pub fn test_config() -> AuthConfig {
		AuthConfig::builder(
			SigningSecret::new(TEST_ACCESS_SECRET),
			SigningSecret::new(TEST_REFRESH_SECRET),
		)
		.password_cost(1024, 1, 1)
		.build()
		.expect("Test configuration should build successfully.")
	}

	/// Builds a token service from [`test_config`].
	pub fn test_token_service() -> Arc<TokenService> {
		Arc::new(TokenService::from_config(&test_config()))
	}

	/// Constructs an [`Authenticator`] backed by an in-memory store.
	pub fn build_test_authenticator() -> (Authenticator, Arc<MemoryStore>) {
		let config = test_config();
		let store_backend = Arc::new(MemoryStore::default());
		let store: Arc<dyn CredentialStore> = store_backend.clone();
		let authenticator = Authenticator::from_config(store, &config)
			.expect("Authenticator should build from the test configuration.");

		(authenticator, store_backend)
	}
}

mod _prelude {
	pub use std::{
		collections::{HashMap, VecDeque, hash_map::DefaultHasher},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		hash::{Hash, Hasher},
		pin::Pin,
		str::FromStr,
		sync::Arc,
	};

	pub use parking_lot::{Mutex, RwLock};
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::{Map as JsonMap, Value as JsonValue};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};

	pub use crate::error::{Error, Result};
}

pub use http;
pub use tower;
#[cfg(test)] use tokio as _;
