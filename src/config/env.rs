//! Environment-variable configuration.

// crates.io
use jsonwebtoken::Algorithm;
// self
use crate::{_prelude::*, auth::SigningSecret, config::AuthConfig, error::ConfigError};

const ACCESS_SECRET: &str = "TOKENGATE_ACCESS_SECRET";
const REFRESH_SECRET: &str = "TOKENGATE_REFRESH_SECRET";
const ALGORITHM: &str = "TOKENGATE_ALGORITHM";
const ACCESS_TTL_SECS: &str = "TOKENGATE_ACCESS_TTL_SECS";
const REFRESH_TTL_SECS: &str = "TOKENGATE_REFRESH_TTL_SECS";
const RATE_WINDOW_SECS: &str = "TOKENGATE_RATE_WINDOW_SECS";
const RATE_MAX: &str = "TOKENGATE_RATE_MAX";

impl AuthConfig {
	/// Reads `TOKENGATE_*` variables from the process environment.
	///
	/// Both secrets are required; every other variable falls back to its default.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let access =
			lookup(ACCESS_SECRET).ok_or(ConfigError::MissingEnv { name: ACCESS_SECRET })?;
		let refresh =
			lookup(REFRESH_SECRET).ok_or(ConfigError::MissingEnv { name: REFRESH_SECRET })?;
		let mut builder =
			AuthConfig::builder(SigningSecret::new(access), SigningSecret::new(refresh));

		if let Some(algorithm) = parse::<Algorithm, _>(&lookup, ALGORITHM)? {
			builder = builder.algorithm(algorithm);
		}
		if let Some(secs) = parse::<i64, _>(&lookup, ACCESS_TTL_SECS)? {
			builder = builder.access_lifetime(Duration::seconds(secs));
		}
		if let Some(secs) = parse::<i64, _>(&lookup, REFRESH_TTL_SECS)? {
			builder = builder.refresh_lifetime(Duration::seconds(secs));
		}
		if let Some(secs) = parse::<i64, _>(&lookup, RATE_WINDOW_SECS)? {
			builder = builder.rate_window(Duration::seconds(secs));
		}
		if let Some(max) = parse::<usize, _>(&lookup, RATE_MAX)? {
			builder = builder.rate_max(max);
		}

		builder.build()
	}
}

fn parse<T, F>(lookup: &F, name: &'static str) -> Result<Option<T>, ConfigError>
where
	T: FromStr,
	F: Fn(&str) -> Option<String>,
{
	match lookup(name) {
		Some(raw) => raw.trim().parse().map(Some).map_err(|_| ConfigError::InvalidEnv { name }),
		None => Ok(None),
	}
}
