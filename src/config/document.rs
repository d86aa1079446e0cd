//! JSON configuration documents.

// crates.io
use jsonwebtoken::Algorithm;
// self
use crate::{
	_prelude::*,
	auth::{PasswordAlgorithm, SigningSecret, TokenKind},
	config::{AuthConfig, PasswordConfig, RateLimitConfig, TokenClassConfig},
	error::ConfigError,
};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigDocument {
	access: ClassDocument,
	refresh: ClassDocument,
	#[serde(default)]
	rate_limit: RateLimitDocument,
	#[serde(default)]
	password: PasswordDocument,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ClassDocument {
	secret: SigningSecret,
	#[serde(default)]
	algorithm: Option<Algorithm>,
	#[serde(default)]
	lifetime_secs: Option<i64>,
}
impl ClassDocument {
	fn into_class(self, kind: TokenKind) -> TokenClassConfig {
		let mut class = TokenClassConfig::new(kind, self.secret);

		if let Some(algorithm) = self.algorithm {
			class.algorithm = algorithm;
		}
		if let Some(secs) = self.lifetime_secs {
			class.lifetime = Duration::seconds(secs);
		}

		class
	}
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RateLimitDocument {
	window_secs: Option<i64>,
	max_requests: Option<usize>,
	capacity: Option<usize>,
	shards: Option<usize>,
}
impl From<RateLimitDocument> for RateLimitConfig {
	fn from(doc: RateLimitDocument) -> Self {
		let defaults = RateLimitConfig::default();

		Self {
			window: doc.window_secs.map(Duration::seconds).unwrap_or(defaults.window),
			max_requests: doc.max_requests.unwrap_or(defaults.max_requests),
			capacity: doc.capacity.unwrap_or(defaults.capacity),
			shards: doc.shards.unwrap_or(defaults.shards),
		}
	}
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct PasswordDocument {
	variant: Option<PasswordAlgorithm>,
	memory_kib: Option<u32>,
	iterations: Option<u32>,
	parallelism: Option<u32>,
}
impl From<PasswordDocument> for PasswordConfig {
	fn from(doc: PasswordDocument) -> Self {
		let defaults = PasswordConfig::default();

		Self {
			variant: doc.variant.unwrap_or(defaults.variant),
			memory_kib: doc.memory_kib.unwrap_or(defaults.memory_kib),
			iterations: doc.iterations.unwrap_or(defaults.iterations),
			parallelism: doc.parallelism.unwrap_or(defaults.parallelism),
		}
	}
}

impl AuthConfig {
	/// Parses and validates a JSON configuration document.
	///
	/// Durations are whole seconds; omitted fields take their defaults. Parse failures report
	/// the JSON path of the offending field.
	pub fn from_json_str(payload: &str) -> Result<Self, ConfigError> {
		let mut deserializer = serde_json::Deserializer::from_str(payload);
		let doc: ConfigDocument = serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| ConfigError::Parse { source })?;
		let config = AuthConfig {
			access: doc.access.into_class(TokenKind::Access),
			refresh: doc.refresh.into_class(TokenKind::Refresh),
			rate_limit: doc.rate_limit.into(),
			password: doc.password.into(),
		};

		config.validate()?;

		Ok(config)
	}
}
