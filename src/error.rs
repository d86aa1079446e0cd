//! Crate-level error types shared across token, credential, and configuration paths.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Presented token failed verification.
	#[error(transparent)]
	InvalidToken(#[from] crate::auth::InvalidToken),
	/// A username or client identifier failed validation.
	#[error(transparent)]
	Identifier(#[from] crate::auth::IdentifierError),

	/// Unknown user or wrong password; the two are deliberately indistinguishable.
	#[error("Invalid credentials.")]
	InvalidCredentials,
	/// Registration collided with an existing username.
	#[error("User `{username}` already exists.")]
	UserExists {
		/// Username that is already taken.
		username: String,
	},
	/// Issuance instant plus the requested lifetime falls outside the representable date range.
	#[error("The token expiry exceeds the supported range.")]
	ExpiryOutOfRange,
	/// The password hashing backend failed at runtime.
	#[error("Password could not be hashed: {message}.")]
	Hashing {
		/// Message reported by the hashing backend.
		message: String,
	},
	/// Registration or login input was rejected before touching the store.
	#[error("Invalid input: {reason}.")]
	InvalidInput {
		/// Human-readable reason string.
		reason: String,
	},
}

/// Configuration and key-material failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A signing secret was empty.
	#[error("The {class} token secret cannot be empty.")]
	EmptySecret {
		/// Token class label.
		class: &'static str,
	},
	/// Access and refresh tokens were configured with the same secret.
	#[error("Access and refresh tokens must use distinct secrets.")]
	SharedSecret,
	/// Algorithm is not a shared-secret (HMAC) algorithm or is unknown.
	#[error("Unsupported signing algorithm `{name}`; expected HS256, HS384, or HS512.")]
	UnsupportedAlgorithm {
		/// Algorithm name as supplied.
		name: String,
	},
	/// A duration that must be positive was zero or negative.
	#[error("The {field} duration must be positive.")]
	NonPositiveDuration {
		/// Configuration field name.
		field: &'static str,
	},
	/// A count that must be at least one was zero.
	#[error("The {field} value must be at least 1.")]
	ZeroCount {
		/// Configuration field name.
		field: &'static str,
	},
	/// Argon2 rejected the configured cost parameters.
	#[error("Password hashing parameters are invalid: {message}.")]
	PasswordParams {
		/// Message reported by the hashing backend.
		message: String,
	},
	/// Required environment variable is missing.
	#[error("Environment variable `{name}` is not set.")]
	MissingEnv {
		/// Variable name.
		name: &'static str,
	},
	/// Environment variable is present but unparsable.
	#[error("Environment variable `{name}` has an invalid value.")]
	InvalidEnv {
		/// Variable name.
		name: &'static str,
	},
	/// Configuration document is malformed.
	#[error("Configuration document is malformed.")]
	Parse {
		/// Structured parsing failure including the offending JSON path.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
	/// Token signing failed, which only happens with unusable key material.
	#[error("Token could not be signed.")]
	Signing {
		/// Underlying encoder failure.
		#[source]
		source: jsonwebtoken::errors::Error,
	},
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::store::StoreError;

	#[test]
	fn store_error_converts_with_source() {
		let store_error = StoreError::Backend { message: "database unreachable".into() };
		let error: Error = store_error.clone().into();

		assert!(matches!(error, Error::Storage(_)));
		assert!(error.to_string().contains("database unreachable"));

		let source =
			StdError::source(&error).expect("Error should expose the original store error.");

		assert_eq!(source.to_string(), store_error.to_string());
	}

	#[test]
	fn runtime_failures_are_not_configuration_errors() {
		let hashing = Error::Hashing { message: "out of memory".into() };

		assert_eq!(hashing.to_string(), "Password could not be hashed: out of memory.");
		assert!(!matches!(hashing, Error::Config(_)));
		assert!(!matches!(Error::ExpiryOutOfRange, Error::Config(_)));
	}

	#[test]
	fn credential_failures_share_one_message() {
		assert_eq!(Error::InvalidCredentials.to_string(), "Invalid credentials.");
	}
}
