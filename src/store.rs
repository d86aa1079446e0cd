//! Storage contracts and the built-in in-memory credential store.

pub mod memory;

pub use memory::MemoryStore;

// self
use crate::{_prelude::*, auth::Username};

/// Boxed future returned by [`CredentialStore`] methods.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Storage backend contract for registered users.
pub trait CredentialStore
where
	Self: Send + Sync,
{
	/// Persists a new record unless the username is already taken.
	fn insert(&self, record: UserRecord) -> StoreFuture<'_, InsertOutcome>;

	/// Fetches the record registered under `username`, if present.
	fn fetch<'a>(&'a self, username: &'a Username) -> StoreFuture<'a, Option<UserRecord>>;

	/// Fetches the record whose API key fingerprint equals `fingerprint`, if present.
	fn fetch_by_api_key<'a>(
		&'a self,
		fingerprint: &'a str,
	) -> StoreFuture<'a, Option<UserRecord>>;
}

/// Result of a [`CredentialStore::insert`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InsertOutcome {
	/// The record was stored.
	Inserted,
	/// A record with the same username already exists; nothing was written.
	Exists,
}

/// Error type produced by [`CredentialStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}

/// Stored representation of a registered user.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
	/// Login name and primary key.
	pub username: Username,
	/// Optional contact address.
	pub email: Option<String>,
	/// PHC-formatted password digest.
	pub password_digest: String,
	/// Fingerprint of the API key issued at registration.
	pub api_key_fingerprint: Option<String>,
	/// Registration instant.
	#[serde(with = "time::serde::rfc3339")]
	pub created_at: OffsetDateTime,
}
impl UserRecord {
	/// Creates a record stamped with `created_at` and no API key.
	pub fn new(
		username: Username,
		password_digest: impl Into<String>,
		created_at: OffsetDateTime,
	) -> Self {
		Self {
			username,
			email: None,
			password_digest: password_digest.into(),
			api_key_fingerprint: None,
			created_at,
		}
	}

	/// Attaches a contact address.
	pub fn with_email(mut self, email: impl Into<String>) -> Self {
		self.email = Some(email.into());

		self
	}

	/// Attaches the fingerprint of an issued API key.
	pub fn with_api_key_fingerprint(mut self, fingerprint: impl Into<String>) -> Self {
		self.api_key_fingerprint = Some(fingerprint.into());

		self
	}
}
impl Debug for UserRecord {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("UserRecord")
			.field("username", &self.username)
			.field("email", &self.email)
			.field("password_digest", &"<redacted>")
			.field("api_key_fingerprint", &self.api_key_fingerprint.as_ref().map(|_| "<redacted>"))
			.field("created_at", &self.created_at)
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn debug_hides_digest_and_fingerprint() {
		let record = UserRecord::new(
			Username::new("isfar").expect("Username fixture should be valid."),
			"$argon2id$v=19$m=1024,t=1,p=1$c2FsdA$aGFzaA",
			macros::datetime!(2025-01-01 00:00 UTC),
		)
		.with_api_key_fingerprint("abc");
		let rendered = format!("{record:?}");

		assert!(rendered.contains("Username(isfar)"));
		assert!(!rendered.contains("argon2id"));
		assert!(!rendered.contains("\"abc\""));
	}

	#[test]
	fn record_serializes_with_rfc3339_timestamp() {
		let record = UserRecord::new(
			Username::new("isfar").expect("Username fixture should be valid."),
			"digest",
			macros::datetime!(2025-01-01 00:00 UTC),
		)
		.with_email("isfar@example.com");
		let payload = serde_json::to_value(&record).expect("UserRecord should serialize to JSON.");

		assert_eq!(payload["created_at"], "2025-01-01T00:00:00Z");
		assert_eq!(payload["username"], "isfar");

		let round_trip: UserRecord =
			serde_json::from_value(payload).expect("Serialized record should deserialize.");

		assert_eq!(round_trip, record);
	}

	#[test]
	fn backend_failure_is_the_only_store_error() {
		let error = StoreError::Backend { message: "disk full".into() };
		let payload = serde_json::to_value(&error).expect("StoreError should serialize to JSON.");

		assert_eq!(payload, serde_json::json!({ "Backend": { "message": "disk full" } }));
		assert!(matches!(Error::from(error), Error::Storage(StoreError::Backend { .. })));
	}

	#[test]
	fn insert_outcome_serializes_as_variant_name() {
		let payload = serde_json::to_string(&InsertOutcome::Exists)
			.expect("InsertOutcome should serialize to JSON.");

		assert_eq!(payload, "\"Exists\"");
	}
}
