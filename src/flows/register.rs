//! User registration: validate, hash, store, and hand out a one-time API key.

// self
use crate::{
	_prelude::*,
	auth::{ApiKey, Username},
	flows::Authenticator,
	obs::{self, AuthOp, OpOutcome, OpSpan},
	store::{InsertOutcome, UserRecord},
};

/// Registration request as submitted by a client.
#[derive(Clone, Deserialize)]
pub struct Registration {
	/// Requested login name.
	pub username: String,
	/// Optional contact address.
	#[serde(default)]
	pub email: Option<String>,
	/// Plaintext password; only its digest is stored.
	pub password: String,
}
impl Registration {
	/// Creates a registration without an email address.
	pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
		Self { username: username.into(), email: None, password: password.into() }
	}

	/// Attaches a contact address.
	pub fn with_email(mut self, email: impl Into<String>) -> Self {
		self.email = Some(email.into());

		self
	}
}
impl Debug for Registration {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Registration")
			.field("username", &self.username)
			.field("email", &self.email)
			.field("password", &"<redacted>")
			.finish()
	}
}

/// Outcome of a successful registration.
///
/// The API key is returned exactly once; the store only keeps its fingerprint.
#[derive(Clone, Debug, Serialize)]
pub struct RegisteredUser {
	/// Registered login name.
	pub username: Username,
	/// Freshly generated API key.
	pub api_key: ApiKey,
}

impl Authenticator {
	/// Registers a new user and returns the API key issued to them.
	pub async fn register(&self, registration: Registration) -> Result<RegisteredUser> {
		const OP: AuthOp = AuthOp::Register;

		let span = OpSpan::new(OP, "register");

		obs::record_op_outcome(OP, OpOutcome::Attempt);

		let result = span
			.instrument(async move {
				let username = Username::new(&registration.username)?;

				if registration.password.is_empty() {
					return Err(Error::InvalidInput { reason: "password cannot be empty".into() });
				}

				let digest = self.hasher.hash(&registration.password)?;
				let api_key = ApiKey::generate();
				let now = OffsetDateTime::now_utc();
				let mut record = UserRecord::new(username.clone(), digest, now)
					.with_api_key_fingerprint(api_key.fingerprint());

				if let Some(email) = registration.email {
					record = record.with_email(email);
				}

				match self.store.insert(record).await? {
					InsertOutcome::Inserted => {
						self.metrics.record_registration();

						Ok(RegisteredUser { username, api_key })
					},
					InsertOutcome::Exists => Err(Error::UserExists { username: username.into() }),
				}
			})
			.await;

		match &result {
			Ok(_) => obs::record_op_outcome(OP, OpOutcome::Success),
			Err(_) => obs::record_op_outcome(OP, OpOutcome::Failure),
		}

		result
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{_preludet::*, store::CredentialStore};

	#[tokio::test]
	async fn registration_stores_digest_and_fingerprint_only() {
		let (authenticator, store) = build_test_authenticator();
		let registered = authenticator
			.register(Registration::new("isfar", "hunter2").with_email("isfar@example.com"))
			.await
			.expect("Registration should succeed.");
		let record = store
			.fetch(&registered.username)
			.await
			.expect("Store lookup should succeed.")
			.expect("Registered user should be stored.");

		assert_ne!(record.password_digest, "hunter2");
		assert!(record.password_digest.starts_with("$argon2id$"));
		assert_eq!(record.api_key_fingerprint, Some(registered.api_key.fingerprint()));
		assert_eq!(record.email.as_deref(), Some("isfar@example.com"));
		assert_eq!(authenticator.metrics.registrations(), 1);
	}

	#[tokio::test]
	async fn duplicate_username_is_rejected() {
		let (authenticator, _) = build_test_authenticator();

		authenticator
			.register(Registration::new("isfar", "hunter2"))
			.await
			.expect("First registration should succeed.");

		let err = authenticator
			.register(Registration::new("isfar", "other"))
			.await
			.expect_err("Second registration must be rejected.");

		assert!(matches!(err, Error::UserExists { ref username } if username == "isfar"));
	}

	#[tokio::test]
	async fn empty_password_and_bad_username_are_rejected() {
		let (authenticator, store) = build_test_authenticator();
		let err = authenticator
			.register(Registration::new("isfar", ""))
			.await
			.expect_err("Empty passwords must be rejected.");

		assert!(matches!(err, Error::InvalidInput { .. }));

		let err = authenticator
			.register(Registration::new("has space", "pw"))
			.await
			.expect_err("Usernames with whitespace must be rejected.");

		assert!(matches!(err, Error::Identifier(_)));
		assert!(store.is_empty());
	}

	#[test]
	fn registration_debug_redacts_password() {
		let rendered = format!("{:?}", Registration::new("isfar", "hunter2"));

		assert!(!rendered.contains("hunter2"));
	}
}
