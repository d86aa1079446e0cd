//! Salted, slow one-way password digests backed by Argon2.

// crates.io
use argon2::{
	Argon2, PasswordHash, PasswordHasher as _, PasswordVerifier, Version,
	password_hash::{SaltString, rand_core::OsRng},
};
// self
use crate::{_prelude::*, config::PasswordConfig, error::ConfigError, obs};

/// Argon2 variant used for new digests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PasswordAlgorithm {
	/// Hybrid mode; resists both side-channel and GPU attacks.
	#[default]
	Argon2id,
	/// Data-independent memory access.
	Argon2i,
	/// Data-dependent memory access.
	Argon2d,
}
impl From<PasswordAlgorithm> for argon2::Algorithm {
	fn from(value: PasswordAlgorithm) -> Self {
		match value {
			PasswordAlgorithm::Argon2id => argon2::Algorithm::Argon2id,
			PasswordAlgorithm::Argon2i => argon2::Algorithm::Argon2i,
			PasswordAlgorithm::Argon2d => argon2::Algorithm::Argon2d,
		}
	}
}

/// Hashes and verifies passwords with a configured Argon2 instance.
#[derive(Clone, Debug)]
pub struct PasswordHasher {
	argon2: Argon2<'static>,
}
impl PasswordHasher {
	/// Builds a hasher from the password section of the configuration.
	pub fn from_config(config: &PasswordConfig) -> Result<Self, ConfigError> {
		let params = config.params()?;

		Ok(Self { argon2: Argon2::new(config.variant.into(), Version::V0x13, params) })
	}

	/// Produces a PHC-format digest of `plaintext` with a fresh random salt.
	pub fn hash(&self, plaintext: &str) -> Result<String> {
		let salt = SaltString::generate(&mut OsRng);
		let digest = self
			.argon2
			.hash_password(plaintext.as_bytes(), &salt)
			.map_err(|e| Error::Hashing { message: e.to_string() })?;

		Ok(digest.to_string())
	}

	/// Checks `plaintext` against a stored digest.
	///
	/// The algorithm and costs are read from the digest itself, so digests created under older
	/// settings keep verifying. A digest that cannot be parsed never matches.
	pub fn verify(&self, plaintext: &str, digest: &str) -> bool {
		let parsed = match PasswordHash::new(digest) {
			Ok(parsed) => parsed,
			Err(e) => {
				obs::log_malformed_digest(&e.to_string());

				return false;
			},
		};

		self.argon2.verify_password(plaintext.as_bytes(), &parsed).is_ok()
	}
}
