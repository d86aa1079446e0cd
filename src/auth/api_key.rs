//! Random API keys and the fingerprints stored in their place.

// crates.io
use base64::{
	Engine as _,
	engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD},
};
use rand::Rng;
use sha2::{Digest, Sha256};
// self
use crate::_prelude::*;

const API_KEY_BYTES: usize = 32;

/// Opaque API key handed to a user once at registration.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiKey(String);
impl ApiKey {
	/// Generates a key from 32 random bytes, URL-safe base64 without padding.
	pub fn generate() -> Self {
		let mut bytes = [0_u8; API_KEY_BYTES];

		rand::rng().fill(&mut bytes);

		Self(URL_SAFE_NO_PAD.encode(bytes))
	}

	/// Wraps a key presented by a client.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns the key string. Callers must avoid logging it.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// Base64 (no padding) SHA-256 digest of the key; the only form that is ever stored.
	pub fn fingerprint(&self) -> String {
		STANDARD_NO_PAD.encode(Sha256::digest(self.0.as_bytes()))
	}
}
impl Debug for ApiKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_tuple("ApiKey").field(&"<redacted>").finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn generated_keys_are_url_safe_and_unique() {
		let a = ApiKey::generate();
		let b = ApiKey::generate();

		assert_eq!(a.expose().len(), 43);
		assert!(a.expose().chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
		assert_ne!(a, b);
	}

	#[test]
	fn fingerprint_is_stable_and_hides_the_key() {
		let key = ApiKey::new("n8n-webhook-key");

		assert_eq!(key.fingerprint(), ApiKey::new("n8n-webhook-key").fingerprint());
		assert_ne!(key.fingerprint(), ApiKey::new("n8n-webhook-kez").fingerprint());
		assert!(!key.fingerprint().contains(key.expose()));
		assert_eq!(format!("{key:?}"), "ApiKey(\"<redacted>\")");
	}
}
