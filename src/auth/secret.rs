//! Secret wrappers that redact sensitive material in logs.

// self
use crate::_prelude::*;

macro_rules! def_redacted {
	($name:ident) => {
		impl $name {
			/// Returns the inner value. Callers must avoid logging this string.
			pub fn expose(&self) -> &str {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				self.expose()
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.debug_tuple(stringify!($name)).field(&"<redacted>").finish()
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str("<redacted>")
			}
		}
	};
}

/// Shared symmetric key used to sign and verify one token class.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct SigningSecret(String);
impl SigningSecret {
	/// Wraps a new secret string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Returns `true` when the secret holds no key material.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
def_redacted! { SigningSecret }

/// Serialized compact token presented by a bearer.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BearerToken(String);
impl BearerToken {
	/// Wraps a serialized token string.
	pub fn new(value: impl Into<String>) -> Self {
		Self(value.into())
	}

	/// Parses an `Authorization` header value of the form `Bearer <token>`.
	///
	/// The scheme is matched case-insensitively; the credential must be a single non-empty
	/// word.
	pub fn from_authorization(value: &str) -> Option<Self> {
		let (scheme, credential) = value.trim().split_once(' ')?;
		let credential = credential.trim_start();

		if !scheme.eq_ignore_ascii_case("bearer")
			|| credential.is_empty()
			|| credential.contains(char::is_whitespace)
		{
			return None;
		}

		Some(Self::new(credential))
	}

	/// Consumes the wrapper and returns the raw token string.
	pub fn into_inner(self) -> String {
		self.0
	}
}
def_redacted! { BearerToken }
