//! The single failure outcome of token verification.

// self
use crate::_prelude::*;

/// Diagnostic cause attached to an [`InvalidToken`].
///
/// The cause never changes how a caller must treat the token; it exists for logs and tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidTokenReason {
	/// The token is not a well-formed compact token, uses another algorithm, or lacks a
	/// required claim.
	Malformed,
	/// The signature does not match the configured secret.
	BadSignature,
	/// The encoded expiry is not after the evaluation instant.
	Expired,
}
impl InvalidTokenReason {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			InvalidTokenReason::Malformed => "malformed",
			InvalidTokenReason::BadSignature => "bad_signature",
			InvalidTokenReason::Expired => "expired",
		}
	}
}

/// Verification failed; forged, tampered, malformed, and expired tokens all collapse here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ThisError)]
#[error("Token is invalid or expired.")]
pub struct InvalidToken {
	reason: InvalidTokenReason,
}
impl InvalidToken {
	pub(crate) fn new(reason: InvalidTokenReason) -> Self {
		Self { reason }
	}

	/// Diagnostic cause; not part of the caller-facing contract.
	pub fn reason(&self) -> InvalidTokenReason {
		self.reason
	}
}
impl From<jsonwebtoken::errors::Error> for InvalidToken {
	fn from(e: jsonwebtoken::errors::Error) -> Self {
		// crates.io
		use jsonwebtoken::errors::ErrorKind;

		let reason = match e.kind() {
			ErrorKind::InvalidSignature => InvalidTokenReason::BadSignature,
			ErrorKind::ExpiredSignature => InvalidTokenReason::Expired,
			_ => InvalidTokenReason::Malformed,
		};

		Self::new(reason)
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn every_reason_displays_the_same_message() {
		for reason in [
			InvalidTokenReason::Malformed,
			InvalidTokenReason::BadSignature,
			InvalidTokenReason::Expired,
		] {
			assert_eq!(InvalidToken::new(reason).to_string(), "Token is invalid or expired.");
		}
	}
}
