//! Token class labels and their default lifetimes.

// self
use crate::_prelude::*;

/// Class of a bearer token; each class is signed with its own secret.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
	/// Short-lived token presented on every request.
	Access,
	/// Long-lived token exchanged for new access tokens.
	Refresh,
}
impl TokenKind {
	/// Default lifetime of access tokens.
	pub const DEFAULT_ACCESS_LIFETIME: Duration = Duration::minutes(30);
	/// Default lifetime of refresh tokens.
	pub const DEFAULT_REFRESH_LIFETIME: Duration = Duration::days(7);

	/// Returns a stable label suitable for span, metric, or error fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			TokenKind::Access => "access",
			TokenKind::Refresh => "refresh",
		}
	}

	/// Lifetime applied when the issuer does not pass an explicit duration.
	pub const fn default_lifetime(self) -> Duration {
		match self {
			TokenKind::Access => Self::DEFAULT_ACCESS_LIFETIME,
			TokenKind::Refresh => Self::DEFAULT_REFRESH_LIFETIME,
		}
	}
}
impl Display for TokenKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
