//! Stateless issuance and verification of signed, time-limited bearer tokens.
//!
//! Each [`TokenKind`] owns its own secret, algorithm, and default lifetime. Issuance stamps an
//! `exp` claim (whole seconds since the Unix epoch) over whatever claims the caller supplies and
//! signs the result as a compact JWS. Verification checks structure, signature, and expiry in one
//! step and reports every failure as the same [`InvalidToken`].

// crates.io
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
// self
use crate::{
	_prelude::*,
	auth::{BearerToken, Claims, InvalidToken, InvalidTokenReason, TokenKind, Username},
	config::{AuthConfig, TokenClassConfig},
	error::ConfigError,
	obs::{self, AuthOp, OpOutcome, OpSpan},
};

struct TokenKeys {
	kind: TokenKind,
	algorithm: Algorithm,
	lifetime: Duration,
	encoding: EncodingKey,
	decoding: DecodingKey,
	validation: Validation,
}
impl TokenKeys {
	fn new(kind: TokenKind, config: &TokenClassConfig) -> Self {
		let secret = config.secret.expose().as_bytes();
		let mut validation = Validation::new(config.algorithm);

		// Expiry is compared against the caller's instant in `verify_token_at`; the library
		// check would consult the system clock instead.
		validation.validate_exp = false;
		validation.validate_nbf = false;
		validation.validate_aud = false;
		validation.leeway = 0;

		Self {
			kind,
			algorithm: config.algorithm,
			lifetime: config.lifetime,
			encoding: EncodingKey::from_secret(secret),
			decoding: DecodingKey::from_secret(secret),
			validation,
		}
	}
}
impl Debug for TokenKeys {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenKeys")
			.field("kind", &self.kind)
			.field("algorithm", &self.algorithm)
			.field("lifetime", &self.lifetime)
			.field("keys", &"<redacted>")
			.finish()
	}
}

/// Access + refresh token pair returned by a successful login.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
	/// Short-lived access token.
	pub access_token: BearerToken,
	/// Long-lived refresh token.
	pub refresh_token: BearerToken,
	/// Always `bearer`.
	pub token_type: String,
}

/// Issues and verifies tokens for both token classes.
#[derive(Debug)]
pub struct TokenService {
	access: TokenKeys,
	refresh: TokenKeys,
}
impl TokenService {
	/// Builds the service from a validated configuration.
	pub fn from_config(config: &AuthConfig) -> Self {
		Self {
			access: TokenKeys::new(TokenKind::Access, &config.access),
			refresh: TokenKeys::new(TokenKind::Refresh, &config.refresh),
		}
	}

	fn keys(&self, kind: TokenKind) -> &TokenKeys {
		match kind {
			TokenKind::Access => &self.access,
			TokenKind::Refresh => &self.refresh,
		}
	}

	/// Default lifetime configured for a token class.
	pub fn lifetime(&self, kind: TokenKind) -> Duration {
		self.keys(kind).lifetime
	}

	/// Signs `claims` with an `exp` of now plus `duration` (or the class default).
	pub fn issue_token(
		&self,
		kind: TokenKind,
		claims: Claims,
		duration: Option<Duration>,
	) -> Result<BearerToken> {
		self.issue_token_at(kind, claims, duration, OffsetDateTime::now_utc())
	}

	/// Same as [`issue_token`](Self::issue_token) with an explicit issuance instant.
	///
	/// Any `exp` claim supplied by the caller is overwritten.
	pub fn issue_token_at(
		&self,
		kind: TokenKind,
		mut claims: Claims,
		duration: Option<Duration>,
		now: OffsetDateTime,
	) -> Result<BearerToken> {
		let keys = self.keys(kind);
		let _span = OpSpan::new(AuthOp::Issue, kind.as_str()).entered();

		let expires_at = now
			.checked_add(duration.unwrap_or(keys.lifetime))
			.ok_or(Error::ExpiryOutOfRange)?;

		claims.set_expiry(expires_at);

		match jsonwebtoken::encode(&Header::new(keys.algorithm), &claims, &keys.encoding) {
			Ok(token) => {
				obs::record_op_outcome(AuthOp::Issue, OpOutcome::Success);

				Ok(BearerToken::new(token))
			},
			Err(source) => {
				obs::record_op_outcome(AuthOp::Issue, OpOutcome::Failure);

				Err(ConfigError::Signing { source }.into())
			},
		}
	}

	/// Verifies `token` against the current clock and returns its claims.
	pub fn verify_token(&self, kind: TokenKind, token: &str) -> Result<Claims, InvalidToken> {
		self.verify_token_at(kind, token, OffsetDateTime::now_utc())
	}

	/// Verifies `token` as of `now`.
	///
	/// The token is valid iff its signature matches this class's secret and algorithm and `now`
	/// is strictly before the encoded `exp`.
	pub fn verify_token_at(
		&self,
		kind: TokenKind,
		token: &str,
		now: OffsetDateTime,
	) -> Result<Claims, InvalidToken> {
		let keys = self.keys(kind);
		let _span = OpSpan::new(AuthOp::Verify, kind.as_str()).entered();
		let result = Self::decode(keys, token, now);

		match &result {
			Ok(_) => obs::record_op_outcome(AuthOp::Verify, OpOutcome::Success),
			Err(invalid) => {
				obs::log_token_rejected(kind.as_str(), invalid.reason().as_str());
				obs::record_op_outcome(AuthOp::Verify, OpOutcome::Failure);
			},
		}

		result
	}

	fn decode(
		keys: &TokenKeys,
		token: &str,
		now: OffsetDateTime,
	) -> Result<Claims, InvalidToken> {
		let claims =
			jsonwebtoken::decode::<Claims>(token, &keys.decoding, &keys.validation)?.claims;
		let expires_at =
			claims.expires_at().ok_or(InvalidToken::new(InvalidTokenReason::Malformed))?;

		if now >= expires_at {
			return Err(InvalidToken::new(InvalidTokenReason::Expired));
		}

		Ok(claims)
	}

	/// Issues an access + refresh pair whose only caller claim is `sub`.
	pub fn issue_pair(&self, subject: &Username) -> Result<TokenPair> {
		self.issue_pair_at(subject, OffsetDateTime::now_utc())
	}

	/// Same as [`issue_pair`](Self::issue_pair) with an explicit issuance instant.
	pub fn issue_pair_at(&self, subject: &Username, now: OffsetDateTime) -> Result<TokenPair> {
		let claims = Claims::for_subject(subject.to_string());
		let access_token = self.issue_token_at(TokenKind::Access, claims.clone(), None, now)?;
		let refresh_token = self.issue_token_at(TokenKind::Refresh, claims, None, now)?;

		Ok(TokenPair { access_token, refresh_token, token_type: "bearer".into() })
	}

	/// Exchanges a refresh token for a new access token carrying the same `sub`.
	pub fn refresh_access(&self, refresh_token: &str) -> Result<BearerToken> {
		self.refresh_access_at(refresh_token, OffsetDateTime::now_utc())
	}

	/// Same as [`refresh_access`](Self::refresh_access) with an explicit instant.
	pub fn refresh_access_at(
		&self,
		refresh_token: &str,
		now: OffsetDateTime,
	) -> Result<BearerToken> {
		let claims = self.verify_token_at(TokenKind::Refresh, refresh_token, now)?;
		let subject =
			claims.subject().ok_or(InvalidToken::new(InvalidTokenReason::Malformed))?;

		self.issue_token_at(TokenKind::Access, Claims::for_subject(subject), None, now)
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;
	use crate::auth::SigningSecret;

	fn service() -> TokenService {
		let config = AuthConfig::builder(
			SigningSecret::new("unit-access-secret"),
			SigningSecret::new("unit-refresh-secret"),
		)
		.build()
		.expect("Unit test configuration should build.");

		TokenService::from_config(&config)
	}

	#[test]
	fn round_trip_adds_only_expiry() {
		let service = service();
		let issued = macros::datetime!(2025-01-01 00:00 UTC);
		let claims = Claims::for_subject("isfar").with("role", "reader");
		let token = service
			.issue_token_at(TokenKind::Access, claims.clone(), None, issued)
			.expect("Issuing should succeed.");
		let verified = service
			.verify_token_at(TokenKind::Access, token.expose(), issued + Duration::minutes(29))
			.expect("Token should verify inside its lifetime.");

		assert_eq!(verified, claims.with("exp", 1_735_691_400_i64));
	}

	#[test]
	fn header_names_the_algorithm() {
		let token = service()
			.issue_token(TokenKind::Access, Claims::for_subject("a"), None)
			.expect("Issuing should succeed.");
		let header = jsonwebtoken::decode_header(token.expose()).expect("Header should decode.");

		assert_eq!(header.alg, Algorithm::HS256);
		assert_eq!(token.expose().split('.').count(), 3);
	}

	#[test]
	fn expiry_boundary_is_exclusive() {
		let service = service();
		let issued = macros::datetime!(2025-01-01 00:00 UTC);
		let token = service
			.issue_token_at(TokenKind::Access, Claims::new(), Some(Duration::seconds(10)), issued)
			.expect("Issuing should succeed.");

		assert!(service.verify_token_at(TokenKind::Access, token.expose(), issued).is_ok());

		let err = service
			.verify_token_at(TokenKind::Access, token.expose(), issued + Duration::seconds(10))
			.expect_err("Token must be invalid at its expiry instant.");

		assert_eq!(err.reason(), InvalidTokenReason::Expired);
	}

	#[test]
	fn missing_expiry_is_malformed() {
		let service = service();
		let raw = jsonwebtoken::encode(
			&Header::new(Algorithm::HS256),
			&Claims::for_subject("no-exp"),
			&EncodingKey::from_secret(b"unit-access-secret"),
		)
		.expect("Raw token should encode.");
		let err = service
			.verify_token(TokenKind::Access, &raw)
			.expect_err("Tokens without exp must be rejected.");

		assert_eq!(err.reason(), InvalidTokenReason::Malformed);
	}

	#[test]
	fn unrepresentable_expiry_is_reported() {
		let err = service()
			.issue_token_at(
				TokenKind::Access,
				Claims::new(),
				Some(Duration::MAX),
				macros::datetime!(2025-01-01 00:00 UTC),
			)
			.expect_err("An expiry beyond the supported range must be rejected.");

		assert!(matches!(err, Error::ExpiryOutOfRange));
	}

	#[test]
	fn garbage_is_malformed() {
		let err = service()
			.verify_token(TokenKind::Access, "not-a-token")
			.expect_err("Garbage must be rejected.");

		assert_eq!(err.reason(), InvalidTokenReason::Malformed);
	}

	#[test]
	fn refresh_preserves_subject_and_drops_extra_claims() {
		let service = service();
		let now = macros::datetime!(2025-06-01 12:00 UTC);
		let refresh = service
			.issue_token_at(
				TokenKind::Refresh,
				Claims::for_subject("isfar").with("scope", "all"),
				None,
				now,
			)
			.expect("Refresh token should issue.");
		let access = service
			.refresh_access_at(refresh.expose(), now + Duration::days(1))
			.expect("Refresh exchange should succeed.");
		let claims = service
			.verify_token_at(TokenKind::Access, access.expose(), now + Duration::days(1))
			.expect("New access token should verify.");

		assert_eq!(claims.subject(), Some("isfar"));
		assert_eq!(claims.get("scope"), None);
		assert_eq!(claims.expires_at(), Some(now + Duration::days(1) + Duration::minutes(30)));
	}

	#[test]
	fn refresh_without_subject_is_rejected() {
		let service = service();
		let refresh = service
			.issue_token(TokenKind::Refresh, Claims::new(), None)
			.expect("Refresh token should issue.");
		let err = service
			.refresh_access(refresh.expose())
			.expect_err("A refresh token without sub must be rejected.");

		assert!(matches!(err, Error::InvalidToken(_)));
	}
}
