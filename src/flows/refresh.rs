//! Refresh-token exchange and API-key authentication.

// self
use crate::{
	_prelude::*,
	auth::{ApiKey, BearerToken, Username},
	flows::Authenticator,
	obs::{self, AuthOp, OpOutcome, OpSpan},
};

impl Authenticator {
	/// Exchanges a valid refresh token for a new access token with the same `sub`.
	pub async fn refresh(&self, refresh_token: &str) -> Result<BearerToken> {
		const OP: AuthOp = AuthOp::Refresh;

		let _span = OpSpan::new(OP, "refresh").entered();

		obs::record_op_outcome(OP, OpOutcome::Attempt);

		match self.tokens.refresh_access(refresh_token) {
			Ok(token) => {
				self.metrics.record_refresh();
				obs::record_op_outcome(OP, OpOutcome::Success);

				Ok(token)
			},
			Err(e) => {
				self.metrics.record_refresh_failure();
				obs::record_op_outcome(OP, OpOutcome::Failure);

				Err(e)
			},
		}
	}

	/// Resolves the user who was issued `api_key`.
	///
	/// Keys are looked up by fingerprint; an unknown key yields [`Error::InvalidCredentials`].
	pub async fn authenticate_api_key(&self, api_key: &str) -> Result<Username> {
		const OP: AuthOp = AuthOp::ApiKey;

		let span = OpSpan::new(OP, "authenticate_api_key");

		obs::record_op_outcome(OP, OpOutcome::Attempt);

		let fingerprint = ApiKey::new(api_key).fingerprint();
		let result = span
			.instrument(async move {
				self.store
					.fetch_by_api_key(&fingerprint)
					.await?
					.map(|record| record.username)
					.ok_or(Error::InvalidCredentials)
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
	use crate::{_preludet::*, auth::TokenKind, flows::Registration};

	#[tokio::test]
	async fn refresh_issues_access_token_for_same_subject() {
		let (authenticator, _) = build_test_authenticator();

		authenticator
			.register(Registration::new("isfar", "hunter2"))
			.await
			.expect("Registration should succeed.");

		let pair = authenticator.login("isfar", "hunter2").await.expect("Login should succeed.");
		let access = authenticator
			.refresh(pair.refresh_token.expose())
			.await
			.expect("Refresh should succeed.");
		let claims = authenticator
			.tokens
			.verify_token(TokenKind::Access, access.expose())
			.expect("Refreshed access token should verify.");

		assert_eq!(claims.subject(), Some("isfar"));
		assert_eq!(authenticator.metrics.refreshes(), 1);
	}

	#[tokio::test]
	async fn access_token_cannot_be_used_to_refresh() {
		let (authenticator, _) = build_test_authenticator();

		authenticator
			.register(Registration::new("isfar", "hunter2"))
			.await
			.expect("Registration should succeed.");

		let pair = authenticator.login("isfar", "hunter2").await.expect("Login should succeed.");
		let err = authenticator
			.refresh(pair.access_token.expose())
			.await
			.expect_err("Access tokens must not verify as refresh tokens.");

		assert!(matches!(err, Error::InvalidToken(_)));
		assert_eq!(authenticator.metrics.refresh_failures(), 1);
	}

	#[tokio::test]
	async fn api_key_resolves_to_its_owner() {
		let (authenticator, _) = build_test_authenticator();
		let registered = authenticator
			.register(Registration::new("isfar", "hunter2"))
			.await
			.expect("Registration should succeed.");
		let username = authenticator
			.authenticate_api_key(registered.api_key.expose())
			.await
			.expect("Issued API key should authenticate.");

		assert_eq!(username, registered.username);

		let err = authenticator
			.authenticate_api_key("not-a-real-key")
			.await
			.expect_err("Unknown API keys must be rejected.");

		assert!(matches!(err, Error::InvalidCredentials));
	}
}
