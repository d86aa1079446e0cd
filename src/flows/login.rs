//! Username/password login issuing an access + refresh token pair.

// self
use crate::{
	_prelude::*,
	auth::{TokenPair, Username},
	flows::Authenticator,
	obs::{self, AuthOp, OpOutcome, OpSpan},
};

impl Authenticator {
	/// Verifies credentials and issues a token pair whose `sub` is the username.
	///
	/// An unknown username, a malformed username, and a wrong password all produce
	/// [`Error::InvalidCredentials`]. The password is always checked against some digest so the
	/// three cases cost the same.
	pub async fn login(&self, username: &str, password: &str) -> Result<TokenPair> {
		const OP: AuthOp = AuthOp::Login;

		let span = OpSpan::new(OP, "login");

		obs::record_op_outcome(OP, OpOutcome::Attempt);
		self.metrics.record_login_attempt();

		let result = span
			.instrument(async move {
				let record = match Username::new(username) {
					Ok(username) => self.store.fetch(&username).await?,
					Err(_) => None,
				};
				let Some(record) = record else {
					self.hasher.verify(password, &self.dummy_digest);

					return Err(Error::InvalidCredentials);
				};

				if !self.hasher.verify(password, &record.password_digest) {
					return Err(Error::InvalidCredentials);
				}

				self.tokens.issue_pair(&record.username)
			})
			.await;

		match &result {
			Ok(_) => {
				self.metrics.record_login_success();
				obs::record_op_outcome(OP, OpOutcome::Success);
			},
			Err(_) => {
				self.metrics.record_login_failure();
				obs::record_op_outcome(OP, OpOutcome::Failure);
			},
		}

		result
	}
}
