//! Requires a valid access token in the `Authorization` header.

// std
use std::task::{Context, Poll};
// crates.io
use http::{
	HeaderValue, Request, Response, StatusCode,
	header::{AUTHORIZATION, WWW_AUTHENTICATE},
};
use tower::{Layer, Service};
// self
use crate::{
	_prelude::*,
	auth::{BearerToken, TokenKind, TokenService},
	middleware::{self, ResponseFuture},
};

const UNAUTHORIZED_DETAIL: &str = "Invalid or expired token";

/// [`Layer`] that verifies `Authorization: Bearer <token>` as an access token.
///
/// On success the verified [`Claims`](crate::auth::Claims) are inserted into the request
/// extensions before the inner service runs.
#[derive(Clone, Debug)]
pub struct RequireBearerLayer {
	tokens: Arc<TokenService>,
}
impl RequireBearerLayer {
	/// Creates a layer verifying tokens with `tokens`.
	pub fn new(tokens: Arc<TokenService>) -> Self {
		Self { tokens }
	}
}
impl<S> Layer<S> for RequireBearerLayer {
	type Service = RequireBearer<S>;

	fn layer(&self, inner: S) -> Self::Service {
		RequireBearer { inner, tokens: self.tokens.clone() }
	}
}

/// Service produced by [`RequireBearerLayer`].
#[derive(Clone, Debug)]
pub struct RequireBearer<S> {
	inner: S,
	tokens: Arc<TokenService>,
}
impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for RequireBearer<S>
where
	S: Service<Request<ReqBody>, Response = Response<ResBody>>,
	S::Future: Send + 'static,
	S::Error: Send + 'static,
	ResBody: From<String> + Send + 'static,
{
	type Error = S::Error;
	type Future = ResponseFuture<Self::Response, Self::Error>;
	type Response = Response<ResBody>;

	fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
		self.inner.poll_ready(cx)
	}

	fn call(&mut self, mut request: Request<ReqBody>) -> Self::Future {
		let claims = request
			.headers()
			.get(AUTHORIZATION)
			.and_then(|value| value.to_str().ok())
			.and_then(BearerToken::from_authorization)
			.and_then(|token| self.tokens.verify_token(TokenKind::Access, token.expose()).ok());

		match claims {
			Some(claims) => {
				request.extensions_mut().insert(claims);

				Box::pin(self.inner.call(request))
			},
			None => {
				let response = unauthorized();

				Box::pin(async move { Ok(response) })
			},
		}
	}
}

/// Builds the `401` response returned for a missing or invalid token.
pub fn unauthorized<B>() -> Response<B>
where
	B: From<String>,
{
	let mut response = middleware::json_response(
		StatusCode::UNAUTHORIZED,
		&serde_json::json!({ "detail": UNAUTHORIZED_DETAIL }),
	);

	response.headers_mut().insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));

	response
}
