//! Rejects requests from clients that exceed their rate limit with `429 Too Many Requests`.

// std
use std::task::{Context, Poll};
// crates.io
use http::{HeaderValue, Request, Response, StatusCode, header::RETRY_AFTER};
use tower::{Layer, Service};
// self
use crate::{
	_prelude::*,
	config::RateLimitConfig,
	middleware::{self, ResponseFuture},
	rate_limit::{
		RateLimitContext, RateLimitDecision, RateLimitPolicy, RetryDirective, SlidingWindowLimiter,
	},
};

const RATE_LIMIT_ERROR: &str = "Rate limit exceeded";
const RATE_LIMIT_MESSAGE: &str =
	"You have exceeded the allowed number of requests. Please try again later.";

/// [`Layer`] that consults a [`RateLimitPolicy`] before every request.
#[derive(Debug)]
pub struct RateLimitLayer<P>
where
	P: ?Sized,
{
	policy: Arc<P>,
}
impl RateLimitLayer<SlidingWindowLimiter> {
	/// Builds a layer backed by a fresh [`SlidingWindowLimiter`].
	pub fn from_config(config: &RateLimitConfig) -> Self {
		Self::new(Arc::new(SlidingWindowLimiter::new(config)))
	}
}
impl<P> RateLimitLayer<P>
where
	P: ?Sized + RateLimitPolicy,
{
	/// Wraps a shared policy; clones of the layer count against the same state.
	pub fn new(policy: Arc<P>) -> Self {
		Self { policy }
	}

	/// Policy consulted by this layer.
	pub fn policy(&self) -> &Arc<P> {
		&self.policy
	}
}
impl<P> Clone for RateLimitLayer<P>
where
	P: ?Sized,
{
	fn clone(&self) -> Self {
		Self { policy: self.policy.clone() }
	}
}
impl<S, P> Layer<S> for RateLimitLayer<P>
where
	P: ?Sized,
{
	type Service = RateLimit<S, P>;

	fn layer(&self, inner: S) -> Self::Service {
		RateLimit { inner, policy: self.policy.clone() }
	}
}

/// Service produced by [`RateLimitLayer`].
#[derive(Debug)]
pub struct RateLimit<S, P>
where
	P: ?Sized,
{
	inner: S,
	policy: Arc<P>,
}
impl<S, P> Clone for RateLimit<S, P>
where
	S: Clone,
	P: ?Sized,
{
	fn clone(&self) -> Self {
		Self { inner: self.inner.clone(), policy: self.policy.clone() }
	}
}
impl<S, P, ReqBody, ResBody> Service<Request<ReqBody>> for RateLimit<S, P>
where
	S: Service<Request<ReqBody>, Response = Response<ResBody>>,
	S::Future: Send + 'static,
	S::Error: Send + 'static,
	P: ?Sized + RateLimitPolicy,
	ResBody: From<String> + Send + 'static,
{
	type Error = S::Error;
	type Future = ResponseFuture<Self::Response, Self::Error>;
	type Response = Response<ResBody>;

	fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
		self.inner.poll_ready(cx)
	}

	fn call(&mut self, request: Request<ReqBody>) -> Self::Future {
		let context = RateLimitContext::new(middleware::client_key(&request));

		match self.policy.evaluate(&context) {
			RateLimitDecision::Allow => Box::pin(self.inner.call(request)),
			RateLimitDecision::Delay(directive) => {
				let response = too_many_requests(&directive);

				Box::pin(async move { Ok(response) })
			},
		}
	}
}

/// Builds the `429` response advertised for a rejected request.
pub fn too_many_requests<B>(directive: &RetryDirective) -> Response<B>
where
	B: From<String>,
{
	let mut response = middleware::json_response(
		StatusCode::TOO_MANY_REQUESTS,
		&serde_json::json!({ "error": RATE_LIMIT_ERROR, "message": RATE_LIMIT_MESSAGE }),
	);

	response.headers_mut().insert(RETRY_AFTER, HeaderValue::from(directive.retry_after_secs()));

	response
}
