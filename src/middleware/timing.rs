//! Measures handler latency and reports it in logs and a response header.

// std
use std::{
	task::{Context, Poll},
	time::Instant,
};
// crates.io
use http::{HeaderName, HeaderValue, Request, Response};
use tower::{Layer, Service};
// self
use crate::{_prelude::*, middleware::ResponseFuture, obs};

/// Response header carrying the handler latency in milliseconds.
pub const PROCESS_TIME_HEADER: &str = "x-process-time-ms";

/// [`Layer`] that times every request.
#[derive(Clone, Copy, Debug, Default)]
pub struct RequestTimerLayer;
impl<S> Layer<S> for RequestTimerLayer {
	type Service = RequestTimer<S>;

	fn layer(&self, inner: S) -> Self::Service {
		RequestTimer { inner }
	}
}

/// Service produced by [`RequestTimerLayer`].
#[derive(Clone, Debug)]
pub struct RequestTimer<S> {
	inner: S,
}
impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for RequestTimer<S>
where
	S: Service<Request<ReqBody>, Response = Response<ResBody>>,
	S::Future: Send + 'static,
{
	type Error = S::Error;
	type Future = ResponseFuture<Self::Response, Self::Error>;
	type Response = Response<ResBody>;

	fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
		self.inner.poll_ready(cx)
	}

	fn call(&mut self, request: Request<ReqBody>) -> Self::Future {
		let method = request.method().to_string();
		let uri = request.uri().to_string();
		let started = Instant::now();
		let fut = self.inner.call(request);

		Box::pin(async move {
			let mut response = fut.await?;
			let elapsed_ms = started.elapsed().as_secs_f64() * 1_000.;

			obs::log_request_timing(&method, &uri, response.status().as_u16(), elapsed_ms);

			if let Ok(value) = HeaderValue::from_str(&format!("{elapsed_ms:.3}")) {
				let name = HeaderName::from_static(PROCESS_TIME_HEADER);

				response.headers_mut().insert(name, value);
			}

			Ok(response)
		})
	}
}
