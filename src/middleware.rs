//! Tower layers that guard an HTTP service: per-client rate limiting, bearer-token checks, and
//! request timing.
//!
//! Every layer wraps a `Service<http::Request<ReqBody>>` whose response is
//! `http::Response<ResBody>` with `ResBody: From<String>`, so rejections can be produced without
//! knowing the concrete body type.

pub mod bearer;
pub mod rate_limit;
pub mod timing;

pub use bearer::*;
pub use rate_limit::*;
pub use timing::*;

// std
use std::net::SocketAddr;
// crates.io
use http::{HeaderValue, Request, Response, StatusCode, header::CONTENT_TYPE};
// self
use crate::{_prelude::*, auth::ClientKey};

/// Boxed response future shared by the crate's middleware services.
pub type ResponseFuture<T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send>>;

/// Peer address of the connection a request arrived on.
///
/// Server adapters insert it as a request extension; the rate limiter keys on its IP.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ClientAddr(pub SocketAddr);

/// Client key for `request`: the peer IP when known, otherwise the shared `unknown` key.
pub fn client_key<B>(request: &Request<B>) -> ClientKey {
	request
		.extensions()
		.get::<ClientAddr>()
		.map(|ClientAddr(addr)| ClientKey::from(addr.ip()))
		.unwrap_or_else(ClientKey::unknown)
}

fn json_response<B>(status: StatusCode, body: &JsonValue) -> Response<B>
where
	B: From<String>,
{
	let mut response = Response::new(B::from(body.to_string()));

	*response.status_mut() = status;
	response.headers_mut().insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

	response
}

#[cfg(test)]
mod tests {
	// std
	use std::net::{IpAddr, Ipv4Addr};
	// self
	use super::*;

	#[test]
	fn client_key_prefers_peer_ip() {
		let mut request = Request::new(());

		assert_eq!(client_key(&request), ClientKey::unknown());

		request
			.extensions_mut()
			.insert(ClientAddr(SocketAddr::new(IpAddr::V4(Ipv4Addr::new(10, 0, 0, 7)), 4321)));

		assert_eq!(&*client_key(&request), "10.0.0.7");
	}

	#[test]
	fn json_response_sets_status_and_content_type() {
		let response: Response<String> =
			json_response(StatusCode::IM_A_TEAPOT, &serde_json::json!({ "a": 1 }));

		assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
		assert_eq!(response.headers()[CONTENT_TYPE], "application/json");
		assert_eq!(response.body(), "{\"a\":1}");
	}
}
