// self
use crate::{_prelude::*, obs::AuthOp};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedOp<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedOp<F> = F;

/// A span builder used by crate operations.
#[derive(Clone, Debug)]
pub struct OpSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl OpSpan {
	/// Creates a new span tagged with the provided operation + stage.
	pub fn new(op: AuthOp, stage: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("tokengate.op", op = op.as_str(), stage);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (op, stage);

			Self {}
		}
	}

	/// Enters the span for synchronous sections.
	pub fn entered(self) -> OpSpanGuard {
		#[cfg(feature = "tracing")]
		{
			OpSpanGuard { guard: self.span.entered() }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = self;

			OpSpanGuard {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedOp<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// RAII guard returned by [`OpSpan::entered`].
pub struct OpSpanGuard {
	#[cfg(feature = "tracing")]
	#[allow(dead_code)]
	guard: tracing::span::EnteredSpan,
}
impl Debug for OpSpanGuard {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("OpSpanGuard(..)")
	}
}

/// Logs a rejected token with its diagnostic cause. Token material is never logged.
pub fn log_token_rejected(kind: &'static str, reason: &'static str) {
	#[cfg(feature = "tracing")]
	{
		tracing::debug!(kind, reason, "token rejected");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (kind, reason);
	}
}

/// Logs a throttled client together with the advised backoff.
pub fn log_rate_limited(client: &str, backoff_ms: i64) {
	#[cfg(feature = "tracing")]
	{
		tracing::info!(client, backoff_ms, "rate limit exceeded");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (client, backoff_ms);
	}
}

/// Logs the latency of one handled request.
pub fn log_request_timing(method: &str, uri: &str, status: u16, elapsed_ms: f64) {
	#[cfg(feature = "tracing")]
	{
		tracing::info!(method, uri, status, elapsed_ms, "request processed");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = (method, uri, status, elapsed_ms);
	}
}

/// Logs a stored password digest that could not be parsed.
pub fn log_malformed_digest(message: &str) {
	#[cfg(feature = "tracing")]
	{
		tracing::warn!(error = message, "stored password digest is malformed");
	}
	#[cfg(not(feature = "tracing"))]
	{
		let _ = message;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn op_span_guard_exists_with_or_without_tracing() {
		let _guard = OpSpan::new(AuthOp::Verify, "test").entered();
	}

	#[tokio::test]
	async fn instrument_wraps_future() {
		let span = OpSpan::new(AuthOp::Login, "instrument_wraps_future");
		let value = span.instrument(async { 42 }).await;

		assert_eq!(value, 42);
	}
}
