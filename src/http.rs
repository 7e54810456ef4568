//! Transport primitives for OAuth token exchanges.
//!
//! [`TokenHttpClient`] is the crate's only dependency on an HTTP stack. Implementations issue
//! one form-encoded POST per call, enforce a bounded timeout, and hand the raw status and body
//! back so the exchange engine owns every protocol decision.

// std
#[cfg(feature = "reqwest")]
use std::{ops::Deref, time::Duration};
// crates.io
#[cfg(feature = "reqwest")] use reqwest::redirect::Policy;
// self
use crate::{_prelude::*, error::TokenExchangeError};
#[cfg(feature = "reqwest")] use crate::error::ConfigError;

/// Future type returned by [`TokenHttpClient`] implementations.
pub type TransportFuture<'a, T> =
	Pin<Box<dyn Future<Output = Result<T, TokenExchangeError>> + 'a + Send>>;

/// Raw token-endpoint response handed back to the exchange engine.
#[derive(Clone, Debug)]
pub struct TokenEndpointResponse {
	/// HTTP status code returned by the token endpoint.
	pub status: u16,
	/// Raw response body.
	pub body: Vec<u8>,
}
impl TokenEndpointResponse {
	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Abstraction over HTTP transports capable of executing token-endpoint requests.
///
/// Callers provide an implementation (typically behind `Arc<T>`) and the exchange engine
/// issues one `POST` with an `application/x-www-form-urlencoded` body per operation.
/// Implementations map transport-level failures (timeout, connection, TLS) into
/// [`TokenExchangeError`] themselves so the engine stays HTTP-stack agnostic, and must be
/// `Send + Sync + 'static` so one transport can be shared across clients and registries.
pub trait TokenHttpClient
where
	Self: 'static + Send + Sync,
{
	/// Sends `form` to `url` as a form-encoded POST request.
	fn post_form<'a>(
		&'a self,
		url: &'a Url,
		form: &'a BTreeMap<String, String>,
	) -> TransportFuture<'a, TokenEndpointResponse>;
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Token requests do not follow redirects, matching OAuth 2.0 guidance that token endpoints
/// return results directly instead of delegating to another URI. Clients passed through
/// [`with_client`](Self::with_client) should disable redirect following as well.
#[cfg(feature = "reqwest")]
#[derive(Clone)]
pub struct ReqwestHttpClient(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestHttpClient {
	/// Timeout applied to token-endpoint calls unless overridden.
	pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

	/// Builds a client with [`DEFAULT_TIMEOUT`](Self::DEFAULT_TIMEOUT).
	pub fn new() -> Result<Self, ConfigError> {
		Self::with_timeout(Self::DEFAULT_TIMEOUT)
	}

	/// Builds a client with a custom per-request timeout.
	pub fn with_timeout(timeout: Duration) -> Result<Self, ConfigError> {
		let client = ReqwestClient::builder().timeout(timeout).redirect(Policy::none()).build()?;

		Ok(Self(client))
	}

	/// Wraps an existing [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl TokenHttpClient for ReqwestHttpClient {
	fn post_form<'a>(
		&'a self,
		url: &'a Url,
		form: &'a BTreeMap<String, String>,
	) -> TransportFuture<'a, TokenEndpointResponse> {
		let client = self.0.clone();
		let url = url.clone();

		Box::pin(async move {
			let response =
				client.post(url).form(form).send().await.map_err(map_reqwest_error)?;
			let status = response.status().as_u16();
			let body = response.bytes().await.map_err(map_reqwest_error)?.to_vec();

			Ok(TokenEndpointResponse { status, body })
		})
	}
}

#[cfg(feature = "reqwest")]
fn map_reqwest_error(error: ReqwestError) -> TokenExchangeError {
	if error.is_timeout() {
		TokenExchangeError::Timeout
	} else {
		TokenExchangeError::network(error)
	}
}
