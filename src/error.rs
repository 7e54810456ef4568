//! Client-level error types shared across flows, providers, and stores.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Token-endpoint call failed.
	#[error(transparent)]
	Exchange(#[from] TokenExchangeError),
	/// Registry lookup by an unknown provider name.
	#[error(transparent)]
	ProviderNotFound(#[from] ProviderNotFoundError),
}

/// Configuration and validation failures raised by the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Provider descriptor failed validation.
	#[error(transparent)]
	Descriptor(#[from] crate::provider::ProviderDescriptorError),
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Failure surfaced by the token endpoint, the response normalizer, or the transport layer.
///
/// Endpoint and format failures keep the HTTP status and raw body around so callers can log
/// provider-specific diagnostics; nothing is retried on their behalf.
#[derive(Debug, ThisError)]
pub enum TokenExchangeError {
	/// Token endpoint returned a non-2xx status.
	#[error("Token endpoint returned HTTP {status}: {body}.")]
	Endpoint {
		/// HTTP status code returned by the token endpoint.
		status: u16,
		/// Raw response body kept for diagnostics.
		body: String,
	},
	/// Response body parsed as neither JSON nor a form-urlencoded query string.
	#[error("Invalid response format from token endpoint: {body}.")]
	InvalidResponseFormat {
		/// Raw response body kept for diagnostics.
		body: String,
	},
	/// Token endpoint did not answer within the configured timeout.
	#[error("Token endpoint did not respond within the configured timeout.")]
	Timeout,
	/// Transport failure (DNS, TCP, TLS).
	#[error("Network error occurred while calling the token endpoint.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TokenExchangeError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}

	/// HTTP status code carried by the error, when the endpoint answered at all.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Endpoint { status, .. } => Some(*status),
			_ => None,
		}
	}

	/// Raw response body carried by the error, when one was received.
	pub fn body(&self) -> Option<&str> {
		match self {
			Self::Endpoint { body, .. } | Self::InvalidResponseFormat { body } => Some(body),
			_ => None,
		}
	}
}

/// Registry lookup failed because the provider name is unregistered.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
#[error("Provider `{name}` is not registered.")]
pub struct ProviderNotFoundError {
	/// Name that was looked up.
	pub name: String,
}
