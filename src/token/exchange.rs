//! Token-endpoint requests and dual-format response normalization.
//!
//! Provider token endpoints are inconsistent: most answer with a JSON body, while some
//! (GitHub among them) answer with a form-urlencoded query string even on success. The engine
//! tries JSON first, falls back to the query-string form, and fails only when neither yields a
//! usable mapping.

// crates.io
use serde_json::Value as JsonValue;
// self
use crate::{
	_prelude::*,
	error::TokenExchangeError,
	http::TokenHttpClient,
	provider::ProviderDescriptor,
	token::{TokenRecord, TokenValue},
};
#[cfg(feature = "reqwest")]
use crate::{error::ConfigError, http::ReqwestHttpClient};

/// Record key carrying the absolute expiry stamp computed by the engine.
pub const EXPIRES_AT: &str = "expires_at";

/// Performs token-endpoint requests for a single provider descriptor.
///
/// Each operation issues exactly one form-encoded POST to the descriptor's token endpoint and
/// either returns a normalized [`TokenRecord`] or fails; no retries, no intermediate states.
pub struct TokenExchanger<C>
where
	C: ?Sized + TokenHttpClient,
{
	descriptor: ProviderDescriptor,
	http_client: Arc<C>,
}
impl<C> TokenExchanger<C>
where
	C: ?Sized + TokenHttpClient,
{
	/// Creates an exchanger that reuses the caller-provided transport.
	pub fn with_http_client(
		descriptor: ProviderDescriptor,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		Self { descriptor, http_client: http_client.into() }
	}

	/// Descriptor the exchanger is bound to.
	pub fn descriptor(&self) -> &ProviderDescriptor {
		&self.descriptor
	}

	/// Exchanges an authorization code for a token record.
	///
	/// The `state` parameter is accepted so callers can thread the callback value through for
	/// their own CSRF validation; it is never sent to the token endpoint.
	pub async fn exchange_code(
		&self,
		code: &str,
		_state: Option<&str>,
	) -> Result<TokenRecord, TokenExchangeError> {
		let mut form = self.base_form();

		form.insert("grant_type".into(), "authorization_code".into());
		form.insert("code".into(), code.into());
		form.insert("redirect_uri".into(), self.descriptor.redirect_uri.to_string());

		self.request(form).await
	}

	/// Trades a refresh token for a fresh token record.
	pub async fn refresh(&self, refresh_token: &str) -> Result<TokenRecord, TokenExchangeError> {
		let mut form = self.base_form();

		form.insert("grant_type".into(), "refresh_token".into());
		form.insert("refresh_token".into(), refresh_token.into());

		self.request(form).await
	}

	fn base_form(&self) -> BTreeMap<String, String> {
		BTreeMap::from_iter([
			("client_id".into(), self.descriptor.client_id.clone()),
			("client_secret".into(), self.descriptor.client_secret.clone()),
		])
	}

	async fn request(
		&self,
		form: BTreeMap<String, String>,
	) -> Result<TokenRecord, TokenExchangeError> {
		let response = self.http_client.post_form(&self.descriptor.token_url, &form).await?;

		if !response.is_success() {
			return Err(TokenExchangeError::Endpoint {
				status: response.status,
				body: String::from_utf8_lossy(&response.body).into_owned(),
			});
		}

		normalize_token_response(&response.body, OffsetDateTime::now_utc().unix_timestamp())
	}
}
#[cfg(feature = "reqwest")]
impl TokenExchanger<ReqwestHttpClient> {
	/// Creates an exchanger with a fresh reqwest transport using the default timeout.
	pub fn new(descriptor: ProviderDescriptor) -> Result<Self, ConfigError> {
		Ok(Self::with_http_client(descriptor, ReqwestHttpClient::new()?))
	}
}
impl<C> Debug for TokenExchanger<C>
where
	C: ?Sized + TokenHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenExchanger").field("descriptor", &self.descriptor).finish()
	}
}

/// Normalizes a token-endpoint response body into a [`TokenRecord`].
///
/// The body is parsed as JSON first and as a form-urlencoded query string second. When the
/// resulting record reports `expires_in` (integer or numeric string), an absolute `expires_at`
/// stamp of `issued_at` plus the relative expiry is inserted; records without `expires_in`
/// gain no stamp. Bodies that yield an empty mapping under both readings are rejected.
pub fn normalize_token_response(
	body: &[u8],
	issued_at: i64,
) -> Result<TokenRecord, TokenExchangeError> {
	let mut record = parse_json_object(body).or_else(|| parse_query_string(body)).ok_or_else(
		|| TokenExchangeError::InvalidResponseFormat {
			body: String::from_utf8_lossy(body).into_owned(),
		},
	)?;

	if let Some(expires_in) = record.expires_in() {
		record.insert(EXPIRES_AT, TokenValue::Integer(issued_at + expires_in));
	}

	Ok(record)
}

fn parse_json_object(body: &[u8]) -> Option<TokenRecord> {
	let JsonValue::Object(object) = serde_json::from_slice(body).ok()? else {
		return None;
	};
	let record: TokenRecord = object
		.into_iter()
		.filter_map(|(key, value)| Some((key, scalarize(value)?)))
		.collect();

	(!record.is_empty()).then_some(record)
}

fn parse_query_string(body: &[u8]) -> Option<TokenRecord> {
	let record: TokenRecord = url::form_urlencoded::parse(body)
		.map(|(key, value)| (key.into_owned(), TokenValue::String(value.into_owned())))
		.collect();

	(!record.is_empty()).then_some(record)
}

/// Collapses a JSON member into a [`TokenValue`] scalar.
///
/// Non-scalar members keep their serialized JSON text so no provider data is dropped; `null`
/// members carry nothing and are skipped instead of being fabricated into text.
fn scalarize(value: JsonValue) -> Option<TokenValue> {
	match value {
		JsonValue::Null => None,
		JsonValue::Bool(value) => Some(TokenValue::Boolean(value)),
		JsonValue::Number(number) => Some(match number.as_i64() {
			Some(int) => TokenValue::Integer(int),
			None => TokenValue::String(number.to_string()),
		}),
		JsonValue::String(value) => Some(TokenValue::String(value)),
		other => Some(TokenValue::String(other.to_string())),
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	const ISSUED_AT: i64 = 1_700_000_000;

	fn normalize(body: &[u8]) -> TokenRecord {
		normalize_token_response(body, ISSUED_AT)
			.expect("Fixture body should normalize successfully.")
	}

	#[test]
	fn json_bodies_normalize() {
		let record = normalize(b"{\"access_token\":\"abc\",\"token_type\":\"bearer\"}");

		assert_eq!(record.access_token(), Some("abc"));
		assert_eq!(record.token_type(), Some("bearer"));
		assert_eq!(record.expires_at(), None);
	}

	#[test]
	fn query_string_bodies_normalize() {
		let record = normalize(b"access_token=abc&token_type=bearer&scope=user%3Aemail");

		assert_eq!(record.access_token(), Some("abc"));
		assert_eq!(record.token_type(), Some("bearer"));
		assert_eq!(record.scope(), Some("user:email"));
		assert_eq!(record.expires_at(), None);
	}

	#[test]
	fn expires_at_is_stamped_from_expires_in() {
		let record = normalize(b"{\"access_token\":\"t\",\"expires_in\":3600}");

		assert_eq!(record.expires_in(), Some(3_600));
		assert_eq!(record.expires_at(), Some(ISSUED_AT + 3_600));
	}

	#[test]
	fn numeric_string_expires_in_is_stamped_as_well() {
		let record = normalize(b"access_token=t&expires_in=28800");

		assert_eq!(record.expires_at(), Some(ISSUED_AT + 28_800));
	}

	#[test]
	fn records_without_expires_in_stay_unstamped() {
		let record = normalize(b"{\"access_token\":\"t\",\"token_type\":\"bearer\"}");

		assert!(!record.contains_key(EXPIRES_AT));
	}

	#[test]
	fn empty_bodies_are_rejected() {
		let err = normalize_token_response(b"", ISSUED_AT)
			.expect_err("Empty bodies should be rejected.");

		assert!(matches!(err, TokenExchangeError::InvalidResponseFormat { .. }));
	}

	#[test]
	fn non_scalar_members_keep_their_json_text() {
		let record =
			normalize(b"{\"access_token\":\"t\",\"granted\":[\"a\",\"b\"],\"id\":9.5,\"x\":null}");

		assert_eq!(record.get_str("granted"), Some("[\"a\",\"b\"]"));
		assert_eq!(record.get_str("id"), Some("9.5"));
		assert!(!record.contains_key("x"));
	}

	#[test]
	fn json_scalars_keep_their_types() {
		let record = normalize(b"{\"access_token\":\"t\",\"expires_in\":120,\"beta\":true}");

		assert_eq!(record.get_i64("expires_in"), Some(120));
		assert_eq!(record.get_bool("beta"), Some(true));
	}
}
