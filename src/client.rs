//! High-level client facade composing a provider, the exchange engine, and a token store.

// self
use crate::{
	_prelude::*,
	auth,
	http::TokenHttpClient,
	obs::{self, FlowKind, FlowOutcome, FlowSpan},
	provider::ProviderDescriptor,
	store::TokenStore,
	token::{TokenExchanger, TokenRecord},
};
#[cfg(feature = "reqwest")]
use crate::{error::ConfigError, http::ReqwestHttpClient};

#[cfg(feature = "reqwest")]
/// Client specialized for the crate's default reqwest transport.
pub type ReqwestOAuth2Client = OAuth2Client<ReqwestHttpClient>;

/// Controls what happens when persisting a freshly exchanged record fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreFailurePolicy {
	#[default]
	/// Log the failure (via the `tracing` feature) and hand the record to the caller anyway.
	BestEffort,
	/// Surface the failure as [`Error::Storage`](crate::error::Error::Storage) even though the
	/// exchange itself succeeded.
	Propagate,
}

/// Coordinates the authorization-code grant against a single provider descriptor.
///
/// The client owns the HTTP transport, token store, and provider descriptor so callers only
/// deal with the three operations an application needs: building the redirect URL, exchanging
/// the callback code, and refreshing. Exchanged records are persisted under the configured
/// storage key before being returned.
pub struct OAuth2Client<C>
where
	C: ?Sized + TokenHttpClient,
{
	provider: ProviderDescriptor,
	store: Arc<dyn TokenStore>,
	http_client: Arc<C>,
	storage_key: String,
	store_failure: StoreFailurePolicy,
}
impl<C> OAuth2Client<C>
where
	C: ?Sized + TokenHttpClient,
{
	/// Creates a client that reuses the caller-provided transport.
	///
	/// `storage_key` scopes persisted records, so two clients sharing one store must use
	/// distinct keys. [`ProviderRegistry`](crate::registry::ProviderRegistry) passes each
	/// provider's registered name here.
	pub fn with_http_client(
		provider: ProviderDescriptor,
		store: Arc<dyn TokenStore>,
		storage_key: impl Into<String>,
		http_client: impl Into<Arc<C>>,
	) -> Self {
		Self {
			provider,
			store,
			http_client: http_client.into(),
			storage_key: storage_key.into(),
			store_failure: StoreFailurePolicy::default(),
		}
	}

	/// Overrides the policy applied when persisting an exchanged record fails.
	pub fn with_store_failure_policy(mut self, policy: StoreFailurePolicy) -> Self {
		self.store_failure = policy;

		self
	}

	/// Provider descriptor the client is bound to.
	pub fn provider(&self) -> &ProviderDescriptor {
		&self.provider
	}

	/// Storage key used when persisting exchanged records.
	pub fn storage_key(&self) -> &str {
		&self.storage_key
	}

	/// Builds the authorization redirect URL for the requested scopes.
	///
	/// An empty scope list falls back to the provider's defaults. No network traffic occurs.
	pub fn get_authorization_url<S>(&self, scopes: &[S]) -> Url
	where
		S: AsRef<str>,
	{
		let _guard = FlowSpan::new(FlowKind::Authorize, "get_authorization_url").entered();

		auth::build_authorization_url(&self.provider, scopes)
	}

	/// Exchanges an authorization code for a token record and persists the result.
	///
	/// `state` is accepted for the caller's own CSRF bookkeeping and never sent to the token
	/// endpoint; validate it against the redirect callback before calling this method.
	pub async fn exchange_code_for_token(
		&self,
		code: &str,
		state: Option<&str>,
	) -> Result<TokenRecord> {
		const KIND: FlowKind = FlowKind::ExchangeCode;

		let span = FlowSpan::new(KIND, "exchange_code_for_token");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let record = self.exchanger().exchange_code(code, state).await?;

				self.persist(&record).await?;

				Ok(record)
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	/// Trades a refresh token for a fresh record and persists the result.
	///
	/// The stored record is superseded wholesale; entries from the previous record never leak
	/// into the new one.
	pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenRecord> {
		const KIND: FlowKind = FlowKind::Refresh;

		let span = FlowSpan::new(KIND, "refresh_token");

		obs::record_flow_outcome(KIND, FlowOutcome::Attempt);

		let result = span
			.instrument(async move {
				let record = self.exchanger().refresh(refresh_token).await?;

				self.persist(&record).await?;

				Ok(record)
			})
			.await;

		match &result {
			Ok(_) => obs::record_flow_outcome(KIND, FlowOutcome::Success),
			Err(_) => obs::record_flow_outcome(KIND, FlowOutcome::Failure),
		}

		result
	}

	/// Fetches the record currently persisted under the client's storage key.
	pub async fn stored_token(&self) -> Result<Option<TokenRecord>> {
		Ok(self.store.retrieve(&self.storage_key).await?)
	}

	/// Removes the record persisted under the client's storage key, if any.
	pub async fn clear_stored_token(&self) -> Result<()> {
		Ok(self.store.delete(&self.storage_key).await?)
	}

	fn exchanger(&self) -> TokenExchanger<C> {
		TokenExchanger::with_http_client(self.provider.clone(), self.http_client.clone())
	}

	async fn persist(&self, record: &TokenRecord) -> Result<()> {
		match self.store.store(&self.storage_key, record).await {
			Ok(()) => Ok(()),
			Err(source) => match self.store_failure {
				StoreFailurePolicy::Propagate => Err(source.into()),
				StoreFailurePolicy::BestEffort => {
					obs::warn_store_failure(&self.storage_key, &source);

					Ok(())
				},
			},
		}
	}
}
#[cfg(feature = "reqwest")]
impl OAuth2Client<ReqwestHttpClient> {
	/// Creates a client with a fresh reqwest transport using the default timeout.
	pub fn new(
		provider: ProviderDescriptor,
		store: Arc<dyn TokenStore>,
		storage_key: impl Into<String>,
	) -> Result<Self, ConfigError> {
		Ok(Self::with_http_client(provider, store, storage_key, ReqwestHttpClient::new()?))
	}
}
impl<C> Clone for OAuth2Client<C>
where
	C: ?Sized + TokenHttpClient,
{
	fn clone(&self) -> Self {
		Self {
			provider: self.provider.clone(),
			store: self.store.clone(),
			http_client: self.http_client.clone(),
			storage_key: self.storage_key.clone(),
			store_failure: self.store_failure,
		}
	}
}
impl<C> Debug for OAuth2Client<C>
where
	C: ?Sized + TokenHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("OAuth2Client")
			.field("provider", &self.provider)
			.field("storage_key", &self.storage_key)
			.field("store_failure", &self.store_failure)
			.finish()
	}
}
