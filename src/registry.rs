//! Name-keyed provider registry producing pre-wired clients.

// self
use crate::{
	_prelude::*,
	client::OAuth2Client,
	error::ProviderNotFoundError,
	http::TokenHttpClient,
	provider::ProviderDescriptor,
	store::TokenStore,
};
#[cfg(feature = "reqwest")]
use crate::{error::ConfigError, http::ReqwestHttpClient};

#[cfg(feature = "reqwest")]
/// Registry specialized for the crate's default reqwest transport.
pub type ReqwestProviderRegistry = ProviderRegistry<ReqwestHttpClient>;

/// Name-to-descriptor map sharing one token store and transport across clients.
///
/// [`get_client`](Self::get_client) hands out an [`OAuth2Client`] bound to the named provider,
/// keyed into the shared store by that registered name, so tokens from different providers
/// never overwrite each other.
pub struct ProviderRegistry<C>
where
	C: ?Sized + TokenHttpClient,
{
	providers: RwLock<HashMap<String, ProviderDescriptor>>,
	store: Arc<dyn TokenStore>,
	http_client: Arc<C>,
}
impl<C> ProviderRegistry<C>
where
	C: ?Sized + TokenHttpClient,
{
	/// Creates a registry that reuses the caller-provided transport.
	pub fn with_http_client(store: Arc<dyn TokenStore>, http_client: impl Into<Arc<C>>) -> Self {
		Self { providers: RwLock::new(HashMap::new()), store, http_client: http_client.into() }
	}

	/// Registers or overwrites a provider under `name`.
	pub fn add_provider(&self, name: impl Into<String>, provider: ProviderDescriptor) {
		self.providers.write().insert(name.into(), provider);
	}

	/// Returns `true` when a provider is registered under `name`.
	pub fn has_provider(&self, name: &str) -> bool {
		self.providers.read().contains_key(name)
	}

	/// Removes the provider registered under `name`; absent names are a no-op.
	pub fn remove_provider(&self, name: &str) {
		self.providers.write().remove(name);
	}

	/// Names of every registered provider, in no particular order.
	pub fn provider_names(&self) -> Vec<String> {
		self.providers.read().keys().cloned().collect()
	}

	/// Builds a client bound to the named provider and the registry's shared store.
	///
	/// The registered name doubles as the client's storage key.
	pub fn get_client(&self, name: &str) -> Result<OAuth2Client<C>> {
		let provider = self
			.providers
			.read()
			.get(name)
			.cloned()
			.ok_or_else(|| ProviderNotFoundError { name: name.into() })?;

		Ok(OAuth2Client::with_http_client(
			provider,
			self.store.clone(),
			name,
			self.http_client.clone(),
		))
	}
}
#[cfg(feature = "reqwest")]
impl ProviderRegistry<ReqwestHttpClient> {
	/// Creates a registry with a fresh reqwest transport using the default timeout.
	pub fn new(store: Arc<dyn TokenStore>) -> Result<Self, ConfigError> {
		Ok(Self::with_http_client(store, ReqwestHttpClient::new()?))
	}
}
impl<C> Debug for ProviderRegistry<C>
where
	C: ?Sized + TokenHttpClient,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ProviderRegistry")
			.field("providers", &self.provider_names())
			.finish()
	}
}
