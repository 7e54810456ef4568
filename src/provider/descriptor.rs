//! Validated provider metadata consumed by authorization and token flows.

// self
use crate::_prelude::*;

/// Errors raised while constructing or validating descriptors.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum ProviderDescriptorError {
	/// Client identifier is required for every network operation.
	#[error("Missing client identifier.")]
	MissingClientId,
	/// Client secret is required for token-endpoint calls.
	#[error("Missing client secret.")]
	MissingClientSecret,
	/// Redirect URI is mandatory for the authorization-code grant.
	#[error("Missing redirect URI.")]
	MissingRedirectUri,
	/// Authorization endpoint is required to build authorization URLs.
	#[error("Missing authorization endpoint.")]
	MissingAuthorizationEndpoint,
	/// Token endpoint is mandatory for exchanges and refreshes.
	#[error("Missing token endpoint.")]
	MissingTokenEndpoint,
	/// User-info endpoint is part of the descriptor contract.
	#[error("Missing user-info endpoint.")]
	MissingUserInfoEndpoint,
	/// Endpoints must use HTTPS.
	#[error("The {endpoint} endpoint must use HTTPS: {url}.")]
	InsecureEndpoint {
		/// Which endpoint failed validation.
		endpoint: &'static str,
		/// Endpoint URL that failed validation.
		url: String,
	},
	/// Endpoint URL failed to parse.
	#[error("The {endpoint} endpoint URL is invalid: {url}.")]
	InvalidEndpoint {
		/// Which endpoint failed to parse.
		endpoint: &'static str,
		/// Raw URL that failed to parse.
		url: String,
	},
	/// Microsoft tenant identifiers cannot be empty or contain path separators.
	#[error("Invalid Microsoft tenant identifier: {tenant}.")]
	InvalidTenant {
		/// Offending tenant string.
		tenant: String,
	},
}

/// Immutable provider descriptor consumed by authorization and token flows.
///
/// Descriptors are constructed once at startup, never mutated afterwards, and shared
/// read-only by whichever client or registry entry references them.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
	/// OAuth 2.0 client identifier.
	pub client_id: String,
	/// OAuth 2.0 client secret.
	pub client_secret: String,
	/// Redirect URI registered with the provider.
	pub redirect_uri: Url,
	/// Authorization endpoint used to start the authorization-code grant.
	pub authorization_url: Url,
	/// Token endpoint used for exchanges and refreshes.
	pub token_url: Url,
	/// User-info endpoint exposed by the provider.
	pub user_info_url: Url,
	/// Scopes requested when the caller does not supply any.
	pub default_scopes: Vec<String>,
}
impl ProviderDescriptor {
	/// Creates a new builder.
	pub fn builder() -> ProviderDescriptorBuilder {
		ProviderDescriptorBuilder::default()
	}

	fn validate(&self) -> Result<(), ProviderDescriptorError> {
		validate_endpoint("authorization", &self.authorization_url)?;
		validate_endpoint("token", &self.token_url)?;
		validate_endpoint("user-info", &self.user_info_url)?;

		Ok(())
	}
}
impl Debug for ProviderDescriptor {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("ProviderDescriptor")
			.field("client_id", &self.client_id)
			.field("client_secret", &"<redacted>")
			.field("redirect_uri", &self.redirect_uri.as_str())
			.field("authorization_url", &self.authorization_url.as_str())
			.field("token_url", &self.token_url.as_str())
			.field("user_info_url", &self.user_info_url.as_str())
			.field("default_scopes", &self.default_scopes)
			.finish()
	}
}

/// Builder for [`ProviderDescriptor`] values.
#[derive(Debug, Default)]
pub struct ProviderDescriptorBuilder {
	client_id: Option<String>,
	client_secret: Option<String>,
	redirect_uri: Option<Url>,
	authorization_url: Option<Url>,
	token_url: Option<Url>,
	user_info_url: Option<Url>,
	default_scopes: Vec<String>,
}
impl ProviderDescriptorBuilder {
	/// Sets the client identifier.
	pub fn client_id(mut self, client_id: impl Into<String>) -> Self {
		self.client_id = Some(client_id.into());

		self
	}

	/// Sets the client secret.
	pub fn client_secret(mut self, client_secret: impl Into<String>) -> Self {
		self.client_secret = Some(client_secret.into());

		self
	}

	/// Sets the redirect URI.
	pub fn redirect_uri(mut self, redirect_uri: Url) -> Self {
		self.redirect_uri = Some(redirect_uri);

		self
	}

	/// Sets the authorization endpoint.
	pub fn authorization_url(mut self, url: Url) -> Self {
		self.authorization_url = Some(url);

		self
	}

	/// Sets the token endpoint.
	pub fn token_url(mut self, url: Url) -> Self {
		self.token_url = Some(url);

		self
	}

	/// Sets the user-info endpoint.
	pub fn user_info_url(mut self, url: Url) -> Self {
		self.user_info_url = Some(url);

		self
	}

	/// Replaces the default scope list.
	pub fn default_scopes<I, S>(mut self, scopes: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.default_scopes = scopes.into_iter().map(Into::into).collect();

		self
	}

	/// Consumes the builder and validates the resulting descriptor.
	pub fn build(self) -> Result<ProviderDescriptor, ProviderDescriptorError> {
		let client_id = self
			.client_id
			.filter(|id| !id.is_empty())
			.ok_or(ProviderDescriptorError::MissingClientId)?;
		let client_secret = self
			.client_secret
			.filter(|secret| !secret.is_empty())
			.ok_or(ProviderDescriptorError::MissingClientSecret)?;
		let redirect_uri =
			self.redirect_uri.ok_or(ProviderDescriptorError::MissingRedirectUri)?;
		let authorization_url = self
			.authorization_url
			.ok_or(ProviderDescriptorError::MissingAuthorizationEndpoint)?;
		let token_url = self.token_url.ok_or(ProviderDescriptorError::MissingTokenEndpoint)?;
		let user_info_url =
			self.user_info_url.ok_or(ProviderDescriptorError::MissingUserInfoEndpoint)?;
		let descriptor = ProviderDescriptor {
			client_id,
			client_secret,
			redirect_uri,
			authorization_url,
			token_url,
			user_info_url,
			default_scopes: self.default_scopes,
		};

		descriptor.validate()?;

		Ok(descriptor)
	}
}

fn validate_endpoint(name: &'static str, url: &Url) -> Result<(), ProviderDescriptorError> {
	if url.scheme() != "https" {
		Err(ProviderDescriptorError::InsecureEndpoint { endpoint: name, url: url.to_string() })
	} else {
		Ok(())
	}
}
