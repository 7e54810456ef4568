//! Endpoint tables for the built-in GitHub, Google, and Microsoft providers.

// self
use crate::{
	_prelude::*,
	provider::{ProviderDescriptor, ProviderDescriptorError},
};

const GITHUB_AUTHORIZATION_URL: &str = "https://github.com/login/oauth/authorize";
const GITHUB_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
const GITHUB_USER_INFO_URL: &str = "https://api.github.com/user";
const GOOGLE_AUTHORIZATION_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const GOOGLE_USER_INFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";
const MICROSOFT_USER_INFO_URL: &str = "https://graph.microsoft.com/v1.0/me";

/// Microsoft Entra ID tenant segment substituted into the authorization and token endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MicrosoftTenant(String);
impl MicrosoftTenant {
	/// Creates a tenant identifier after validation.
	///
	/// Tenant values land in a URL path segment, so empty strings, whitespace, and `/` are
	/// rejected.
	pub fn new(value: impl Into<String>) -> Result<Self, ProviderDescriptorError> {
		let owned = value.into();

		if owned.is_empty() || owned.contains('/') || owned.chars().any(char::is_whitespace) {
			return Err(ProviderDescriptorError::InvalidTenant { tenant: owned });
		}

		Ok(Self(owned))
	}

	/// Returns the tenant path segment.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}
impl Default for MicrosoftTenant {
	/// Multi-tenant `common` endpoint used when no tenant is configured.
	fn default() -> Self {
		Self("common".into())
	}
}
impl Display for MicrosoftTenant {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.0)
	}
}
impl From<MicrosoftTenant> for String {
	fn from(value: MicrosoftTenant) -> Self {
		value.0
	}
}
impl TryFrom<String> for MicrosoftTenant {
	type Error = ProviderDescriptorError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}

/// GitHub descriptor with the `user:email` and `read:user` default scopes.
pub fn github(
	client_id: impl Into<String>,
	client_secret: impl Into<String>,
	redirect_uri: Url,
) -> Result<ProviderDescriptor, ProviderDescriptorError> {
	ProviderDescriptor::builder()
		.client_id(client_id)
		.client_secret(client_secret)
		.redirect_uri(redirect_uri)
		.authorization_url(parse_endpoint("authorization", GITHUB_AUTHORIZATION_URL)?)
		.token_url(parse_endpoint("token", GITHUB_TOKEN_URL)?)
		.user_info_url(parse_endpoint("user-info", GITHUB_USER_INFO_URL)?)
		.default_scopes(["user:email", "read:user"])
		.build()
}

/// Google descriptor with the `openid`, `email`, and `profile` default scopes.
pub fn google(
	client_id: impl Into<String>,
	client_secret: impl Into<String>,
	redirect_uri: Url,
) -> Result<ProviderDescriptor, ProviderDescriptorError> {
	ProviderDescriptor::builder()
		.client_id(client_id)
		.client_secret(client_secret)
		.redirect_uri(redirect_uri)
		.authorization_url(parse_endpoint("authorization", GOOGLE_AUTHORIZATION_URL)?)
		.token_url(parse_endpoint("token", GOOGLE_TOKEN_URL)?)
		.user_info_url(parse_endpoint("user-info", GOOGLE_USER_INFO_URL)?)
		.default_scopes(["openid", "email", "profile"])
		.build()
}

/// Microsoft descriptor scoped to the multi-tenant `common` endpoints.
pub fn microsoft(
	client_id: impl Into<String>,
	client_secret: impl Into<String>,
	redirect_uri: Url,
) -> Result<ProviderDescriptor, ProviderDescriptorError> {
	microsoft_with_tenant(client_id, client_secret, redirect_uri, &MicrosoftTenant::default())
}

/// Microsoft descriptor scoped to a specific Entra ID tenant.
pub fn microsoft_with_tenant(
	client_id: impl Into<String>,
	client_secret: impl Into<String>,
	redirect_uri: Url,
	tenant: &MicrosoftTenant,
) -> Result<ProviderDescriptor, ProviderDescriptorError> {
	let authorization = format!("https://login.microsoftonline.com/{tenant}/oauth2/v2.0/authorize");
	let token = format!("https://login.microsoftonline.com/{tenant}/oauth2/v2.0/token");

	ProviderDescriptor::builder()
		.client_id(client_id)
		.client_secret(client_secret)
		.redirect_uri(redirect_uri)
		.authorization_url(parse_endpoint("authorization", &authorization)?)
		.token_url(parse_endpoint("token", &token)?)
		.user_info_url(parse_endpoint("user-info", MICROSOFT_USER_INFO_URL)?)
		.default_scopes(["openid", "profile", "email"])
		.build()
}

fn parse_endpoint(endpoint: &'static str, raw: &str) -> Result<Url, ProviderDescriptorError> {
	Url::parse(raw)
		.map_err(|_| ProviderDescriptorError::InvalidEndpoint { endpoint, url: raw.into() })
}
