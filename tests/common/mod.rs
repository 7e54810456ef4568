// std
use std::sync::Arc;
// crates.io
use httpmock::MockServer;
use url::Url;
// self
use oauth2_courier::{
	client::OAuth2Client,
	http::ReqwestHttpClient,
	provider::ProviderDescriptor,
	store::MemoryStore,
};

pub const CLIENT_ID: &str = "client-it";
pub const CLIENT_SECRET: &str = "secret-it";

/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
/// `httpmock` during tests.
pub fn test_reqwest_http_client() -> ReqwestHttpClient {
	let client = reqwest::Client::builder()
		.danger_accept_invalid_certs(true)
		.danger_accept_invalid_hostnames(true)
		.redirect(reqwest::redirect::Policy::none())
		.build()
		.expect("Failed to build insecure reqwest client for tests.");

	ReqwestHttpClient::with_client(client)
}

/// Descriptor pointing every endpoint at the provided mock server.
pub fn build_provider(server: &MockServer) -> ProviderDescriptor {
	ProviderDescriptor::builder()
		.client_id(CLIENT_ID)
		.client_secret(CLIENT_SECRET)
		.redirect_uri(
			Url::parse("https://app.example.com/callback")
				.expect("Redirect URI fixture should parse successfully."),
		)
		.authorization_url(
			Url::parse(&server.url("/authorize"))
				.expect("Mock authorization endpoint should parse successfully."),
		)
		.token_url(
			Url::parse(&server.url("/token"))
				.expect("Mock token endpoint should parse successfully."),
		)
		.user_info_url(
			Url::parse(&server.url("/user"))
				.expect("Mock user-info endpoint should parse successfully."),
		)
		.default_scopes(["user:email"])
		.build()
		.expect("Provider descriptor should build successfully.")
}

/// Constructs an [`OAuth2Client`] backed by an in-memory store and the insecure reqwest
/// transport used across integration tests.
pub fn build_test_client(
	provider: ProviderDescriptor,
	storage_key: &str,
) -> (OAuth2Client<ReqwestHttpClient>, Arc<MemoryStore>) {
	let store_backend = Arc::new(MemoryStore::default());
	let client = OAuth2Client::with_http_client(
		provider,
		store_backend.clone(),
		storage_key,
		test_reqwest_http_client(),
	);

	(client, store_backend)
}
