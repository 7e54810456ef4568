//! Authorization URL construction with anti-forgery state tokens.

// std
use std::fmt::Write;
// crates.io
use rand::Rng;
// self
use crate::{_prelude::*, provider::ProviderDescriptor};

const STATE_TOKEN_BYTES: usize = 16;

/// Builds the authorization redirect URL for the provided descriptor and scope list.
///
/// An empty `scopes` slice falls back to the descriptor's default scopes. Scopes are joined
/// with spaces before form encoding, so they serialize as `+` in the query string. Every call
/// embeds a freshly generated [`state_token`], so two URLs never share a `state` value.
pub fn build_authorization_url<S>(provider: &ProviderDescriptor, scopes: &[S]) -> Url
where
	S: AsRef<str>,
{
	let scope = if scopes.is_empty() {
		provider.default_scopes.join(" ")
	} else {
		scopes.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(" ")
	};
	let mut url = provider.authorization_url.clone();
	let mut pairs = url.query_pairs_mut();

	pairs.append_pair("response_type", "code");
	pairs.append_pair("client_id", &provider.client_id);
	pairs.append_pair("redirect_uri", provider.redirect_uri.as_str());
	pairs.append_pair("scope", &scope);
	pairs.append_pair("state", &state_token());

	drop(pairs);

	url
}

/// Generates a 128-bit anti-forgery token, hex-encoded to 32 characters.
///
/// The value is sourced from the thread-local CSPRNG. This crate never validates the token;
/// comparing it against the redirect callback is the surrounding web handler's job.
pub fn state_token() -> String {
	let bytes: [u8; STATE_TOKEN_BYTES] = rand::rng().random();
	let mut buf = String::with_capacity(STATE_TOKEN_BYTES * 2);

	for byte in bytes {
		let _ = write!(&mut buf, "{byte:02x}");
	}

	buf
}

#[cfg(test)]
mod tests {
	// std
	use std::collections::HashSet;
	// self
	use super::*;
	use crate::provider;

	fn provider_fixture() -> ProviderDescriptor {
		provider::github(
			"client-123",
			"secret-456",
			Url::parse("https://app.example.com/callback")
				.expect("Redirect URI fixture should parse successfully."),
		)
		.expect("GitHub descriptor fixture should build successfully.")
	}

	fn query_pairs(url: &Url) -> HashMap<String, String> {
		url.query_pairs().into_owned().collect()
	}

	#[test]
	fn authorization_url_carries_fixed_parameters() {
		let provider = provider_fixture();
		let url = build_authorization_url(&provider, &["user:email"]);

		assert!(url.as_str().starts_with("https://github.com/login/oauth/authorize?"));

		let pairs = query_pairs(&url);

		assert_eq!(pairs.get("response_type"), Some(&"code".into()));
		assert_eq!(pairs.get("client_id"), Some(&"client-123".into()));
		assert_eq!(pairs.get("redirect_uri"), Some(&"https://app.example.com/callback".into()));
		assert_eq!(pairs.get("scope"), Some(&"user:email".into()));

		let state = pairs.get("state").expect("State parameter should be present.");

		assert_eq!(state.len(), 32);
		assert!(state.chars().all(|c| c.is_ascii_hexdigit()));
	}

	#[test]
	fn empty_scopes_fall_back_to_provider_defaults() {
		let provider = provider_fixture();
		let url = build_authorization_url(&provider, &Vec::<&str>::new());

		assert_eq!(query_pairs(&url).get("scope"), Some(&"user:email read:user".into()));
	}

	#[test]
	fn scopes_join_with_form_encoded_spaces() {
		let provider = provider_fixture();
		let url = build_authorization_url(&provider, &["a", "b"]);
		let query = url.query().expect("Authorization URL should carry a query string.");

		assert!(query.contains("scope=a+b"), "Unexpected query string: {query}.");
	}

	#[test]
	fn state_tokens_never_repeat() {
		let states: HashSet<_> = (0..1_000).map(|_| state_token()).collect();

		assert_eq!(states.len(), 1_000);
		assert!(
			states.iter().all(|s| s.len() == 32 && s.chars().all(|c| c.is_ascii_hexdigit())),
			"Every state token should be a 32-character hex string.",
		);
	}
}
