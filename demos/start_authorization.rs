//! Builds a GitHub authorization URL and shows the state parameter the redirect handler must
//! validate before exchanging the callback code.

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use url::Url;
// self
use oauth2_courier::{client::OAuth2Client, provider, store::MemoryStore};

fn main() -> Result<()> {
	color_eyre::install()?;

	let store = Arc::new(MemoryStore::default());
	let descriptor = provider::github(
		"demo-client",
		"demo-secret",
		Url::parse("https://app.example.com/oauth/callback")?,
	)?;
	let client = OAuth2Client::new(descriptor, store, "github")?;
	let authorize_url = client.get_authorization_url(&["user:email"]);
	let state = authorize_url
		.query_pairs()
		.find_map(|(key, value)| (key == "state").then_some(value.into_owned()))
		.unwrap_or_default();

	println!("Send your user to {authorize_url}.");
	println!("Stash state `{state}` and compare it against the callback before exchanging.");

	Ok(())
}
