//! Juggles several providers through a registry and exchanges a callback code when one is
//! supplied via `OAUTH_CODE` (with the optional `OAUTH_STATE` it arrived with).

// std
use std::{env, sync::Arc};
// crates.io
use color_eyre::Result;
use url::Url;
// self
use oauth2_courier::{provider, registry::ProviderRegistry, store::FileStore};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let redirect_uri = Url::parse("https://app.example.com/oauth/callback")?;
	let store = Arc::new(FileStore::open("./target/demo-tokens")?);
	let registry = ProviderRegistry::new(store)?;

	registry.add_provider(
		"github",
		provider::github("demo-github-client", "demo-github-secret", redirect_uri.clone())?,
	);
	registry.add_provider(
		"google",
		provider::google("demo-google-client", "demo-google-secret", redirect_uri)?,
	);

	let mut names = registry.provider_names();

	names.sort();
	println!("Registered providers: {}.", names.join(", "));

	let client = registry.get_client("github")?;

	match env::var("OAUTH_CODE") {
		Ok(code) => {
			let state = env::var("OAUTH_STATE").ok();
			let record = client.exchange_code_for_token(&code, state.as_deref()).await?;

			println!("Exchange succeeded; record keys:");

			for (key, _) in record.iter() {
				println!("  {key}");
			}

			if let Some(expires_at) = record.expires_at() {
				println!("Access token expires at unix {expires_at}.");
			}
			if let Some(refresh_token) = record.refresh_token() {
				let refreshed = client.refresh_token(refresh_token).await?;

				println!(
					"Refreshed immediately; new record carries {} entries.",
					refreshed.len(),
				);
			}
		},
		Err(_) => {
			println!("Set OAUTH_CODE to exchange a callback code; printing the redirect URL instead.");
			println!("{}", client.get_authorization_url(&Vec::<&str>::new()));
		},
	}

	Ok(())
}
