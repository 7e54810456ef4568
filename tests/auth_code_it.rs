#![cfg(feature = "reqwest")]

mod common;

// std
use std::{collections::HashMap, sync::Arc};
// crates.io
use httpmock::prelude::*;
use time::OffsetDateTime;
// self
use oauth2_courier::{
	client::{OAuth2Client, StoreFailurePolicy},
	error::{Error, TokenExchangeError},
	http::ReqwestHttpClient,
	store::{StoreError, StoreFuture, TokenStore},
	token::TokenRecord,
};

const STORAGE_KEY: &str = "github";

#[tokio::test]
async fn exchange_code_persists_json_responses() {
	let server = MockServer::start_async().await;
	let provider = common::build_provider(&server);
	let (client, store) = common::build_test_client(provider, STORAGE_KEY);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST)
				.path("/token")
				.header("content-type", "application/x-www-form-urlencoded");
			then.status(200)
				.header("content-type", "application/json")
				.body(
					"{\"access_token\":\"access-success\",\"refresh_token\":\"refresh-success\",\"token_type\":\"bearer\",\"expires_in\":3600}",
				);
		})
		.await;
	let before = OffsetDateTime::now_utc().unix_timestamp();
	let record = client
		.exchange_code_for_token("valid-code", Some("callback-state"))
		.await
		.expect("Authorization code exchange should succeed.");
	let after = OffsetDateTime::now_utc().unix_timestamp();

	mock.assert_async().await;

	assert_eq!(record.access_token(), Some("access-success"));
	assert_eq!(record.refresh_token(), Some("refresh-success"));
	assert_eq!(record.token_type(), Some("bearer"));

	let expires_at = record.expires_at().expect("Expiry stamp should be present.");

	assert!(
		(before + 3_600..=after + 3_600).contains(&expires_at),
		"expires_at {expires_at} should land within a few seconds of request time + 3600.",
	);

	let stored = store
		.retrieve(STORAGE_KEY)
		.await
		.expect("Token store fetch should succeed.")
		.expect("Stored record should remain present.");

	assert_eq!(stored, record);
}

#[tokio::test]
async fn exchange_code_normalizes_form_encoded_responses() {
	let server = MockServer::start_async().await;
	let provider = common::build_provider(&server);
	let (client, store) = common::build_test_client(provider, STORAGE_KEY);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(200)
				.header("content-type", "application/x-www-form-urlencoded")
				.body("access_token=gho_abc123&scope=user%3Aemail&token_type=bearer");
		})
		.await;
	let record = client
		.exchange_code_for_token("valid-code", None)
		.await
		.expect("Form-encoded token responses should normalize successfully.");

	mock.assert_async().await;

	assert_eq!(record.access_token(), Some("gho_abc123"));
	assert_eq!(record.scope(), Some("user:email"));
	assert_eq!(record.token_type(), Some("bearer"));
	assert_eq!(record.expires_at(), None, "No expires_in means no expires_at stamp.");

	let stored = store
		.retrieve(STORAGE_KEY)
		.await
		.expect("Token store fetch should succeed.")
		.expect("Stored record should remain present.");

	assert_eq!(stored, record);
}

#[tokio::test]
async fn failed_exchanges_never_reach_the_store() {
	let server = MockServer::start_async().await;
	let provider = common::build_provider(&server);
	let (client, store) = common::build_test_client(provider, STORAGE_KEY);
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(400)
				.header("content-type", "application/json")
				.body("{\"error\":\"bad_verification_code\"}");
		})
		.await;
	let err = client
		.exchange_code_for_token("stale-code", None)
		.await
		.expect_err("Non-2xx responses should fail the exchange.");

	mock.assert_async().await;

	match err {
		Error::Exchange(TokenExchangeError::Endpoint { status, ref body }) => {
			assert_eq!(status, 400);
			assert!(body.contains("bad_verification_code"));
		},
		other => panic!("Expected an endpoint error, got {other:?}."),
	}

	assert!(
		!store.exists(STORAGE_KEY).await.expect("Exists check should succeed."),
		"Store must not retain records when the exchange fails.",
	);
}

#[tokio::test]
async fn authorization_url_comes_from_the_bound_provider() {
	let server = MockServer::start_async().await;
	let provider = common::build_provider(&server);
	let (client, _store) = common::build_test_client(provider, STORAGE_KEY);
	let url = client.get_authorization_url(&["a", "b"]);

	assert!(url.as_str().starts_with(&server.url("/authorize")));
	assert!(url.query().expect("Query should be present.").contains("scope=a+b"));

	let pairs: HashMap<String, String> = url.query_pairs().into_owned().collect();

	assert_eq!(pairs.get("response_type"), Some(&"code".into()));
	assert_eq!(pairs.get("client_id"), Some(&common::CLIENT_ID.into()));
	assert_eq!(pairs.get("state").map(String::len), Some(32));
}

struct FailingStore;
impl TokenStore for FailingStore {
	fn store<'a>(&'a self, _key: &'a str, _record: &'a TokenRecord) -> StoreFuture<'a, ()> {
		Box::pin(async {
			Err(StoreError::Backend { message: "write refused".into() })
		})
	}

	fn retrieve<'a>(&'a self, _key: &'a str) -> StoreFuture<'a, Option<TokenRecord>> {
		Box::pin(async { Ok(None) })
	}

	fn exists<'a>(&'a self, _key: &'a str) -> StoreFuture<'a, bool> {
		Box::pin(async { Ok(false) })
	}

	fn delete<'a>(&'a self, _key: &'a str) -> StoreFuture<'a, ()> {
		Box::pin(async { Ok(()) })
	}
}

fn failing_client(server: &MockServer) -> OAuth2Client<ReqwestHttpClient> {
	OAuth2Client::with_http_client(
		common::build_provider(server),
		Arc::new(FailingStore),
		STORAGE_KEY,
		common::test_reqwest_http_client(),
	)
}

#[tokio::test]
async fn best_effort_policy_survives_store_failures() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"access-success\",\"token_type\":\"bearer\"}");
		})
		.await;
	let client = failing_client(&server);
	let record = client
		.exchange_code_for_token("valid-code", None)
		.await
		.expect("Best-effort policy should hand the record back despite the failing store.");

	mock.assert_async().await;

	assert_eq!(record.access_token(), Some("access-success"));
}

#[tokio::test]
async fn propagate_policy_surfaces_store_failures() {
	let server = MockServer::start_async().await;
	let mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/token");
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"access-success\",\"token_type\":\"bearer\"}");
		})
		.await;
	let client = failing_client(&server).with_store_failure_policy(StoreFailurePolicy::Propagate);
	let err = client
		.exchange_code_for_token("valid-code", None)
		.await
		.expect_err("Propagate policy should surface the store failure.");

	mock.assert_async().await;

	assert!(matches!(err, Error::Storage(StoreError::Backend { .. })));
}
