//! Thread-safe in-memory [`TokenStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	store::{StoreFuture, TokenStore},
	token::TokenRecord,
};

type StoreMap = Arc<RwLock<HashMap<String, TokenRecord>>>;

/// Thread-safe backend that keeps records in-process for tests and demos.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(StoreMap);
impl TokenStore for MemoryStore {
	fn store<'a>(&'a self, key: &'a str, record: &'a TokenRecord) -> StoreFuture<'a, ()> {
		let map = self.0.clone();

		Box::pin(async move {
			map.write().insert(key.to_owned(), record.clone());

			Ok(())
		})
	}

	fn retrieve<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<TokenRecord>> {
		let map = self.0.clone();

		Box::pin(async move { Ok(map.read().get(key).cloned()) })
	}

	fn exists<'a>(&'a self, key: &'a str) -> StoreFuture<'a, bool> {
		let map = self.0.clone();

		Box::pin(async move { Ok(map.read().contains_key(key)) })
	}

	fn delete<'a>(&'a self, key: &'a str) -> StoreFuture<'a, ()> {
		let map = self.0.clone();

		Box::pin(async move {
			map.write().remove(key);

			Ok(())
		})
	}
}
