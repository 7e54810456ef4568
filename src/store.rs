//! Storage contracts and built-in store implementations for exchanged token records.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

// self
use crate::{_prelude::*, token::TokenRecord};

/// Future type returned by [`TokenStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Persistence contract for exchanged token records.
///
/// A key maps to at most one record at a time; storing under an existing key replaces the
/// previous record wholesale. Backends are selected by composition (passed into clients or
/// registries), never by inheritance.
pub trait TokenStore
where
	Self: Send + Sync,
{
	/// Persists or replaces the record stored under `key`.
	fn store<'a>(&'a self, key: &'a str, record: &'a TokenRecord) -> StoreFuture<'a, ()>;

	/// Fetches the record stored under `key`, if present.
	fn retrieve<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<TokenRecord>>;

	/// Returns `true` when a record is stored under `key`.
	fn exists<'a>(&'a self, key: &'a str) -> StoreFuture<'a, bool>;

	/// Removes the record stored under `key`; deleting an absent key still succeeds.
	fn delete<'a>(&'a self, key: &'a str) -> StoreFuture<'a, ()>;
}

/// Error type produced by [`TokenStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
}
