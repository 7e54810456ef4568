//! File-backed [`TokenStore`] writing one JSON document per key.
//!
//! On-disk names are the SHA-256 digest of the key, which normalizes arbitrary key content
//! and keeps caller-supplied strings out of filesystem paths.

// std
use std::{
	fmt::Write as _,
	fs::{self, File},
	io::{ErrorKind, Write},
	path::{Path, PathBuf},
};
// crates.io
use sha2::{Digest, Sha256};
// self
use crate::{
	_prelude::*,
	store::{StoreError, StoreFuture, TokenStore},
	token::TokenRecord,
};

/// Persists token records as `{sha256(key)}.json` files under a caller-chosen directory.
///
/// The directory is created on open with owner-only permissions (on Unix). There is no
/// implicit temp-directory default; callers pick the location explicitly.
#[derive(Clone, Debug)]
pub struct FileStore {
	dir: PathBuf,
}
impl FileStore {
	/// Opens (or creates) a store rooted at the provided directory.
	pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let dir = dir.into();

		create_store_dir(&dir)?;

		Ok(Self { dir })
	}

	/// Directory the store writes into.
	pub fn dir(&self) -> &Path {
		&self.dir
	}

	fn record_path(&self, key: &str) -> PathBuf {
		let digest = Sha256::digest(key.as_bytes());
		let mut name = String::with_capacity(digest.len() * 2 + 5);

		for byte in digest {
			let _ = write!(&mut name, "{byte:02x}");
		}

		name.push_str(".json");

		self.dir.join(name)
	}

	fn write_record(&self, path: &Path, record: &TokenRecord) -> Result<(), StoreError> {
		let serialized = serde_json::to_vec(record).map_err(|e| StoreError::Serialization {
			message: format!("Failed to serialize record: {e}"),
		})?;
		let mut tmp_path = path.to_path_buf();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| StoreError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| StoreError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, path).map_err(|e| StoreError::Backend {
			message: format!("Failed to replace {}: {e}", path.display()),
		})
	}

	fn read_record(path: &Path) -> Result<Option<TokenRecord>, StoreError> {
		if !path.exists() {
			return Ok(None);
		}

		let bytes = fs::read(path).map_err(|e| StoreError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;
		let mut deserializer = serde_json::Deserializer::from_slice(&bytes);
		let record = serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
			StoreError::Serialization { message: format!("Failed to parse {}: {e}", path.display()) }
		})?;

		Ok(Some(record))
	}
}
impl TokenStore for FileStore {
	fn store<'a>(&'a self, key: &'a str, record: &'a TokenRecord) -> StoreFuture<'a, ()> {
		Box::pin(async move {
			create_store_dir(&self.dir)?;
			self.write_record(&self.record_path(key), record)
		})
	}

	fn retrieve<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<TokenRecord>> {
		Box::pin(async move { Self::read_record(&self.record_path(key)) })
	}

	fn exists<'a>(&'a self, key: &'a str) -> StoreFuture<'a, bool> {
		Box::pin(async move { Ok(self.record_path(key).exists()) })
	}

	fn delete<'a>(&'a self, key: &'a str) -> StoreFuture<'a, ()> {
		Box::pin(async move {
			let path = self.record_path(key);

			match fs::remove_file(&path) {
				Ok(()) => Ok(()),
				Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
				Err(e) => Err(StoreError::Backend {
					message: format!("Failed to remove {}: {e}", path.display()),
				}),
			}
		})
	}
}

fn create_store_dir(dir: &Path) -> Result<(), StoreError> {
	let mut builder = fs::DirBuilder::new();

	builder.recursive(true);

	#[cfg(unix)]
	{
		use std::os::unix::fs::DirBuilderExt;

		builder.mode(0o700);
	}

	builder.create(dir).map_err(|e| StoreError::Backend {
		message: format!("Failed to create store directory {}: {e}", dir.display()),
	})
}

#[cfg(test)]
mod tests {
	// std
	use std::{env, process};
	// crates.io
	use tokio::runtime::Runtime;
	// self
	use super::*;

	fn temp_dir() -> PathBuf {
		let unique = format!(
			"oauth2_courier_file_store_{}_{}",
			process::id(),
			OffsetDateTime::now_utc().unix_timestamp_nanos(),
		);

		env::temp_dir().join(unique)
	}

	fn build_record() -> TokenRecord {
		let mut record = TokenRecord::new();

		record.insert("access_token", "access-token");
		record.insert("token_type", "bearer");
		record.insert("expires_at", 1_700_003_600_i64);

		record
	}

	#[test]
	fn save_and_reload_round_trip() {
		let dir = temp_dir();
		let store = FileStore::open(&dir).expect("Failed to open file store directory.");
		let rt = Runtime::new().expect("Failed to build Tokio runtime for file store test.");
		let record = build_record();

		rt.block_on(store.store("demo-key", &record))
			.expect("Failed to save fixture record to file store.");
		drop(store);

		let reopened = FileStore::open(&dir).expect("Failed to reopen file store directory.");
		let fetched = rt
			.block_on(reopened.retrieve("demo-key"))
			.expect("Failed to fetch fixture record from file store.")
			.expect("File store lost record after reopen.");

		assert_eq!(fetched, record);

		fs::remove_dir_all(&dir).unwrap_or_else(|e| {
			panic!("Failed to remove temporary store directory {}: {e}", dir.display())
		});
	}

	#[test]
	fn file_names_are_hashed_digests() {
		let dir = temp_dir();
		let store = FileStore::open(&dir).expect("Failed to open file store directory.");
		let path = store.record_path("../../etc/passwd");
		let name = path
			.file_name()
			.and_then(|name| name.to_str())
			.expect("Record path should end in a UTF-8 file name.");

		assert_eq!(path.parent(), Some(dir.as_path()));
		assert_eq!(name.len(), 69);
		assert!(name.ends_with(".json"));
		assert!(name[..64].chars().all(|c| c.is_ascii_hexdigit()));

		fs::remove_dir_all(&dir).unwrap_or_else(|e| {
			panic!("Failed to remove temporary store directory {}: {e}", dir.display())
		});
	}
}
