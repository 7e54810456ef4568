//! Opaque token records passed through from provider responses.

// std
use std::collections::btree_map;
// self
use crate::_prelude::*;

/// Keys whose values never appear in debug output.
const REDACTED_KEYS: &[&str] = &["access_token", "id_token", "refresh_token"];

/// Loosely typed scalar carried by a [`TokenRecord`] entry.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TokenValue {
	/// Boolean entry.
	Boolean(bool),
	/// Integer entry.
	Integer(i64),
	/// String entry.
	String(String),
}
impl TokenValue {
	/// Returns the string payload, if this is a string entry.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(value) => Some(value),
			_ => None,
		}
	}

	/// Returns the integer payload, if this is an integer entry.
	pub fn as_i64(&self) -> Option<i64> {
		match self {
			Self::Integer(value) => Some(*value),
			_ => None,
		}
	}

	/// Returns the boolean payload, if this is a boolean entry.
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Boolean(value) => Some(*value),
			_ => None,
		}
	}
}
impl Debug for TokenValue {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Boolean(value) => Debug::fmt(value, f),
			Self::Integer(value) => Debug::fmt(value, f),
			Self::String(value) => Debug::fmt(value, f),
		}
	}
}
impl From<bool> for TokenValue {
	fn from(value: bool) -> Self {
		Self::Boolean(value)
	}
}
impl From<i64> for TokenValue {
	fn from(value: i64) -> Self {
		Self::Integer(value)
	}
}
impl From<String> for TokenValue {
	fn from(value: String) -> Self {
		Self::String(value)
	}
}
impl From<&str> for TokenValue {
	fn from(value: &str) -> Self {
		Self::String(value.into())
	}
}

/// Opaque key-value mapping produced by a token exchange or refresh.
///
/// Entries are provider-defined and passed through unmodified, except that the exchange
/// engine adds an `expires_at` unix timestamp whenever the provider reported `expires_in`.
/// Later exchanges supersede earlier records wholesale; nothing is merged.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TokenRecord(BTreeMap<String, TokenValue>);
impl TokenRecord {
	/// Creates an empty record.
	pub fn new() -> Self {
		Self::default()
	}

	/// Inserts an entry, returning the previous value stored under `key`.
	pub fn insert(
		&mut self,
		key: impl Into<String>,
		value: impl Into<TokenValue>,
	) -> Option<TokenValue> {
		self.0.insert(key.into(), value.into())
	}

	/// Returns the entry stored under `key`.
	pub fn get(&self, key: &str) -> Option<&TokenValue> {
		self.0.get(key)
	}

	/// Returns `true` when an entry exists under `key`.
	pub fn contains_key(&self, key: &str) -> bool {
		self.0.contains_key(key)
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns `true` when the record carries no entries.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Iterator over entries in key order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &TokenValue)> {
		self.0.iter().map(|(key, value)| (key.as_str(), value))
	}

	/// Returns the string entry stored under `key`.
	pub fn get_str(&self, key: &str) -> Option<&str> {
		self.get(key)?.as_str()
	}

	/// Returns the integer entry stored under `key`.
	pub fn get_i64(&self, key: &str) -> Option<i64> {
		self.get(key)?.as_i64()
	}

	/// Returns the boolean entry stored under `key`.
	pub fn get_bool(&self, key: &str) -> Option<bool> {
		self.get(key)?.as_bool()
	}

	/// Access token issued by the provider.
	pub fn access_token(&self) -> Option<&str> {
		self.get_str("access_token")
	}

	/// Refresh token issued by the provider, if any.
	pub fn refresh_token(&self) -> Option<&str> {
		self.get_str("refresh_token")
	}

	/// Token type reported by the provider (typically `bearer`).
	pub fn token_type(&self) -> Option<&str> {
		self.get_str("token_type")
	}

	/// Granted scope string reported by the provider.
	pub fn scope(&self) -> Option<&str> {
		self.get_str("scope")
	}

	/// Relative expiry reported by the provider, in seconds.
	///
	/// Numeric strings count as well, because form-urlencoded responses have no integer type
	/// to answer with.
	pub fn expires_in(&self) -> Option<i64> {
		match self.get("expires_in")? {
			TokenValue::Integer(secs) => Some(*secs),
			TokenValue::String(raw) => raw.parse().ok(),
			TokenValue::Boolean(_) => None,
		}
	}

	/// Absolute expiry stamp added by the exchange engine, as unix seconds.
	pub fn expires_at(&self) -> Option<i64> {
		self.get_i64("expires_at")
	}

	/// Returns `true` when an expiry stamp exists and does not lie after the provided unix
	/// timestamp. Records without a stamp never report as expired.
	pub fn is_expired_at(&self, unix: i64) -> bool {
		self.expires_at().is_some_and(|at| at <= unix)
	}
}
impl Debug for TokenRecord {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		let mut map = f.debug_map();

		for (key, value) in &self.0 {
			if REDACTED_KEYS.contains(&key.as_str()) {
				map.entry(key, &"<redacted>");
			} else {
				map.entry(key, value);
			}
		}

		map.finish()
	}
}
impl FromIterator<(String, TokenValue)> for TokenRecord {
	fn from_iter<I>(iter: I) -> Self
	where
		I: IntoIterator<Item = (String, TokenValue)>,
	{
		Self(iter.into_iter().collect())
	}
}
impl IntoIterator for TokenRecord {
	type IntoIter = btree_map::IntoIter<String, TokenValue>;
	type Item = (String, TokenValue);

	fn into_iter(self) -> Self::IntoIter {
		self.0.into_iter()
	}
}
