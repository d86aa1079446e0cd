//! Claim payloads embedded in signed tokens.

// self
use crate::_prelude::*;

/// Registered claim carrying the token subject.
pub const SUBJECT_CLAIM: &str = "sub";
/// Registered claim carrying the expiry as whole seconds since the Unix epoch.
pub const EXPIRY_CLAIM: &str = "exp";

/// Key/value payload embedded in a token.
///
/// Keys are arbitrary strings; values are arbitrary JSON. The [`SUBJECT_CLAIM`] and
/// [`EXPIRY_CLAIM`] keys get typed accessors because the token service relies on them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Claims(JsonMap<String, JsonValue>);
impl Claims {
	/// Creates an empty claim set.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates a claim set holding only a `sub` claim.
	pub fn for_subject(subject: impl Into<String>) -> Self {
		Self::new().with(SUBJECT_CLAIM, subject.into())
	}

	/// Builder-style insert.
	pub fn with(mut self, key: impl Into<String>, value: impl Into<JsonValue>) -> Self {
		self.insert(key, value);

		self
	}

	/// Inserts or replaces a claim, returning the previous value.
	pub fn insert(
		&mut self,
		key: impl Into<String>,
		value: impl Into<JsonValue>,
	) -> Option<JsonValue> {
		self.0.insert(key.into(), value.into())
	}

	/// Looks up a claim by key.
	pub fn get(&self, key: &str) -> Option<&JsonValue> {
		self.0.get(key)
	}

	/// Returns the `sub` claim when it is a string.
	pub fn subject(&self) -> Option<&str> {
		self.get(SUBJECT_CLAIM).and_then(JsonValue::as_str)
	}

	/// Returns the raw `exp` claim when it is an integer.
	pub fn expiry_timestamp(&self) -> Option<i64> {
		self.get(EXPIRY_CLAIM).and_then(JsonValue::as_i64)
	}

	/// Returns the `exp` claim as an instant.
	pub fn expires_at(&self) -> Option<OffsetDateTime> {
		self.expiry_timestamp().and_then(|secs| OffsetDateTime::from_unix_timestamp(secs).ok())
	}

	/// Stamps the `exp` claim, replacing any caller-supplied value.
	pub(crate) fn set_expiry(&mut self, instant: OffsetDateTime) {
		self.insert(EXPIRY_CLAIM, instant.unix_timestamp());
	}

	/// Number of claims.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Returns `true` when no claims are present.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Borrows the underlying JSON object.
	pub fn as_map(&self) -> &JsonMap<String, JsonValue> {
		&self.0
	}

	/// Consumes the claim set and returns the underlying JSON object.
	pub fn into_map(self) -> JsonMap<String, JsonValue> {
		self.0
	}
}
impl From<JsonMap<String, JsonValue>> for Claims {
	fn from(map: JsonMap<String, JsonValue>) -> Self {
		Self(map)
	}
}
impl<K, V> FromIterator<(K, V)> for Claims
where
	K: Into<String>,
	V: Into<JsonValue>,
{
	fn from_iter<I>(iter: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
	{
		Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
	}
}
