//! Thread-safe in-memory [`CredentialStore`] implementation for local development and tests.

// self
use crate::{
	_prelude::*,
	auth::Username,
	store::{CredentialStore, InsertOutcome, StoreError, StoreFuture, UserRecord},
};

type StoreMap = Arc<RwLock<HashMap<Username, UserRecord>>>;

/// Thread-safe storage backend that keeps user records in-process for tests and demos.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore(StoreMap);
impl MemoryStore {
	/// Number of registered users.
	pub fn len(&self) -> usize {
		self.0.read().len()
	}

	/// Returns `true` when no user is registered.
	pub fn is_empty(&self) -> bool {
		self.0.read().is_empty()
	}

	fn insert_now(map: StoreMap, record: UserRecord) -> Result<InsertOutcome, StoreError> {
		let mut guard = map.write();

		if guard.contains_key(&record.username) {
			return Ok(InsertOutcome::Exists);
		}

		guard.insert(record.username.clone(), record);

		Ok(InsertOutcome::Inserted)
	}

	fn fetch_now(map: StoreMap, username: Username) -> Option<UserRecord> {
		map.read().get(&username).cloned()
	}

	fn fetch_by_api_key_now(map: StoreMap, fingerprint: String) -> Option<UserRecord> {
		map.read()
			.values()
			.find(|record| record.api_key_fingerprint.as_deref() == Some(fingerprint.as_str()))
			.cloned()
	}
}
impl CredentialStore for MemoryStore {
	fn insert(&self, record: UserRecord) -> StoreFuture<'_, InsertOutcome> {
		let map = self.0.clone();

		Box::pin(async move { Self::insert_now(map, record) })
	}

	fn fetch<'a>(&'a self, username: &'a Username) -> StoreFuture<'a, Option<UserRecord>> {
		let map = self.0.clone();
		let username = username.to_owned();

		Box::pin(async move { Ok(Self::fetch_now(map, username)) })
	}

	fn fetch_by_api_key<'a>(
		&'a self,
		fingerprint: &'a str,
	) -> StoreFuture<'a, Option<UserRecord>> {
		let map = self.0.clone();
		let fingerprint = fingerprint.to_owned();

		Box::pin(async move { Ok(Self::fetch_by_api_key_now(map, fingerprint)) })
	}
}
