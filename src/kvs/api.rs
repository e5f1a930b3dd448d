use crate::err::Error;
use crate::kvs::Key;
use crate::kvs::Val;
use std::future::Future;
use std::ops::Range;

/// The operations every key value storage engine must implement.
pub(crate) trait Transaction {
	/// Check if closed
	fn closed(&self) -> bool;
	/// Cancel a transaction
	fn cancel(&mut self) -> impl Future<Output = Result<(), Error>>;
	/// Commit a transaction
	fn commit(&mut self) -> impl Future<Output = Result<(), Error>>;
	/// Check if a key exists
	fn exists<K>(&mut self, key: K) -> impl Future<Output = Result<bool, Error>>
	where
		K: Into<Key>;
	/// Fetch a key from the database
	fn get<K>(&mut self, key: K) -> impl Future<Output = Result<Option<Val>, Error>>
	where
		K: Into<Key>;
	/// Insert or update a key in the database
	fn set<K, V>(&mut self, key: K, val: V) -> impl Future<Output = Result<(), Error>>
	where
		K: Into<Key>,
		V: Into<Val>;
	/// Delete a key from the database
	fn del<K>(&mut self, key: K) -> impl Future<Output = Result<(), Error>>
	where
		K: Into<Key>;
	/// Retrieve a range of keys from the database, without values
	fn keys<K>(&mut self, rng: Range<K>, limit: u32) -> impl Future<Output = Result<Vec<Key>, Error>>
	where
		K: Into<Key>;
	/// Retrieve a range of key-value pairs from the database
	fn scan<K>(
		&mut self,
		rng: Range<K>,
		limit: u32,
	) -> impl Future<Output = Result<Vec<(Key, Val)>, Error>>
	where
		K: Into<Key>;
}
