use super::api::Transaction as _;
use super::Key;
use super::Val;
use crate::cnf;
use crate::err::Error;
use crate::idx::uid_from_val;
use crate::idx::Uid;
#[cfg(debug_assertions)]
use crate::key::debug::sprint;
use crate::key::du::Du;
use crate::key::dv::Dv;
use crate::key::pd;
use crate::key::pd::Pd;
use crate::key::pl;
use crate::key::pl::Pl;
use crate::key::sq::Sq;
use std::fmt;
use std::fmt::Debug;
use std::ops::Range;

const TARGET: &str = "tripledb::kvs::tx";

/// Used to determine the behaviour when a transaction is not closed correctly
#[derive(Default)]
pub enum Check {
	#[default]
	None,
	Warn,
	Panic,
}

/// Specifies whether the transaction is read-only or writeable.
#[derive(Copy, Clone)]
pub enum TransactionType {
	Read,
	Write,
}

impl From<bool> for TransactionType {
	fn from(value: bool) -> Self {
		match value {
			true => TransactionType::Write,
			false => TransactionType::Read,
		}
	}
}

/// Specifies whether the transaction is optimistic or pessimistic.
#[derive(Copy, Clone)]
pub enum LockType {
	Pessimistic,
	Optimistic,
}

/// A set of undoable updates and requests against a dataset.
#[non_exhaustive]
pub struct Transaction {
	pub(super) inner: Inner,
}

pub(super) enum Inner {
	#[cfg(feature = "kv-mem")]
	Mem(super::mem::Transaction),
	#[cfg(feature = "kv-rocksdb")]
	RocksDB(super::rocksdb::Transaction),
}

impl fmt::Display for Transaction {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		#![allow(unused_variables)]
		match &self.inner {
			#[cfg(feature = "kv-mem")]
			Inner::Mem(_) => write!(f, "memory"),
			#[cfg(feature = "kv-rocksdb")]
			Inner::RocksDB(_) => write!(f, "rocksdb"),
			#[allow(unreachable_patterns)]
			_ => unreachable!(),
		}
	}
}

macro_rules! expand_inner {
	( $v:expr, $arm:pat_param => $b:block ) => {
		match $v {
			#[cfg(feature = "kv-mem")]
			Inner::Mem($arm) => $b,
			#[cfg(feature = "kv-rocksdb")]
			Inner::RocksDB($arm) => $b,
			#[allow(unreachable_patterns)]
			_ => unreachable!(),
		}
	};
}

impl Transaction {
	// --------------------------------------------------
	// Integral methods
	// --------------------------------------------------

	/// Check if transaction is finished.
	///
	/// If the transaction has been cancelled or committed,
	/// then this function will return [`true`], and any further
	/// calls to functions on this transaction will result
	/// in a [`Error::TxFinished`] error.
	pub async fn closed(&self) -> bool {
		#[cfg(debug_assertions)]
		trace!(target: TARGET, "closed");
		expand_inner!(&self.inner, v => { v.closed() })
	}

	/// Cancel a transaction.
	///
	/// This reverses all changes made within the transaction.
	pub async fn cancel(&mut self) -> Result<(), Error> {
		#[cfg(debug_assertions)]
		trace!(target: TARGET, "cancel");
		expand_inner!(&mut self.inner, v => { v.cancel().await })
	}

	/// Commit a transaction.
	///
	/// This attempts to commit all changes made within the transaction.
	pub async fn commit(&mut self) -> Result<(), Error> {
		#[cfg(debug_assertions)]
		trace!(target: TARGET, "commit");
		expand_inner!(&mut self.inner, v => { v.commit().await })
	}

	/// Check if a key exists in the datastore.
	pub async fn exists<K>(&mut self, key: K) -> Result<bool, Error>
	where
		K: Into<Key> + Debug,
	{
		let key = key.into();
		#[cfg(debug_assertions)]
		trace!(target: TARGET, "exists {}", sprint(&key));
		expand_inner!(&mut self.inner, v => { v.exists(key).await })
	}

	/// Fetch a key from the datastore.
	pub async fn get<K>(&mut self, key: K) -> Result<Option<Val>, Error>
	where
		K: Into<Key> + Debug,
	{
		let key = key.into();
		#[cfg(debug_assertions)]
		trace!(target: TARGET, "get {}", sprint(&key));
		expand_inner!(&mut self.inner, v => { v.get(key).await })
	}

	/// Insert or update a key in the datastore.
	pub async fn set<K, V>(&mut self, key: K, val: V) -> Result<(), Error>
	where
		K: Into<Key> + Debug,
		V: Into<Val> + Debug,
	{
		let key = key.into();
		#[cfg(debug_assertions)]
		trace!(target: TARGET, "set {} => {:?}", sprint(&key), val);
		expand_inner!(&mut self.inner, v => { v.set(key, val).await })
	}

	/// Delete a key from the datastore.
	pub async fn del<K>(&mut self, key: K) -> Result<(), Error>
	where
		K: Into<Key> + Debug,
	{
		let key = key.into();
		#[cfg(debug_assertions)]
		trace!(target: TARGET, "del {}", sprint(&key));
		expand_inner!(&mut self.inner, v => { v.del(key).await })
	}

	/// Retrieve a specific range of keys from the datastore.
	///
	/// This function fetches the keys without values, in a single request to the underlying datastore.
	pub async fn keys<K>(&mut self, rng: Range<K>, limit: u32) -> Result<Vec<Key>, Error>
	where
		K: Into<Key> + Debug,
	{
		let beg: Key = rng.start.into();
		let end: Key = rng.end.into();
		#[cfg(debug_assertions)]
		trace!(target: TARGET, "keys {}..{} (limit: {limit})", sprint(&beg), sprint(&end));
		expand_inner!(&mut self.inner, v => { v.keys(beg..end, limit).await })
	}

	/// Retrieve a specific range of keys from the datastore.
	///
	/// This function fetches the full range of key-value pairs, in a single request to the underlying datastore.
	pub async fn scan<K>(&mut self, rng: Range<K>, limit: u32) -> Result<Vec<(Key, Val)>, Error>
	where
		K: Into<Key> + Debug,
	{
		let beg: Key = rng.start.into();
		let end: Key = rng.end.into();
		#[cfg(debug_assertions)]
		trace!(target: TARGET, "scan {}..{} (limit: {limit})", sprint(&beg), sprint(&end));
		expand_inner!(&mut self.inner, v => { v.scan(beg..end, limit).await })
	}

	/// Retrieve every key-value pair in a range, in grouped batches.
	pub async fn getr<K>(&mut self, rng: Range<K>) -> Result<Vec<(Key, Val)>, Error>
	where
		K: Into<Key> + Debug,
	{
		let mut beg: Key = rng.start.into();
		let end: Key = rng.end.into();
		let batch = *cnf::NORMAL_FETCH_SIZE;
		let mut out = Vec::new();
		loop {
			let res = self.scan(beg.clone()..end.clone(), batch).await?;
			let exhausted = res.len() < batch as usize;
			// Continue from just after the last key fetched
			if let Some((key, _)) = res.last() {
				beg.clone_from(key);
				beg.push(0x00);
			}
			out.extend(res);
			if exhausted {
				break;
			}
		}
		Ok(out)
	}

	/// Retrieve every key in a range, without values, in grouped batches.
	pub async fn keysr<K>(&mut self, rng: Range<K>) -> Result<Vec<Key>, Error>
	where
		K: Into<Key> + Debug,
	{
		let mut beg: Key = rng.start.into();
		let end: Key = rng.end.into();
		let batch = *cnf::NORMAL_FETCH_SIZE;
		let mut out = Vec::new();
		loop {
			let res = self.keys(beg.clone()..end.clone(), batch).await?;
			let exhausted = res.len() < batch as usize;
			// Continue from just after the last key fetched
			if let Some(key) = res.last() {
				beg.clone_from(key);
				beg.push(0x00);
			}
			out.extend(res);
			if exhausted {
				break;
			}
		}
		Ok(out)
	}

	// --------------------------------------------------
	// UID sequence methods
	// --------------------------------------------------

	/// Allocate the next UID.
	///
	/// The updated counter is written back within this transaction, before
	/// the UID is used, so allocation is atomic with whatever the UID is
	/// allocated for.
	pub async fn next_uid(&mut self) -> Result<Uid, Error> {
		let key = Sq::new().encode();
		let last = match self.get(key.clone()).await? {
			Some(v) => uid_from_val(&v)?,
			None => 0,
		};
		let uid = last + 1;
		self.set(key, uid.to_le_bytes().to_vec()).await?;
		Ok(uid)
	}

	// --------------------------------------------------
	// Dictionary methods
	// --------------------------------------------------

	/// Fetch the UID interned for the given bytes, if any.
	pub async fn get_uid(&mut self, val: &[u8]) -> Result<Option<Uid>, Error> {
		match self.get(Dv::new(val).encode()).await? {
			Some(v) => Ok(Some(uid_from_val(&v)?)),
			None => Ok(None),
		}
	}

	/// Fetch the bytes interned under the given UID, if any.
	pub async fn get_data(&mut self, uid: Uid) -> Result<Option<Val>, Error> {
		self.get(Du::new(uid).encode()).await
	}

	/// Fetch the UID for the given bytes, interning them if absent.
	///
	/// Both directions of the dictionary are written together, so the
	/// mapping is a bijection.
	pub async fn resolve_uid(&mut self, val: &[u8]) -> Result<Uid, Error> {
		if let Some(uid) = self.get_uid(val).await? {
			return Ok(uid);
		}
		let uid = self.next_uid().await?;
		self.set(Dv::new(val).encode(), uid.to_le_bytes().to_vec()).await?;
		self.set(Du::new(uid).encode(), val.to_vec()).await?;
		Ok(uid)
	}

	// --------------------------------------------------
	// Predicate registry methods
	// --------------------------------------------------

	/// Add a predicate name to the registry.
	pub async fn put_pd(&mut self, pd: &str) -> Result<(), Error> {
		let key = Pd::new(pd).encode();
		if !self.exists(key.clone()).await? {
			self.set(key, vec![]).await?;
		}
		Ok(())
	}

	/// Remove a predicate name from the registry.
	pub async fn del_pd(&mut self, pd: &str) -> Result<(), Error> {
		self.del(Pd::new(pd).encode()).await
	}

	/// Fetch every known predicate name, in key order.
	pub async fn all_pd(&mut self) -> Result<Vec<String>, Error> {
		let keys = self.keysr(pd::prefix()..pd::suffix()).await?;
		let mut out = Vec::with_capacity(keys.len());
		for key in keys {
			out.push(Pd::decode(&key)?.pd.to_owned());
		}
		Ok(out)
	}

	// --------------------------------------------------
	// Posting list methods
	// --------------------------------------------------

	/// Fetch the posting list for a subject and predicate, if any.
	pub async fn get_pl(&mut self, pd: &str, sj: Uid) -> Result<Option<Val>, Error> {
		self.get(Pl::new(pd, sj).encode()).await
	}

	/// Store the posting list for a subject and predicate.
	pub async fn set_pl(&mut self, pd: &str, sj: Uid, list: Val) -> Result<(), Error> {
		self.set(Pl::new(pd, sj).encode(), list).await
	}

	/// Delete the posting list for a subject and predicate.
	pub async fn del_pl(&mut self, pd: &str, sj: Uid) -> Result<(), Error> {
		self.del(Pl::new(pd, sj).encode()).await
	}

	/// Fetch every posting list for a predicate, keyed by subject UID.
	pub async fn scan_pl(&mut self, pd: &str) -> Result<Vec<(Uid, Val)>, Error> {
		let res = self.getr(pl::prefix(pd)..pl::suffix(pd)).await?;
		let mut out = Vec::with_capacity(res.len());
		for (key, val) in res {
			out.push((Pl::decode(&key)?.sj, val));
		}
		Ok(out)
	}

	/// Fetch every subject UID with a posting list for a predicate.
	pub async fn sj_pl(&mut self, pd: &str) -> Result<Vec<Uid>, Error> {
		let keys = self.keysr(pl::prefix(pd)..pl::suffix(pd)).await?;
		let mut out = Vec::with_capacity(keys.len());
		for key in keys {
			out.push(Pl::decode(&key)?.sj);
		}
		Ok(out)
	}

	/// Check whether any posting list exists for a predicate.
	pub async fn has_pl(&mut self, pd: &str) -> Result<bool, Error> {
		let keys = self.keys(pl::prefix(pd)..pl::suffix(pd), 1).await?;
		Ok(!keys.is_empty())
	}
}
