use super::tx::Transaction;
use crate::err::Error;
use crate::idx::postings;
use crate::key::pl;
use crate::kvs::{LockType, TransactionType};
use crate::qry::exe::QueryExecutor;
use crate::qry::plan::Plan;
use crate::qry::{Matcher, Triple};
use crate::val::codec;
use crate::val::Value;
use std::fmt;

/// The underlying datastore instance which stores the dataset.
#[non_exhaustive]
pub struct Datastore {
	// The inner datastore type
	inner: Inner,
}

pub(super) enum Inner {
	#[cfg(feature = "kv-mem")]
	Mem(super::mem::Datastore),
	#[cfg(feature = "kv-rocksdb")]
	RocksDB(super::rocksdb::Datastore),
}

impl fmt::Display for Datastore {
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

impl Datastore {
	/// Creates a new datastore instance.
	///
	/// The file is locked for exclusive use until the datastore is dropped;
	/// no other process may open it concurrently.
	///
	/// ```rust,no_run
	/// # use tripledb::kvs::Datastore;
	/// # use tripledb::err::Error;
	/// # #[tokio::main]
	/// # async fn main() -> Result<(), Error> {
	/// let ds = Datastore::new("memory").await?;
	/// # Ok(())
	/// # }
	/// ```
	///
	/// Or to create a file-backed store:
	///
	/// ```rust,no_run
	/// # use tripledb::kvs::Datastore;
	/// # use tripledb::err::Error;
	/// # #[tokio::main]
	/// # async fn main() -> Result<(), Error> {
	/// let ds = Datastore::new("file://triples.db").await?;
	/// # Ok(())
	/// # }
	/// ```
	pub async fn new(path: &str) -> Result<Datastore, Error> {
		let inner = match path {
			"memory" => {
				#[cfg(feature = "kv-mem")]
				{
					info!("Starting kvs store in {}", path);
					let v = super::mem::Datastore::new().await.map(Inner::Mem);
					info!("Started kvs store in {}", path);
					v
				}
				#[cfg(not(feature = "kv-mem"))]
				return Err(Error::Ds("Cannot connect to the `memory` storage engine as it is not enabled in this build of TripleDB".to_owned()));
			}
			// Parse and initiate a file database
			s if s.starts_with("file:") => {
				#[cfg(feature = "kv-rocksdb")]
				{
					info!("Starting kvs store at {}", path);
					let s = s.trim_start_matches("file://");
					let s = s.trim_start_matches("file:");
					let v = super::rocksdb::Datastore::new(s).await.map(Inner::RocksDB);
					info!("Started kvs store at {}", path);
					v
				}
				#[cfg(not(feature = "kv-rocksdb"))]
				return Err(Error::Ds("Cannot connect to the `rocksdb` storage engine as it is not enabled in this build of TripleDB".to_owned()));
			}
			// Parse and initiate a RocksDB database
			s if s.starts_with("rocksdb:") => {
				#[cfg(feature = "kv-rocksdb")]
				{
					info!("Starting kvs store at {}", path);
					let s = s.trim_start_matches("rocksdb://");
					let s = s.trim_start_matches("rocksdb:");
					let v = super::rocksdb::Datastore::new(s).await.map(Inner::RocksDB);
					info!("Started kvs store at {}", path);
					v
				}
				#[cfg(not(feature = "kv-rocksdb"))]
				return Err(Error::Ds("Cannot connect to the `rocksdb` storage engine as it is not enabled in this build of TripleDB".to_owned()));
			}
			// The datastore path is not valid
			_ => {
				info!("Unable to load the specified datastore {}", path);
				Err(Error::Ds("Unable to load the specified datastore".to_owned()))
			}
		}?;
		Ok(Datastore {
			inner,
		})
	}

	/// Shut down the datastore, flushing any pending background work.
	pub async fn shutdown(&self) -> Result<(), Error> {
		info!("Stopping kvs store");
		#[allow(unused_variables)]
		match &self.inner {
			#[cfg(feature = "kv-mem")]
			Inner::Mem(_) => Ok(()),
			#[cfg(feature = "kv-rocksdb")]
			Inner::RocksDB(v) => v.shutdown().await,
			#[allow(unreachable_patterns)]
			_ => unreachable!(),
		}
	}

	/// Create a new transaction on this datastore.
	///
	/// ```rust,no_run
	/// use tripledb::kvs::{Datastore, TransactionType::*, LockType::*};
	/// use tripledb::err::Error;
	///
	/// #[tokio::main]
	/// async fn main() -> Result<(), Error> {
	///     let ds = Datastore::new("file://database.db").await?;
	///     let mut tx = ds.transaction(Write, Optimistic).await?;
	///     tx.cancel().await?;
	///     Ok(())
	/// }
	/// ```
	pub async fn transaction(
		&self,
		write: TransactionType,
		lock: LockType,
	) -> Result<Transaction, Error> {
		#![allow(unused_variables)]
		let write = match write {
			TransactionType::Read => false,
			TransactionType::Write => true,
		};
		let lock = match lock {
			LockType::Pessimistic => true,
			LockType::Optimistic => false,
		};
		let inner = match &self.inner {
			#[cfg(feature = "kv-mem")]
			Inner::Mem(v) => {
				let tx = v.transaction(write, lock).await?;
				super::tx::Inner::Mem(tx)
			}
			#[cfg(feature = "kv-rocksdb")]
			Inner::RocksDB(v) => {
				let tx = v.transaction(write, lock).await?;
				super::tx::Inner::RocksDB(tx)
			}
			#[allow(unreachable_patterns)]
			_ => unreachable!(),
		};
		Ok(Transaction {
			inner,
		})
	}

	// --------------------------------------------------
	// Triple operations
	// --------------------------------------------------

	/// Insert triples into the store.
	///
	/// Subjects, predicates and objects are interned on first mention. The
	/// whole batch is applied within a single write transaction, so either
	/// every triple is stored or none is.
	pub async fn insert<I>(&self, triples: I) -> Result<(), Error>
	where
		I: IntoIterator<Item = Triple>,
	{
		let mut tx = self.transaction(TransactionType::Write, LockType::Optimistic).await?;
		if let Err(e) = Self::insert_all(&mut tx, triples).await {
			let _ = tx.cancel().await;
			return Err(e);
		}
		tx.commit().await
	}

	async fn insert_all<I>(tx: &mut Transaction, triples: I) -> Result<(), Error>
	where
		I: IntoIterator<Item = Triple>,
	{
		for triple in triples {
			if !pl::valid(&triple.predicate) {
				return Err(Error::PredicateName {
					name: triple.predicate,
				});
			}
			// Intern the subject and the typed object
			let sj = tx.resolve_uid(triple.subject.as_bytes()).await?;
			let oj = tx.resolve_uid(&codec::encode(&triple.object)).await?;
			// Record the predicate in the registry
			tx.put_pd(&triple.predicate).await?;
			// Splice the object into the posting list
			let mut list = tx.get_pl(&triple.predicate, sj).await?.unwrap_or_default();
			postings::insert(&mut list, oj);
			tx.set_pl(&triple.predicate, sj, list).await?;
		}
		Ok(())
	}

	/// Delete every object bound to a subject and predicate.
	///
	/// Deleting an absent pair is a no-op. Interned values are never
	/// removed from the dictionary; only posting entries are, along with
	/// the registry entry once a predicate's last posting list goes.
	pub async fn delete(&self, subject: &str, predicate: &str) -> Result<(), Error> {
		let mut tx = self.transaction(TransactionType::Write, LockType::Optimistic).await?;
		if let Err(e) = Self::delete_pair(&mut tx, subject, predicate).await {
			let _ = tx.cancel().await;
			return Err(e);
		}
		tx.commit().await
	}

	async fn delete_pair(
		tx: &mut Transaction,
		subject: &str,
		predicate: &str,
	) -> Result<(), Error> {
		let Some(sj) = tx.get_uid(subject.as_bytes()).await? else {
			return Ok(());
		};
		tx.del_pl(predicate, sj).await?;
		// Keep the registry exact: a predicate is registered iff it has
		// at least one posting list
		if !tx.has_pl(predicate).await? {
			tx.del_pd(predicate).await?;
		}
		Ok(())
	}

	/// Delete every triple for a subject, across all known predicates.
	///
	/// As with [`delete`](Datastore::delete), the subject itself stays
	/// interned in the dictionary.
	pub async fn delete_subject(&self, subject: &str) -> Result<(), Error> {
		let mut tx = self.transaction(TransactionType::Write, LockType::Optimistic).await?;
		if let Err(e) = Self::delete_all(&mut tx, subject).await {
			let _ = tx.cancel().await;
			return Err(e);
		}
		tx.commit().await
	}

	async fn delete_all(tx: &mut Transaction, subject: &str) -> Result<(), Error> {
		let Some(sj) = tx.get_uid(subject.as_bytes()).await? else {
			return Ok(());
		};
		for predicate in tx.all_pd().await? {
			tx.del_pl(&predicate, sj).await?;
			if !tx.has_pl(&predicate).await? {
				tx.del_pd(&predicate).await?;
			}
		}
		Ok(())
	}

	/// Query triples matching the given matchers.
	///
	/// Accepts [`Matcher::subjects`] and [`Matcher::predicates`] with
	/// optional constraints; other matchers are rejected. With no
	/// predicates matcher, every registered predicate is scanned, which
	/// visits the whole index and is costly on large datasets.
	pub async fn query(&self, matchers: Vec<Matcher>) -> Result<Vec<Triple>, Error> {
		let exe = QueryExecutor::new(Plan::for_triples(matchers)?);
		let mut tx = self.transaction(TransactionType::Read, LockType::Optimistic).await?;
		let res = exe.triples(&mut tx).await;
		let _ = tx.cancel().await;
		res
	}

	/// Query object values matching the given matchers.
	///
	/// Accepts the same matchers as [`query`](Datastore::query), and
	/// returns just the object side of every matching triple, in the same
	/// order.
	pub async fn query_objects(&self, matchers: Vec<Matcher>) -> Result<Vec<Value>, Error> {
		let exe = QueryExecutor::new(Plan::for_triples(matchers)?);
		let mut tx = self.transaction(TransactionType::Read, LockType::Optimistic).await?;
		let res = exe.objects(&mut tx).await;
		let _ = tx.cancel().await;
		res
	}

	/// Check whether any triple matches the given matchers.
	///
	/// Accepts the same matchers as [`query`](Datastore::query), and stops
	/// at the first match.
	pub async fn has(&self, matchers: Vec<Matcher>) -> Result<bool, Error> {
		let exe = QueryExecutor::new(Plan::for_triples(matchers)?);
		let mut tx = self.transaction(TransactionType::Read, LockType::Optimistic).await?;
		let res = exe.has(&mut tx).await;
		let _ = tx.cancel().await;
		res
	}

	/// Query subjects matching the given matchers.
	///
	/// Accepts the full matcher set. Each predicates matcher narrows the
	/// result to subjects with at least one surviving object, the without
	/// matcher excludes subjects, and sort and limit order and truncate
	/// the result.
	pub async fn query_subjects(&self, matchers: Vec<Matcher>) -> Result<Vec<String>, Error> {
		let exe = QueryExecutor::new(Plan::for_subjects(matchers)?);
		let mut tx = self.transaction(TransactionType::Read, LockType::Optimistic).await?;
		let res = exe.subjects(&mut tx).await;
		let _ = tx.cancel().await;
		res
	}
}
