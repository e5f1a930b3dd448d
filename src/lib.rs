//! An embedded, transactional triple store.
//!
//! `tripledb` persists facts of the form (subject, predicate, object) in an
//! ordered key value store, and answers pattern queries over them with
//! optional value constraints, sorting and limiting. Subjects and predicates
//! are strings; objects are typed scalars whose on-disk encoding preserves
//! their natural ordering.
//!
//! ```rust,no_run
//! use tripledb::{Datastore, Matcher, Triple};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), tripledb::Error> {
//! 	let ds = Datastore::new("memory").await?;
//! 	ds.insert([
//! 		Triple::new("john", "firstName", "John"),
//! 		Triple::new("john", "age", 20),
//! 	])
//! 	.await?;
//! 	let triples = ds.query(vec![Matcher::predicates(["age"]).gt(18)]).await?;
//! 	assert_eq!(triples.len(), 1);
//! 	Ok(())
//! }
//! ```

#[macro_use]
extern crate tracing;

#[macro_use]
mod mac;

pub mod cnf;
pub mod err;
#[doc(hidden)]
pub mod idx;
#[doc(hidden)]
pub mod key;
pub mod kvs;
pub mod qry;
pub mod val;

pub use self::err::Error;
pub use self::kvs::{Datastore, LockType, Transaction, TransactionType};
pub use self::qry::{Constraint, Direction, Matcher, Triple};
pub use self::val::{Kind, Value};
