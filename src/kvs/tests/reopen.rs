#![cfg(feature = "kv-rocksdb")]

use crate::kvs::Datastore;
use crate::qry::{Matcher, Triple};

#[tokio::test]
async fn triples_survive_a_reopen() {
	let dir = temp_dir::TempDir::new().unwrap();
	let path = format!("rocksdb:{}", dir.path().join("triples.db").display());
	// Insert into a fresh store
	{
		let ds = Datastore::new(&path).await.unwrap();
		ds.insert([
			Triple::new("john", "firstName", "John"),
			Triple::new("john", "age", 20),
		])
		.await
		.unwrap();
		ds.shutdown().await.unwrap();
	}
	// Reopen and read everything back
	{
		let ds = Datastore::new(&path).await.unwrap();
		let res = ds.query(vec![]).await.unwrap();
		assert_eq!(res.len(), 2);
		assert!(res.contains(&Triple::new("john", "firstName", "John")));
		assert!(res.contains(&Triple::new("john", "age", 20)));
		// New uids continue after the persisted counter
		let res = ds.query(vec![Matcher::predicates(["age"]).eq(20)]).await.unwrap();
		assert_eq!(res, vec![Triple::new("john", "age", 20)]);
	}
}
