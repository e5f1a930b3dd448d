#![cfg(feature = "kv-mem")]

mod reopen;
mod triples;

use super::Datastore;

pub(crate) async fn new_ds() -> Datastore {
	Datastore::new("memory").await.unwrap()
}
