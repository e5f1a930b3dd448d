//! The module defining the key value store.
//! Everything related to a transaction on the key value store is defined in
//! the `tx.rs` file. Transactions can be processed by the following storage
//! engines:
//! - `mem`: in-memory database
//! - `rocksdb`: [RocksDB](https://github.com/facebook/rocksdb) an embeddable persistent key-value store for fast storage
mod api;
mod ds;
mod kv;
mod mem;
mod rocksdb;
mod tx;

#[cfg(test)]
mod tests;

pub use self::ds::*;
pub use self::kv::*;
pub use self::tx::*;
