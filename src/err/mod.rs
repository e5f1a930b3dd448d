use crate::val::Kind;
use thiserror::Error;

/// An error originating from the triple store.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
	/// Couldn't open the underlying datastore
	#[error("Couldn't setup connection to underlying datastore: {0}")]
	Ds(String),

	/// There was an error with the underlying transaction
	#[error("There was a problem with a datastore transaction: {0}")]
	Tx(String),

	/// The transaction was already cancelled or committed
	#[error("Couldn't update a finished transaction")]
	TxFinished,

	/// The current transaction was created as read-only
	#[error("Couldn't write to a read only transaction")]
	TxReadonly,

	/// An encoded value carries a kind tag which this build does not support
	#[error("Unsupported value kind with tag {tag}")]
	UnknownType {
		tag: u8,
	},

	/// Values of two different kinds were compared
	#[error("Cannot compare a value of kind {expected} with a value of kind {found}")]
	TypeMismatch {
		expected: Kind,
		found: Kind,
	},

	/// An encoded value was truncated or otherwise malformed
	#[error("Invalid value encoding: {0}")]
	ValueEncoding(String),

	/// A key read back from the datastore could not be decoded
	#[error("Invalid key encoding: {0}")]
	KeyEncoding(String),

	/// A matcher was passed to an operation which does not support it
	#[error("The {matcher} matcher is not supported by this operation")]
	MatcherNotSupported {
		matcher: &'static str,
	},

	/// A constraint or direction was chained onto the wrong kind of matcher
	#[error("Invalid matcher: {0}")]
	MatcherMalformed(&'static str),

	/// Predicate names are embedded in the posting keyspace, so they must
	/// not contain NUL bytes
	#[error("Invalid predicate name `{name}`")]
	PredicateName {
		name: String,
	},

	/// A string read back from the datastore was not valid UTF-8
	#[error("Utf8 error: {0}")]
	Utf8Error(#[from] std::string::FromUtf8Error),
}

#[cfg(feature = "kv-mem")]
impl From<echodb::err::Error> for Error {
	fn from(e: echodb::err::Error) -> Error {
		Error::Tx(e.to_string())
	}
}

#[cfg(feature = "kv-rocksdb")]
impl From<rocksdb::Error> for Error {
	fn from(e: rocksdb::Error) -> Error {
		Error::Tx(e.to_string())
	}
}
