//! Stores the posting list for a (subject, predicate) pair
use crate::err::Error;
use crate::idx::Uid;
use crate::kvs::Key;

#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct Pl<'a> {
	pub pd: &'a str,
	pub sj: Uid,
}

/// Returns the first possible posting key for a predicate.
pub fn prefix(pd: &str) -> Key {
	let mut k = Vec::with_capacity(3 + pd.len());
	k.extend_from_slice(b"/*");
	k.extend_from_slice(pd.as_bytes());
	k.push(0x00);
	k
}

/// Returns the first key after every posting key for a predicate.
pub fn suffix(pd: &str) -> Key {
	let mut k = Vec::with_capacity(3 + pd.len());
	k.extend_from_slice(b"/*");
	k.extend_from_slice(pd.as_bytes());
	k.push(0x01);
	k
}

/// Predicate names sit before the NUL separator, so they must not contain
/// NUL bytes themselves.
pub fn valid(pd: &str) -> bool {
	!pd.contains('\0')
}

impl<'a> Pl<'a> {
	pub fn new(pd: &'a str, sj: Uid) -> Self {
		Pl {
			pd,
			sj,
		}
	}

	pub fn encode(&self) -> Key {
		let mut k = Vec::with_capacity(11 + self.pd.len());
		k.extend_from_slice(b"/*");
		k.extend_from_slice(self.pd.as_bytes());
		k.push(0x00);
		k.extend_from_slice(&self.sj.to_le_bytes());
		k
	}

	/// Decode a posting key, slicing the subject UID from the fixed-width
	/// suffix so that the predicate length is irrelevant.
	pub fn decode(key: &'a [u8]) -> Result<Self, Error> {
		let rest = match key.strip_prefix(b"/*".as_slice()) {
			Some(v) if v.len() >= 9 => v,
			_ => return Err(Error::KeyEncoding("not a posting key".to_owned())),
		};
		let (pd, sj) = rest.split_at(rest.len() - 9);
		let (sep, sj) = (sj[0], &sj[1..]);
		if sep != 0x00 {
			return Err(Error::KeyEncoding("missing posting key separator".to_owned()));
		}
		let pd = match std::str::from_utf8(pd) {
			Ok(pd) => pd,
			Err(e) => return Err(Error::KeyEncoding(e.to_string())),
		};
		match sj.try_into() {
			Ok(sj) => Ok(Pl::new(pd, u64::from_le_bytes(sj))),
			Err(_) => Err(Error::KeyEncoding("invalid posting key subject".to_owned())),
		}
	}
}

impl From<Pl<'_>> for Key {
	fn from(v: Pl<'_>) -> Self {
		v.encode()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn key() {
		let val = Pl::new("firstName", 1);
		let enc = val.encode();
		assert_eq!(enc, b"/*firstName\x00\x01\x00\x00\x00\x00\x00\x00\x00");

		let dec = Pl::decode(&enc).unwrap();
		assert_eq!(val, dec);
	}

	#[test]
	fn range() {
		let enc = Pl::new("eats", 42).encode();
		assert!(prefix("eats") <= enc);
		assert!(enc < suffix("eats"));
		// Keys of other predicates fall outside the range
		assert!(Pl::new("eatss", 42).encode() > suffix("eats"));
	}

	#[test]
	fn validity() {
		assert!(valid("lives-in"));
		assert!(valid(""));
		assert!(!valid("lives\0in"));
	}
}
