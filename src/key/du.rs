//! Maps a UID back to the encoded value it was interned from
use crate::idx::Uid;
use crate::kvs::Key;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct Du {
	pub uid: Uid,
}

impl Du {
	pub fn new(uid: Uid) -> Self {
		Du {
			uid,
		}
	}

	pub fn encode(&self) -> Key {
		let mut k = Vec::with_capacity(12);
		k.extend_from_slice(b"/!du");
		k.extend_from_slice(&self.uid.to_le_bytes());
		k
	}
}

impl From<Du> for Key {
	fn from(v: Du) -> Self {
		v.encode()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn key() {
		let val = Du::new(7);
		let enc = val.encode();
		assert_eq!(enc, b"/!du\x07\x00\x00\x00\x00\x00\x00\x00");
	}
}
