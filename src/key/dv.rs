//! Maps an encoded value (or raw subject or predicate string) to its UID
use crate::kvs::Key;

#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct Dv<'a> {
	pub val: &'a [u8],
}

impl<'a> Dv<'a> {
	pub fn new(val: &'a [u8]) -> Self {
		Dv {
			val,
		}
	}

	pub fn encode(&self) -> Key {
		let mut k = Vec::with_capacity(4 + self.val.len());
		k.extend_from_slice(b"/!dv");
		k.extend_from_slice(self.val);
		k
	}
}

impl From<Dv<'_>> for Key {
	fn from(v: Dv<'_>) -> Self {
		v.encode()
	}
}
