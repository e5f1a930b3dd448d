//! Stores the name of a known predicate
use crate::err::Error;
use crate::kvs::Key;

#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct Pd<'a> {
	pub pd: &'a str,
}

pub fn prefix() -> Key {
	b"/!pd".to_vec()
}

pub fn suffix() -> Key {
	b"/!pe".to_vec()
}

impl<'a> Pd<'a> {
	pub fn new(pd: &'a str) -> Self {
		Pd {
			pd,
		}
	}

	pub fn encode(&self) -> Key {
		let mut k = Vec::with_capacity(4 + self.pd.len());
		k.extend_from_slice(b"/!pd");
		k.extend_from_slice(self.pd.as_bytes());
		k
	}

	pub fn decode(key: &'a [u8]) -> Result<Self, Error> {
		let pd = match key.strip_prefix(b"/!pd".as_slice()) {
			Some(v) => v,
			None => return Err(Error::KeyEncoding("not a predicate registry key".to_owned())),
		};
		match std::str::from_utf8(pd) {
			Ok(pd) => Ok(Pd::new(pd)),
			Err(e) => Err(Error::KeyEncoding(e.to_string())),
		}
	}
}

impl From<Pd<'_>> for Key {
	fn from(v: Pd<'_>) -> Self {
		v.encode()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn key() {
		let val = Pd::new("firstName");
		let enc = val.encode();
		assert_eq!(enc, b"/!pdfirstName");

		let dec = Pd::decode(&enc).unwrap();
		assert_eq!(val, dec);
	}

	#[test]
	fn range() {
		assert!(prefix() <= Pd::new("").encode());
		assert!(Pd::new("zzz").encode() < suffix());
	}
}
