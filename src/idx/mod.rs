pub(crate) mod postings;

use crate::err::Error;

/// A UID is a 64-bit identifier for an interned string or typed value.
/// UID `0` is reserved and never issued.
pub type Uid = u64;

/// Decode a single 8 byte little-endian UID record.
pub(crate) fn uid_from_val(val: &[u8]) -> Result<Uid, Error> {
	match val.try_into() {
		Ok(v) => Ok(u64::from_le_bytes(v)),
		Err(_) => Err(Error::ValueEncoding("expected an 8 byte uid record".to_owned())),
	}
}
