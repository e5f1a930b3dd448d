//! How the keys are structured in the key value store
///
/// crate::key::sq                       /!sq
/// crate::key::dv                       /!dv{val}
/// crate::key::du                       /!du{uid}
/// crate::key::pd                       /!pd{pd}
/// crate::key::pl                       /*{pd}\x00{sj}
///
/// The `dv` and `du` keys form the two directions of the dictionary: an
/// encoded value (or a raw subject or predicate string) maps to its UID, and
/// the UID maps back to the bytes it was interned from. The distinct `dv` /
/// `du` markers keep an 8 byte payload from ever colliding with a UID key.
///
/// The `pl` keys partition posting lists by predicate: every posting list
/// for one predicate lives in a contiguous range of the keyspace, bounded by
/// [`pl::prefix`] and [`pl::suffix`]. The subject UID sits in a fixed-width
/// suffix after the NUL separator, so it can be recovered by slicing from
/// the end of the key regardless of the predicate length. This is also why
/// predicate names must not contain NUL bytes.
pub mod debug;
pub mod du;
pub mod dv;
pub mod pd;
pub mod pl;
pub mod sq;
