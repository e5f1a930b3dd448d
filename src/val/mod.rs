pub(crate) mod codec;

use std::fmt;

/// The kind of a stored [`Value`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Kind {
	Strand,
	Bool,
	Int,
	Uint,
	Float,
}

impl fmt::Display for Kind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Kind::Strand => write!(f, "strand"),
			Kind::Bool => write!(f, "bool"),
			Kind::Int => write!(f, "int"),
			Kind::Uint => write!(f, "uint"),
			Kind::Float => write!(f, "float"),
		}
	}
}

/// A typed scalar value, stored as the object of a triple.
///
/// Values of different kinds never compare equal, and are interned under
/// distinct UIDs: the integer `30` and the string `"30"` are different
/// objects.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
	/// A UTF-8 string
	Strand(String),
	/// A boolean
	Bool(bool),
	/// A signed 64-bit integer
	Int(i64),
	/// An unsigned 64-bit integer
	Uint(u64),
	/// A 64-bit floating point number
	Float(f64),
}

impl Value {
	/// Returns the kind of this value.
	pub fn kind(&self) -> Kind {
		match self {
			Value::Strand(_) => Kind::Strand,
			Value::Bool(_) => Kind::Bool,
			Value::Int(_) => Kind::Int,
			Value::Uint(_) => Kind::Uint,
			Value::Float(_) => Kind::Float,
		}
	}
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Value::Strand(v) => write!(f, "{v}"),
			Value::Bool(v) => write!(f, "{v}"),
			Value::Int(v) => write!(f, "{v}"),
			Value::Uint(v) => write!(f, "{v}"),
			Value::Float(v) => write!(f, "{v}"),
		}
	}
}

impl From<&str> for Value {
	fn from(v: &str) -> Self {
		Value::Strand(v.to_owned())
	}
}

impl From<String> for Value {
	fn from(v: String) -> Self {
		Value::Strand(v)
	}
}

impl From<bool> for Value {
	fn from(v: bool) -> Self {
		Value::Bool(v)
	}
}

impl From<i64> for Value {
	fn from(v: i64) -> Self {
		Value::Int(v)
	}
}

impl From<i32> for Value {
	fn from(v: i32) -> Self {
		Value::Int(v as i64)
	}
}

impl From<u64> for Value {
	fn from(v: u64) -> Self {
		Value::Uint(v)
	}
}

impl From<f64> for Value {
	fn from(v: f64) -> Self {
		Value::Float(v)
	}
}

impl From<f32> for Value {
	fn from(v: f32) -> Self {
		Value::Float(v as f64)
	}
}
