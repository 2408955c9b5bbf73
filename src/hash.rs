//! The content hash that gives every [`Blob`](crate::blob::Blob) its identity.
//!
//! A [`BlobHash`] is the lowercase-hex SHA-256 digest of a byte sequence. It
//! is used as the primary key of the blob store, as the value type of every
//! manifest, and on the wire wherever a file's content needs to be named
//! unambiguously.

#[cfg(test)]
#[path = "tests/hash.rs"]
mod tests;

//		Packages

use core::{
	fmt::{self, Display},
	str::FromStr,
};
use serde::{
	Deserialize,
	Deserializer,
	Serialize,
	Serializer,
	de::{Error as DeError, Visitor},
};
use sha2::{Digest, Sha256};



//		Constants

/// The length in bytes of a SHA-256 digest.
const DIGEST_LEN: usize = 32;



//		Structs

//		BlobHash
/// The SHA-256 content hash of a blob, hex-encoded on the wire.
///
/// Two blobs with identical bytes always produce equal [`BlobHash`] values,
/// and the converse holds with overwhelming probability — this is exactly
/// the property the blob store relies on for deduplication (invariant B1).
#[derive(Clone, Copy, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct BlobHash([u8; DIGEST_LEN]);

//󰭅		BlobHash
impl BlobHash {
	//		of
	/// Computes the content hash of a byte sequence.
	#[must_use]
	pub fn of(bytes: &[u8]) -> Self {
		let mut hasher = Sha256::new();
		hasher.update(bytes);
		Self(hasher.finalize().into())
	}

	//		from_bytes
	/// Constructs a hash directly from raw digest bytes, without hashing
	/// anything — used where a digest has already been computed elsewhere
	/// (e.g. incrementally, while streaming a download).
	#[must_use]
	pub const fn from_bytes(bytes: [u8; DIGEST_LEN]) -> Self {
		Self(bytes)
	}

	//		as_bytes
	/// The raw digest bytes.
	#[must_use]
	pub const fn as_bytes(&self) -> &[u8; DIGEST_LEN] {
		&self.0
	}

	//		to_hex
	/// The lowercase-hex representation of the digest.
	#[must_use]
	pub fn to_hex(&self) -> String {
		hex::encode(self.0)
	}
}

//󰭅		Debug
impl fmt::Debug for BlobHash {
	//		fmt
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "BlobHash({})", self.to_hex())
	}
}

//󰭅		Display
impl Display for BlobHash {
	//		fmt
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.to_hex())
	}
}

//		HashParseError
/// An error parsing a [`BlobHash`] from a string.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum HashParseError {
	/// The string was not valid hex.
	#[error("invalid hex in hash: {0}")]
	InvalidHex(String),

	/// The decoded bytes were not 32 bytes long.
	#[error("hash must be {DIGEST_LEN} bytes, got {0}")]
	WrongLength(usize),
}

//󰭅		FromStr
impl FromStr for BlobHash {
	type Err = HashParseError;

	//		from_str
	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let bytes = hex::decode(s).map_err(|_err| HashParseError::InvalidHex(s.to_owned()))?;
		let array: [u8; DIGEST_LEN] = bytes.clone().try_into().map_err(|_err| HashParseError::WrongLength(bytes.len()))?;
		Ok(Self(array))
	}
}

//󰭅		Serialize
impl Serialize for BlobHash {
	//		serialize
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(&self.to_hex())
	}
}

//		HashVisitor
/// [`Visitor`] that decodes a [`BlobHash`] from a hex string.
struct HashVisitor;

//󰭅		Visitor
impl Visitor<'_> for HashVisitor {
	type Value = BlobHash;

	//		expecting
	fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
		formatter.write_str("a lowercase-hex SHA-256 digest")
	}

	//		visit_str
	fn visit_str<E: DeError>(self, v: &str) -> Result<Self::Value, E> {
		v.parse().map_err(DeError::custom)
	}
}

//󰭅		Deserialize
impl<'de> Deserialize<'de> for BlobHash {
	//		deserialize
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		deserializer.deserialize_str(HashVisitor)
	}
}
