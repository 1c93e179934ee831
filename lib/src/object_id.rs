//! Object identifiers and the framed-object hash function.
//!
//! An [`Oid`] is an opaque, comparable, hex-displayable newtype handle,
//! never a raw `Vec<u8>` passed around by convention.

use std::fmt;

use sha1::Digest as _;
use sha1::Sha1;

pub const OID_HEX_LEN: usize = 40;

/// A 40-character lowercase hex SHA-1 digest identifying an object.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Oid(String);

impl Oid {
    /// Parses a 40-character lowercase hex string into an `Oid`. Returns
    /// `None` for anything else, including uppercase hex or the wrong
    /// length — callers that need a literal OID to exist use this to
    /// distinguish "valid digest" from "not an OID at all".
    pub fn from_hex(hex: impl AsRef<str>) -> Option<Self> {
        let hex = hex.as_ref();
        if hex.len() == OID_HEX_LEN
            && hex
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
        {
            Some(Self(hex.to_string()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Oid").field(&self.0).finish()
    }
}

/// The three object kinds that may appear after the framing NUL byte.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ObjectType {
    Blob,
    Tree,
    Commit,
}

impl ObjectType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Blob => "blob",
            Self::Tree => "tree",
            Self::Commit => "commit",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "blob" => Some(Self::Blob),
            "tree" => Some(Self::Tree),
            "commit" => Some(Self::Commit),
            _ => None,
        }
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Frames `payload` as `<type> NUL <payload>` and returns its OID alongside
/// the exact bytes that must be written to disk.
pub fn hash_framed(object_type: ObjectType, payload: &[u8]) -> (Oid, Vec<u8>) {
    let type_str = object_type.as_str();
    let mut framed = Vec::with_capacity(type_str.len() + 1 + payload.len());
    framed.extend_from_slice(type_str.as_bytes());
    framed.push(0);
    framed.extend_from_slice(payload);

    let mut hasher = Sha1::new();
    hasher.update(&framed);
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(OID_HEX_LEN);
    for byte in digest {
        hex.push_str(&format!("{byte:02x}"));
    }
    (Oid(hex), framed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_sha1_of_framed_record() {
        let (oid, framed) = hash_framed(ObjectType::Blob, b"hello\n");
        assert_eq!(framed, b"blob\0hello\n");
        let mut hasher = Sha1::new();
        hasher.update(&framed);
        let expected: String = hasher
            .finalize()
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect();
        assert_eq!(oid.as_str(), expected);
    }

    #[test]
    fn from_hex_rejects_uppercase_and_wrong_length() {
        assert!(Oid::from_hex("a".repeat(40)).is_some());
        assert!(Oid::from_hex("A".repeat(40)).is_none());
        assert!(Oid::from_hex("a".repeat(39)).is_none());
    }
}
