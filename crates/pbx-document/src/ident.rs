//! Opaque object identifiers
//!
//! Provides [`ObjectId`], the fixed-width token keying an object in a project
//! document, and [`IdentifierPool`], which issues fresh identifiers that
//! collide with nothing already present in a document.

use std::collections::HashSet;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use once_cell::sync::Lazy;
use rand::rngs::OsRng;
use rand::RngCore;
use regex::Regex;

use crate::document::ProjectDocument;

/// A 24-character uppercase-hex object identifier
///
/// Stored as the 12 raw bytes it encodes. Immutable and cheap to clone (Copy).
/// The host format treats these as opaque primary keys; uniqueness is
/// probabilistic (drawn from the OS random source), not checked globally;
/// use [`IdentifierPool`] for session-scoped collision hardening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ObjectId([u8; 12]);

impl ObjectId {
    /// Rendered width in characters
    pub const WIDTH: usize = 24;

    /// Create a new ObjectId from raw bytes
    #[inline]
    #[must_use]
    pub const fn new(bytes: [u8; 12]) -> Self {
        Self(bytes)
    }

    /// Get reference to the underlying bytes
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 12] {
        &self.0
    }

    /// Create an identifier from a byte slice
    ///
    /// # Errors
    /// Returns error if the slice length is not exactly 12 bytes
    #[inline]
    pub fn from_slice(bytes: &[u8]) -> Result<Self, IdentError> {
        if bytes.len() != 12 {
            return Err(IdentError::InvalidLength {
                expected: 12,
                actual: bytes.len(),
            });
        }
        let mut arr = [0u8; 12];
        arr.copy_from_slice(bytes);
        Ok(Self(arr))
    }

    /// Draw a fresh identifier from the OS random source
    ///
    /// Collision probability is negligible at session-scale call counts
    /// (12 random bytes), but not zero; callers that must not collide with
    /// identifiers already in a document go through [`IdentifierPool::issue`].
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; 12];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }
}

impl Display for ObjectId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode_upper(self.0))
    }
}

impl FromStr for ObjectId {
    type Err = IdentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != Self::WIDTH {
            return Err(IdentError::InvalidLength {
                expected: 12,
                actual: s.len() / 2,
            });
        }
        let bytes = hex::decode(s)?;
        Self::from_slice(&bytes)
    }
}

impl serde::Serialize for ObjectId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for ObjectId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct ObjectIdVisitor;

        impl serde::de::Visitor<'_> for ObjectIdVisitor {
            type Value = ObjectId;

            fn expecting(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
                formatter.write_str("a 24-character hex object identifier")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                value.parse().map_err(serde::de::Error::custom)
            }
        }

        deserializer.deserialize_str(ObjectIdVisitor)
    }
}

/// Errors that can occur when working with object identifiers
#[derive(Debug, thiserror::Error)]
pub enum IdentError {
    /// Invalid identifier length
    #[error("invalid identifier length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    /// Hex encoding error
    #[error("hex decode error: {0}")]
    HexDecode(#[from] hex::FromHexError),
}

static ID_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[0-9A-F]{24}\b").expect("identifier token pattern"));

/// Session-scoped identifier issuance
///
/// Holds every identifier known to be taken: those scanned out of the
/// document at session start plus those issued during the session.
/// [`issue`](Self::issue) re-rolls on collision before returning, so all
/// identifiers issued within one session are pairwise distinct and distinct
/// from every identifier the document already contained.
#[derive(Debug, Default)]
pub struct IdentifierPool {
    taken: HashSet<ObjectId>,
}

impl IdentifierPool {
    /// Empty pool (nothing reserved)
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a pool from every identifier-shaped token in the document
    #[must_use]
    pub fn scan(document: &ProjectDocument) -> Self {
        let taken = ID_TOKEN
            .find_iter(document.as_str())
            .filter_map(|m| m.as_str().parse().ok())
            .collect();
        Self { taken }
    }

    /// Issue a fresh identifier, re-rolling until it collides with nothing
    pub fn issue(&mut self) -> ObjectId {
        loop {
            let id = ObjectId::generate();
            if self.taken.insert(id) {
                return id;
            }
        }
    }

    /// Whether an identifier is already reserved
    #[inline]
    #[must_use]
    pub fn contains(&self, id: &ObjectId) -> bool {
        self.taken.contains(id)
    }

    /// Reserve an externally-known identifier
    pub fn reserve(&mut self, id: ObjectId) {
        self.taken.insert(id);
    }

    /// Number of reserved identifiers
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.taken.len()
    }

    /// Whether the pool is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.taken.is_empty()
    }
}
