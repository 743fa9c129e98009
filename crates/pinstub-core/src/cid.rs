//! # Content Identifiers — CIDv1 over Raw Bytes
//!
//! Defines `ContentId`, the address a pinned object is stored and reported
//! under. Every identifier this crate issues has the same shape:
//!
//! | part      | value                   |
//! |-----------|-------------------------|
//! | version   | 1                       |
//! | codec     | `raw` (0x55)            |
//! | multihash | `sha2-256` (0x12), 32 B |
//! | text form | base32-lower, `b` prefix |
//!
//! Parsing accepts exactly that shape and nothing else, so a `ContentId`
//! in hand is always one the addresser could have produced.

use std::fmt;
use std::str::FromStr;

use cid::multihash::Multihash;
use cid::{Cid, Version};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::error::CidError;

/// Multicodec code for raw binary content.
pub const RAW_CODEC: u64 = 0x55;

/// Multihash code for SHA-256.
pub const SHA2_256_CODE: u64 = 0x12;

const SHA2_256_LEN: usize = 32;

/// A CIDv1 identifying a byte sequence by its SHA-256 digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentId(Cid);

impl ContentId {
    /// Address a byte sequence.
    ///
    /// Pure and total: the same bytes always yield the same identifier.
    pub fn for_bytes(data: impl AsRef<[u8]>) -> Self {
        let digest = Sha256::digest(data.as_ref());
        // Only fails for digests longer than the 64-byte bound.
        let mh = Multihash::<64>::wrap(SHA2_256_CODE, &digest)
            .expect("sha2-256 digest fits in a 64-byte multihash");
        Self(Cid::new_v1(RAW_CODEC, mh))
    }

    /// Parse and validate the text form of an identifier.
    ///
    /// # Errors
    ///
    /// `Malformed` if the text is not a CID or not in base32-lower form;
    /// `UnsupportedVersion`, `UnsupportedCodec` or `UnsupportedHash` if it
    /// is a CID of a shape this crate never issues.
    pub fn parse(input: &str) -> Result<Self, CidError> {
        let cid = Cid::try_from(input).map_err(|e| CidError::Malformed {
            input: input.to_string(),
            reason: e.to_string(),
        })?;

        if cid.version() != Version::V1 {
            return Err(CidError::UnsupportedVersion(u64::from(cid.version())));
        }
        if cid.codec() != RAW_CODEC {
            return Err(CidError::UnsupportedCodec(cid.codec()));
        }
        let hash = cid.hash();
        if hash.code() != SHA2_256_CODE || hash.digest().len() != SHA2_256_LEN {
            return Err(CidError::UnsupportedHash {
                code: hash.code(),
                len: hash.digest().len(),
            });
        }

        // Other multibase encodings decode to the same CID; only the
        // canonical text is accepted so that file names stay unique.
        if cid.to_string() != input {
            return Err(CidError::Malformed {
                input: input.to_string(),
                reason: "not base32-lower".to_string(),
            });
        }

        Ok(Self(cid))
    }

    /// The raw 32-byte SHA-256 digest.
    pub fn digest(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        out.copy_from_slice(self.0.hash().digest());
        out
    }

    /// Borrow the underlying [`Cid`].
    pub fn as_cid(&self) -> &Cid {
        &self.0
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for ContentId {
    type Err = CidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ContentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ContentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}
