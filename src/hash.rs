// src/hash.rs

//! Content addressing for Lingquan resources
//!
//! Lingquan names every resource directory after a narrowed MD5 of the file's
//! bytes: the digest is rendered as hex, only the high nibble of each byte is
//! kept, and the 16 resulting digits are upper-cased and prefixed with `FM`.
//!
//! | Input | MD5 | ContentId |
//! |-------|-----|-----------|
//! | `""` | `d41d8cd98f00b204e9800998ecf8427e` | `FMD18D80B0E809EF47` |
//! | `"hello"` | `5d41402abc4b2a76b9719d911017c592` | `FM5442B427B79911C9` |
//!
//! Only 64 bits of the 128-bit digest survive, so two different files collide
//! far more often than a full MD5 would. The scheme must stay bit-exact to
//! interoperate with existing Lingquan libraries.

use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::str::FromStr;

/// Literal prefix of every resource id
pub const CONTENT_ID_PREFIX: &str = "FM";

/// Number of hex digits following the prefix (one per digest byte)
pub const CONTENT_ID_DIGITS: usize = 16;

const HEX_UPPER: &[u8; 16] = b"0123456789ABCDEF";

/// Content id parse errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentIdError {
    /// Missing the `FM` prefix
    MissingPrefix(String),
    /// Wrong number of digits after the prefix
    InvalidLength { expected: usize, got: usize },
    /// Digits are not uppercase hex
    InvalidDigits(String),
}

impl fmt::Display for ContentIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingPrefix(s) => {
                write!(f, "content id must start with {}: {}", CONTENT_ID_PREFIX, s)
            }
            Self::InvalidLength { expected, got } => {
                write!(f, "invalid content id length: expected {}, got {}", expected, got)
            }
            Self::InvalidDigits(s) => write!(f, "invalid digits in content id: {}", s),
        }
    }
}

impl std::error::Error for ContentIdError {}

/// Identifier of a resource, derived from its bytes
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentId(String);

impl ContentId {
    /// Compute the id of an in-memory buffer
    pub fn from_bytes(data: &[u8]) -> Self {
        Self::from_digest(&Md5::digest(data))
    }

    /// Compute the id of everything left in a reader
    pub fn from_reader<R: Read>(reader: &mut R) -> io::Result<Self> {
        let mut hasher = Md5::new();
        let mut buffer = [0u8; 8192];

        loop {
            let n = reader.read(&mut buffer)?;
            if n == 0 {
                break;
            }
            hasher.update(&buffer[..n]);
        }

        Ok(Self::from_digest(&hasher.finalize()))
    }

    /// Compute the id of a file on disk, streaming its content
    pub fn from_file(path: &Path) -> io::Result<Self> {
        let mut file = File::open(path)?;
        Self::from_reader(&mut file)
    }

    /// Narrow a raw digest to its high nibbles
    fn from_digest(digest: &[u8]) -> Self {
        let mut value = String::with_capacity(CONTENT_ID_PREFIX.len() + digest.len());
        value.push_str(CONTENT_ID_PREFIX);
        for byte in digest {
            value.push(HEX_UPPER[(byte >> 4) as usize] as char);
        }
        Self(value)
    }

    /// Validate a textual id
    pub fn parse(s: &str) -> Result<Self, ContentIdError> {
        let digits = s
            .strip_prefix(CONTENT_ID_PREFIX)
            .ok_or_else(|| ContentIdError::MissingPrefix(s.to_string()))?;

        if digits.len() != CONTENT_ID_DIGITS {
            return Err(ContentIdError::InvalidLength {
                expected: CONTENT_ID_DIGITS,
                got: digits.len(),
            });
        }

        if !digits.bytes().all(|b| HEX_UPPER.contains(&b)) {
            return Err(ContentIdError::InvalidDigits(s.to_string()));
        }

        Ok(Self(s.to_string()))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ContentId {
    type Err = ContentIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ContentId {
    type Error = ContentIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ContentId> for String {
    fn from(id: ContentId) -> Self {
        id.0
    }
}

impl AsRef<str> for ContentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
