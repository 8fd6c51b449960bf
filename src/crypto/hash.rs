use serde::de::Error as SerdeError;
use serde::{Deserialize, Serialize};
use std::{
    convert::TryInto,
    fmt::{Display, Error, Formatter},
    str::FromStr,
};

use crate::config::HASH_SIZE;
use crate::error::Result;
use crate::serializer::{Reader, Writer};
use crate::serializer::Serializer;

/// A 32-byte BLAKE2b-256 digest: a header hash, a trie node commitment, or a
/// derived trie key.
#[derive(Eq, PartialEq, PartialOrd, Ord, Clone, Copy, Debug, Hash)]
pub struct Hash([u8; HASH_SIZE]);

impl Hash {
    pub const fn new(bytes: [u8; HASH_SIZE]) -> Self {
        Hash(bytes)
    }

    pub const fn zero() -> Self {
        Hash::new([0; HASH_SIZE])
    }

    pub fn as_bytes(&self) -> &[u8; HASH_SIZE] {
        &self.0
    }

    pub fn to_bytes(self) -> [u8; HASH_SIZE] {
        self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl FromStr for Hash {
    type Err = &'static str;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|_| "invalid hex string")?;
        let bytes: [u8; HASH_SIZE] = bytes.try_into().map_err(|_| "invalid hash length")?;
        Ok(Hash::new(bytes))
    }
}

/// BLAKE2b-256 of an arbitrary byte string.
///
/// This is the single hash primitive the kernel relies on: header hashing,
/// solution hashing, and every trie node commitment go through it.
#[inline(always)]
pub fn blake2b_256(data: &[u8]) -> Hash {
    let digest = blake2b_simd::Params::new().hash_length(HASH_SIZE).hash(data);
    let mut out = [0u8; HASH_SIZE];
    out.copy_from_slice(digest.as_bytes());
    Hash(out)
}

impl Serializer for Hash {
    fn read(reader: &mut Reader) -> Result<Self> {
        reader.read_hash()
    }

    fn write(&self, writer: &mut Writer) {
        writer.write_hash(self);
    }

    fn size(&self) -> usize {
        HASH_SIZE
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Display for Hash {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::result::Result<(), Error> {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for Hash {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'a> Deserialize<'a> for Hash {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'a>,
    {
        let hex_str = String::deserialize(deserializer)?;
        if hex_str.len() != HASH_SIZE * 2 {
            return Err(SerdeError::custom("invalid hex length"));
        }
        let decoded = hex::decode(hex_str).map_err(SerdeError::custom)?;
        let bytes: [u8; HASH_SIZE] = decoded
            .try_into()
            .map_err(|_| SerdeError::custom("could not turn hex into a 32-byte hash"))?;
        Ok(Hash::new(bytes))
    }
}
