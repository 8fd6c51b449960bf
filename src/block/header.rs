//! The fixed-layout block header and its lazy hash cache.

use std::cell::RefCell;

use crate::config::{HASH_SIZE, HEADER_PRE_SIZE, MAX_SOL_SIZE, NONCE_SIZE};
use crate::crypto::{accumulate, blake2b_256, Hash, Work};
use crate::difficulty::bits_to_target_u256;
use crate::error::{Result, VerifyError};
use crate::serializer::{Reader, Serializer, Writer};

/// A header's non-serialized, locally-derived bookkeeping.
///
/// None of this travels on the wire: it is recomputed or attached by the
/// surrounding chain logic, which this crate does not implement.
#[derive(Debug, Default)]
pub struct HeaderState {
    /// Position of this header in its chain. Not interpreted here.
    pub height: u64,
    /// Cumulative chain work up to and including this header.
    pub work: Option<crate::crypto::Work>,
    /// Opaque link to a successor header, used by external chain bookkeeping.
    /// Cleared on [`Header::clone`].
    pub next: Option<Hash>,
}

impl Clone for HeaderState {
    fn clone(&self) -> Self {
        // A cloned header does not inherit its source's forward link.
        HeaderState {
            height: self.height,
            work: self.work,
            next: None,
        }
    }
}

/// A block header: the 9-field wire record plus its derived state.
///
/// The hash cache is a single-assignment cell: the first call to [`Header::hash`]
/// computes and stores it, every later call returns the stored value. This is
/// a *single-writer-per-header* contract, not a thread-safe one -- racing two
/// first-hash calls on a header shared across threads is undefined by design;
/// the caller must serialize that, or hash the header before sharing it.
#[derive(Debug, Clone)]
pub struct Header {
    pub version: u32,
    pub prev_block: Hash,
    pub merkle_root: Hash,
    pub witness_root: Hash,
    pub trie_root: Hash,
    pub time: u64,
    pub bits: u32,
    pub nonce: [u8; NONCE_SIZE],
    pub sol: Vec<u32>,

    hash_cache: RefCell<Option<Hash>>,
    pub state: HeaderState,
}

impl Header {
    /// An all-zero header with an empty solution and no cached hash.
    pub fn init() -> Self {
        Header {
            version: 0,
            prev_block: Hash::zero(),
            merkle_root: Hash::zero(),
            witness_root: Hash::zero(),
            trie_root: Hash::zero(),
            time: 0,
            bits: 0,
            nonce: [0u8; NONCE_SIZE],
            sol: Vec::new(),
            hash_cache: RefCell::new(None),
            state: HeaderState::default(),
        }
    }

    /// Number of solution words; enforced to be `<= MAX_SOL_SIZE` by [`Header::decode`].
    pub fn sol_size(&self) -> u8 {
        self.sol.len() as u8
    }

    /// Decode a header from its full wire encoding (fields in §3 order,
    /// followed by `sol_size` and the solution words).
    pub fn decode(data: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(data);
        Self::read(&mut reader)
    }

    /// Full wire encoding: every field, in order.
    pub fn encode(&self) -> Vec<u8> {
        self.to_bytes()
    }

    /// The pre-image hashed by the Cuckoo header commitment: every field up
    /// to and including `nonce`, excluding `sol_size` and `sol`.
    pub fn encode_pre(&self) -> Vec<u8> {
        let mut writer = Writer::with_capacity(HEADER_PRE_SIZE);
        self.write_pre(&mut writer);
        writer.into_bytes()
    }

    fn write_pre(&self, writer: &mut Writer) {
        writer.write_u32(self.version);
        writer.write_hash(&self.prev_block);
        writer.write_hash(&self.merkle_root);
        writer.write_hash(&self.witness_root);
        writer.write_hash(&self.trie_root);
        writer.write_u64(self.time);
        writer.write_u32(self.bits);
        writer.write_bytes(&self.nonce);
    }

    /// BLAKE2b-256 of [`Header::encode_pre`].
    pub fn hash_pre(&self) -> Hash {
        blake2b_256(&self.encode_pre())
    }

    /// BLAKE2b-256 of the serialized solution words.
    pub fn hash_sol(&self) -> Hash {
        let mut writer = Writer::with_capacity(self.sol.len() * 4);
        for word in &self.sol {
            writer.write_u32(*word);
        }
        blake2b_256(&writer.into_bytes())
    }

    /// The header's hash: BLAKE2b-256 of [`Header::encode`], cached after the
    /// first call.
    pub fn hash(&self) -> Hash {
        if let Some(h) = *self.hash_cache.borrow() {
            return h;
        }
        let h = blake2b_256(&self.encode());
        log::trace!("cached header hash {h} for version {}", self.version);
        *self.hash_cache.borrow_mut() = Some(h);
        h
    }

    /// Whether the two headers' cached hashes are equal, computing either
    /// cache that isn't populated yet.
    pub fn equal(&self, other: &Header) -> bool {
        self.hash() == other.hash()
    }

    /// Decode this header's `bits` into a target, accumulate chain work on
    /// top of `prev_work`, and store the result in [`HeaderState::work`].
    ///
    /// Ties the work accumulator to a concrete header: `prev_work` is the
    /// predecessor's already-accumulated work, or `None` at genesis.
    pub fn accumulate_work(&mut self, prev_work: Option<&Work>) -> Result<Work> {
        let target = bits_to_target_u256(self.bits)?;
        let work = accumulate(prev_work, &target);
        self.state.work = Some(work);
        Ok(work)
    }
}

impl Serializer for Header {
    fn read(reader: &mut Reader) -> Result<Self> {
        let version = reader.read_u32()?;
        let prev_block = reader.read_hash()?;
        let merkle_root = reader.read_hash()?;
        let witness_root = reader.read_hash()?;
        let trie_root = reader.read_hash()?;
        let time = reader.read_u64()?;
        let bits = reader.read_u32()?;
        let nonce_bytes = reader.read_bytes_16()?;
        let sol_size = reader.read_u8()?;
        if sol_size > MAX_SOL_SIZE {
            return Err(VerifyError::BadArgs);
        }
        let mut sol = Vec::with_capacity(sol_size as usize);
        for _ in 0..sol_size {
            sol.push(reader.read_u32()?);
        }

        Ok(Header {
            version,
            prev_block,
            merkle_root,
            witness_root,
            trie_root,
            time,
            bits,
            nonce: nonce_bytes,
            sol,
            hash_cache: RefCell::new(None),
            state: HeaderState::default(),
        })
    }

    fn write(&self, writer: &mut Writer) {
        self.write_pre(writer);
        writer.write_u8(self.sol_size());
        for word in &self.sol {
            writer.write_u32(*word);
        }
    }

    fn size(&self) -> usize {
        HEADER_PRE_SIZE + 1 + self.sol.len() * 4
    }
}

/// Total wire size of a header with `sol_size` solution words.
pub fn header_size(sol_size: u8) -> usize {
    HEADER_PRE_SIZE + 1 + sol_size as usize * 4
}

const _: () = assert!(HASH_SIZE == 32);
