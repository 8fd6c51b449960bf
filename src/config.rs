//! Wire-format and consensus constants for the verification kernel.
//!
//! These are the fixed widths and limits a header or trie node must respect;
//! nothing here is tunable at runtime.

/// Size in bytes of a BLAKE2b-256 digest, a header hash, and a trie key.
pub const HASH_SIZE: usize = 32;

/// Maximum number of Cuckoo-cycle solution edges a header may carry.
///
/// `sol_size` is serialized as a single byte but the consensus rule caps it
/// well below 255 so that a header's wire size stays bounded.
pub const MAX_SOL_SIZE: u8 = 42;

/// Byte width of the header's miner nonce field.
pub const NONCE_SIZE: usize = 16;

/// Fixed size of the header pre-image (everything up to and including `nonce`,
/// i.e. all fields except `sol_size` and `sol`). This is the Cuckoo header
/// commitment's pre-image.
///
/// 4 (version) + 32*4 (prev_block, merkle_root, witness_root, trie_root)
/// + 8 (time) + 4 (bits) + 16 (nonce) = 160 bytes.
pub const HEADER_PRE_SIZE: usize = 4 + HASH_SIZE * 4 + 8 + 4 + NONCE_SIZE;

/// Fixed size of the header excluding the solution itself: `HEADER_PRE_SIZE`
/// plus the one-byte `sol_size` field.
pub const HEADER_BASE_SIZE: usize = HEADER_PRE_SIZE + 1;

/// Number of nibbles a 32-byte trie key expands to: 64 nibble halves plus one
/// sentinel terminator nibble.
pub const KEY_NIBBLES: usize = 65;

/// Value of the sentinel terminator nibble appended after a key's 64 real nibbles.
pub const TERMINATOR_NIBBLE: u8 = 16;

/// Number of child slots in a FULL (branch) trie node: 16 nibble slots plus
/// one terminator slot.
pub const FULL_NODE_CHILDREN: usize = 17;

/// Cuckoo-cycle graph size parameter (`edgeBits`), passed through unchanged to
/// the external cycle verifier.
pub const CUCKOO_BITS: u32 = 30;

/// Cuckoo-cycle cycle length the external verifier must find/check.
pub const CUCKOO_SIZE: u32 = 42;

/// Cuckoo-cycle "ease" (edges-per-node) percentage used to size the graph.
pub const CUCKOO_EASE: u32 = 50;

/// Whether the legacy (pre-hardfork) Cuckoo graph construction is in effect.
pub const CUCKOO_LEGACY: bool = false;
