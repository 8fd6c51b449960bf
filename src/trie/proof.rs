//! The proof walker: a state-machine traversal of a node-blob list along a
//! key's nibble path, rehashing every blob before trusting it.

use crate::config::KEY_NIBBLES;
use crate::crypto::{blake2b_256, Hash};
use crate::error::{Result, VerifyError};
use crate::serializer::Reader;
use crate::trie::node::{key_nibbles, parse_node, Node};

/// The authenticated outcome of a proof walk: either the key's value, or a
/// proof that the key is absent from the trie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProofOutcome {
    /// The key is present; this is its value.
    Included(Vec<u8>),
    /// The key is absent, authenticated by a `NULL` child, a diverging
    /// `SHORT` key, or an out-of-path `FULL` slot.
    Excluded,
}

/// Walk `nodes` (each an opaque serialized trie node) from `root` along
/// `key`'s nibble path, verifying every blob's hash against the commitment
/// supplied by its parent (or `root`, for the first blob).
///
/// Mirrors `hsk_verify_proof`: each blob must BLAKE2b-hash to the currently
/// expected commitment before it is even parsed, so a single bit flip
/// anywhere in a proof is caught before any node structure is trusted.
pub fn verify_proof(root: &Hash, key: &[u8; 32], nodes: &[&[u8]]) -> Result<ProofOutcome> {
    let k = key_nibbles(key);
    let mut p: i32 = 0;
    let mut expected = *root;

    let mut iter = nodes.iter().peekable();
    while let Some(&blob) = iter.next() {
        if blake2b_256(blob) != expected {
            log::debug!("trie proof blob does not hash to its parent's commitment");
            return Err(VerifyError::HashMismatch);
        }

        let mut reader = Reader::new(blob);
        let node = parse_node(&mut reader)?;

        let terminal = descend(node, &k, &mut p)?;

        match terminal {
            Terminal::Absent => {
                if iter.peek().is_some() {
                    return Err(VerifyError::EarlyEnd);
                }
                return Ok(ProofOutcome::Excluded);
            }
            Terminal::Hash(h) => {
                expected = h;
                continue;
            }
            Terminal::Value(payload) => {
                if iter.peek().is_some() {
                    return Err(VerifyError::EarlyEnd);
                }
                return Ok(ProofOutcome::Included(payload));
            }
        }
    }

    Err(VerifyError::NoResult)
}

/// `verify_proof`, deriving the key as `BLAKE2b-256(name)`.
pub fn verify_name(root: &Hash, name: &[u8], nodes: &[&[u8]]) -> Result<ProofOutcome> {
    let key_hash = blake2b_256(name);
    verify_proof(root, key_hash.as_bytes(), nodes)
}

enum Terminal {
    Absent,
    Hash(Hash),
    Value(Vec<u8>),
}

/// Descend through `node`'s embedded structure (following `SHORT`/`FULL`
/// children transparently) until reaching an edge this blob cannot resolve
/// on its own: a `HASH` stub (next blob must supply it), a `VALUE` (the walk
/// is done), or absence (`NULL`, a diverging `SHORT` key, or running out of
/// key nibbles without a `VALUE`).
fn descend(mut node: Node, k: &[u8], p: &mut i32) -> Result<Terminal> {
    loop {
        if KEY_NIBBLES as i32 - *p <= 0 {
            return match node {
                Node::Value(payload) => {
                    *p = -1;
                    Ok(Terminal::Value(payload))
                }
                _ => {
                    *p = -1;
                    Ok(Terminal::Absent)
                }
            };
        }

        match node {
            Node::Null => {
                *p = -1;
                return Ok(Terminal::Absent);
            }
            Node::Short { key, child } => {
                let pos = *p as usize;
                let remaining = KEY_NIBBLES - pos;
                if key.len() > remaining || k[pos..pos + key.len()] != key[..] {
                    *p = -1;
                    return Ok(Terminal::Absent);
                }
                *p += key.len() as i32;
                node = *child;
            }
            Node::Full(mut children) => {
                let idx = k[*p as usize] as usize;
                let selected = std::mem::replace(&mut children[idx], Node::Null);
                // The other 16 children are dropped here along with `children`,
                // mirroring the source freeing every sibling but the chosen one.
                *p += 1;
                node = selected;
            }
            Node::Hash(h) => {
                return Ok(Terminal::Hash(h));
            }
            Node::Value(_) => {
                return Err(VerifyError::UnexpectedNode);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serializer::Writer;
    use crate::varint::write_varbytes;

    fn value_node_bytes(payload: &[u8]) -> Vec<u8> {
        let mut w = Writer::new();
        w.write_u8(4); // VALUE tag
        write_varbytes(&mut w, payload);
        w.into_bytes()
    }

    fn short_node_bytes(compressed_key: &[u8], child: &[u8]) -> Vec<u8> {
        let mut w = Writer::new();
        w.write_u8(2); // SHORT tag
        write_varbytes(&mut w, compressed_key);
        w.write_bytes(child);
        w.into_bytes()
    }

    #[test]
    fn empty_node_list_is_no_result() {
        let root = Hash::zero();
        let key = [0u8; 32];
        assert_eq!(verify_proof(&root, &key, &[]), Err(VerifyError::NoResult));
    }

    /// Build a SHORT node's compressed-key bytes so that it decompresses to
    /// the full 65-nibble path of `key` (64 real nibbles plus the sentinel
    /// terminator). Header byte `0x20` sets bit1 (odd length) and clears
    /// bit0 (no explicit terminator nibble stored), so `decompress` strips
    /// a 2-nibble header and extends its slice by one to pick up the
    /// terminator nibble `to_nibbles` appends after the raw key bytes.
    fn full_key_compressed(key: &[u8; 32]) -> Vec<u8> {
        let mut raw = vec![0x20u8];
        raw.extend_from_slice(key);
        raw
    }

    #[test]
    fn single_value_proof_returns_payload() {
        let key = [0x11u8; 32];
        let compressed = full_key_compressed(&key);
        let short = short_node_bytes(&compressed, &value_node_bytes(b"payload"));
        let mut r = Reader::new(&short);
        match parse_node(&mut r).unwrap() {
            Node::Short { key: decompressed, .. } => {
                assert_eq!(decompressed, key_nibbles(&key));
            }
            other => panic!("expected Short, got {other:?}"),
        }

        let root = blake2b_256(&short);
        let result = verify_proof(&root, &key, &[&short]).unwrap();
        assert_eq!(result, ProofOutcome::Included(b"payload".to_vec()));
    }

    #[test]
    fn diverging_short_key_is_excluded() {
        let key = [0x11u8; 32];
        let mut other_key = key;
        other_key[0] ^= 0xff;
        let compressed = full_key_compressed(&other_key);
        let short = short_node_bytes(&compressed, &value_node_bytes(b"payload"));
        let root = blake2b_256(&short);
        let result = verify_proof(&root, &key, &[&short]).unwrap();
        assert_eq!(result, ProofOutcome::Excluded);
    }

    #[test]
    fn null_root_child_is_excluded() {
        let key = [0x99u8; 32];
        let null_blob = [0u8]; // NULL tag
        let root = blake2b_256(&null_blob);
        let result = verify_proof(&root, &key, &[&null_blob]).unwrap();
        assert_eq!(result, ProofOutcome::Excluded);
    }

    #[test]
    fn tamper_detection_flips_to_hash_mismatch() {
        let key = [0x11u8; 32];
        let compressed = full_key_compressed(&key);
        let short = short_node_bytes(&compressed, &value_node_bytes(b"payload"));
        let root = blake2b_256(&short);
        let mut tampered = short.clone();
        tampered[5] ^= 0x01;
        assert_eq!(
            verify_proof(&root, &key, &[&tampered]),
            Err(VerifyError::HashMismatch)
        );
    }

    #[test]
    fn early_end_when_blobs_remain_after_termination() {
        let key = [0x11u8; 32];
        let compressed = full_key_compressed(&key);
        let short = short_node_bytes(&compressed, &value_node_bytes(b"payload"));
        let root = blake2b_256(&short);
        let trailing = [0u8]; // an extra blob the walker never needed
        assert_eq!(
            verify_proof(&root, &key, &[&short, &trailing]),
            Err(VerifyError::EarlyEnd)
        );
    }

    #[test]
    fn verify_name_hashes_the_name_into_a_key() {
        let name = b"example.";
        let key = blake2b_256(name);
        let compressed = full_key_compressed(key.as_bytes());
        let short = short_node_bytes(&compressed, &value_node_bytes(b"payload"));
        let root = blake2b_256(&short);
        assert_eq!(
            verify_name(&root, name, &[&short]).unwrap(),
            ProofOutcome::Included(b"payload".to_vec())
        );
    }

    /// Compress a nibble path that ends in the sentinel terminator (value
    /// 16) and has an *even* total length, using header bits `(1, 1)`
    /// (terminator-present, odd-length-of-remainder): the header byte's low
    /// nibble becomes the path's first real nibble, the remaining bytes pack
    /// the next `len - 2` real nibbles two per byte, and the terminator
    /// itself is recovered from `to_nibbles`'s own appended sentinel rather
    /// than stored.
    fn compress_even_terminated(real_nibbles: &[u8]) -> Vec<u8> {
        let len = real_nibbles.len();
        assert_eq!(len % 2, 0);
        assert_eq!(*real_nibbles.last().unwrap(), 16);
        let mut raw = vec![(0b11 << 4) | real_nibbles[0]];
        for pair in real_nibbles[1..len - 1].chunks(2) {
            raw.push((pair[0] << 4) | pair[1]);
        }
        raw
    }

    #[test]
    fn full_node_selects_child_by_nibble_and_frees_siblings() {
        // A FULL node with 17 NULL children except at the nibble index
        // matching key[0]'s high nibble, which holds a SHORT node covering
        // the rest of the path.
        let mut key = [0u8; 32];
        key[0] = 0x30; // high nibble 3, low nibble 0
        let nibbles = key_nibbles(&key);
        let rest_of_path = nibbles[1..].to_vec(); // 64 nibbles: 63 real + terminator
        let raw = compress_even_terminated(&rest_of_path);
        let short = short_node_bytes(&raw, &value_node_bytes(b"payload"));

        let mut reader = Reader::new(&short);
        match parse_node(&mut reader).unwrap() {
            Node::Short { key: decompressed, .. } => assert_eq!(decompressed, rest_of_path),
            other => panic!("expected Short, got {other:?}"),
        }

        let mut full = vec![3u8]; // FULL tag
        for i in 0..17u8 {
            if i == 3 {
                full.extend_from_slice(&short);
            } else {
                full.push(0u8); // NULL
            }
        }

        let root = blake2b_256(&full);
        let result = verify_proof(&root, &key, &[&full]).unwrap();
        assert_eq!(result, ProofOutcome::Included(b"payload".to_vec()));
    }
}
