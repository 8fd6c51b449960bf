//! The five trie node variants and their parser.
//!
//! A node blob is a tag byte followed by variant-specific fields (§4.G). The
//! parser never requires the input to be fully drained -- a `SHORT` node's
//! embedded child, or a `FULL` node's seventeen children, are themselves
//! parsed from whatever bytes remain after the enclosing node's own fields,
//! and the leftover tail is handed back to the caller.

use crate::crypto::Hash;
use crate::error::{Result, VerifyError};
use crate::varint::read_varbytes_light;
use crate::serializer::Reader;

/// Tag bytes distinguishing the five node variants on the wire.
mod tag {
    pub const NULL: u8 = 0;
    pub const HASH: u8 = 1;
    pub const SHORT: u8 = 2;
    pub const FULL: u8 = 3;
    pub const VALUE: u8 = 4;
}

/// Number of child slots in a `FULL` node: §3's 16 nibble slots plus the
/// terminator slot.
pub const FULL_CHILDREN: usize = crate::config::FULL_NODE_CHILDREN;

/// A single parsed trie node.
///
/// `NULL` is represented as its own variant rather than folded into
/// `Option<Node>` so that every recursive parse slot -- `Short.child`,
/// `Full.children[i]` -- can hold one uniformly.
#[derive(Debug, Clone)]
pub enum Node {
    Null,
    Hash(Hash),
    Short { key: Vec<u8>, child: Box<Node> },
    Full(Box<[Node; FULL_CHILDREN]>),
    Value(Vec<u8>),
}

impl Node {
    pub fn is_null(&self) -> bool {
        matches!(self, Node::Null)
    }
}

/// Expand `data` into nibbles, appending the sentinel terminator nibble
/// (value `16`) after the last real nibble.
fn to_nibbles(data: &[u8]) -> Vec<u8> {
    let mut nibbles = Vec::with_capacity(data.len() * 2 + 1);
    for &b in data {
        nibbles.push(b >> 4);
        nibbles.push(b & 0x0f);
    }
    nibbles.push(16);
    nibbles
}

/// Strip a short node's compressed-key header, returning the bare nibble
/// sequence (§3's "compressed short-node key encoding").
fn decompress(data: &[u8]) -> Vec<u8> {
    if data.is_empty() {
        return Vec::new();
    }
    let nibbles = to_nibbles(data);
    let has_terminator = nibbles[0] & 1 != 0;
    let is_odd = nibbles[0] & 2 != 0;

    let mut pos = if has_terminator { 1 } else { 2 };
    let mut len = nibbles.len() - 1;
    if is_odd {
        len += 1;
    }
    if pos > len {
        pos = len;
    }

    nibbles[pos..len].to_vec()
}

/// Parse exactly one node from the front of `reader`, leaving any trailing
/// bytes (a sibling's serialization, in the `SHORT`/`FULL` recursive cases)
/// untouched.
pub fn parse_node(reader: &mut Reader) -> Result<Node> {
    let type_tag = reader.read_u8().map_err(|_| VerifyError::MalformedNode)?;

    match type_tag {
        tag::NULL => Ok(Node::Null),
        tag::HASH => {
            let bytes = reader
                .read_bytes_32()
                .map_err(|_| VerifyError::MalformedNode)?;
            Ok(Node::Hash(Hash::new(bytes)))
        }
        tag::SHORT => {
            let compressed =
                read_varbytes_light(reader).map_err(|_| VerifyError::MalformedNode)?;
            let key = decompress(compressed);
            let child = parse_node(reader)?;
            Ok(Node::Short {
                key,
                child: Box::new(child),
            })
        }
        tag::FULL => {
            let mut children: Vec<Node> = Vec::with_capacity(FULL_CHILDREN);
            for _ in 0..FULL_CHILDREN {
                children.push(parse_node(reader)?);
            }
            let array: [Node; FULL_CHILDREN] = children
                .try_into()
                .unwrap_or_else(|_| unreachable!("exactly FULL_CHILDREN pushed above"));
            Ok(Node::Full(Box::new(array)))
        }
        tag::VALUE => {
            let payload = crate::varint::read_varbytes_owned(reader)
                .map_err(|_| VerifyError::MalformedNode)?;
            Ok(Node::Value(payload))
        }
        _ => Err(VerifyError::MalformedNode),
    }
}

/// Expand a raw 32-byte key into its 65-nibble walk path.
pub fn key_nibbles(key: &[u8; 32]) -> Vec<u8> {
    to_nibbles(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::serializer::Writer;
    use crate::varint::write_varbytes;

    #[test]
    fn parses_null() {
        let bytes = [tag::NULL];
        let mut r = Reader::new(&bytes);
        assert!(matches!(parse_node(&mut r).unwrap(), Node::Null));
        assert!(r.is_empty());
    }

    #[test]
    fn parses_hash() {
        let mut w = Writer::new();
        w.write_u8(tag::HASH);
        w.write_bytes(&[0xab; 32]);
        let bytes = w.into_bytes();
        let mut r = Reader::new(&bytes);
        match parse_node(&mut r).unwrap() {
            Node::Hash(h) => assert_eq!(h.as_bytes(), &[0xab; 32]),
            other => panic!("expected Hash, got {other:?}"),
        }
    }

    #[test]
    fn parses_value() {
        let mut w = Writer::new();
        w.write_u8(tag::VALUE);
        write_varbytes(&mut w, b"hello");
        let bytes = w.into_bytes();
        let mut r = Reader::new(&bytes);
        match parse_node(&mut r).unwrap() {
            Node::Value(v) => assert_eq!(v, b"hello"),
            other => panic!("expected Value, got {other:?}"),
        }
    }

    #[test]
    fn parses_full_with_seventeen_null_children() {
        let mut w = Writer::new();
        w.write_u8(tag::FULL);
        for _ in 0..FULL_CHILDREN {
            w.write_u8(tag::NULL);
        }
        let bytes = w.into_bytes();
        let mut r = Reader::new(&bytes);
        match parse_node(&mut r).unwrap() {
            Node::Full(children) => {
                assert!(children.iter().all(Node::is_null));
            }
            other => panic!("expected Full, got {other:?}"),
        }
    }

    #[test]
    fn parses_short_with_embedded_child() {
        let mut w = Writer::new();
        w.write_u8(tag::SHORT);
        // One compressed byte `0x1a`: header nibble 0x1 (bit0 set -> a
        // terminator is present, so the payload starts at nibble offset 1),
        // real nibble 0xa.
        write_varbytes(&mut w, &[0x1a]);
        w.write_u8(tag::NULL);
        let bytes = w.into_bytes();
        let mut r = Reader::new(&bytes);
        match parse_node(&mut r).unwrap() {
            Node::Short { key, child } => {
                assert_eq!(key, vec![0xa]);
                assert!(child.is_null());
            }
            other => panic!("expected Short, got {other:?}"),
        }
    }

    #[test]
    fn unknown_tag_is_malformed() {
        let bytes = [0xaa];
        let mut r = Reader::new(&bytes);
        assert_eq!(parse_node(&mut r), Err(VerifyError::MalformedNode));
    }

    #[test]
    fn key_nibbles_expands_with_terminator() {
        let key = [0x12u8; 32];
        let nibbles = key_nibbles(&key);
        assert_eq!(nibbles.len(), 65);
        assert_eq!(nibbles[0], 0x1);
        assert_eq!(nibbles[1], 0x2);
        assert_eq!(nibbles[64], 16);
    }
}
