//! Cumulative chain work: a per-header "proof weight" summed across the chain
//! as an unbounded 256-bit unsigned integer, never native 64-bit arithmetic.

use primitive_types::U256;

use crate::error::Result;
use crate::serializer::{Reader, Serializer, Writer};

/// Cumulative proof-of-work, represented as a fixed-width 256-bit unsigned
/// integer stored big-endian on the wire.
pub type Work = U256;

/// Extension for writing a [`Work`] value as 32 big-endian bytes.
pub trait WorkWriter {
    fn write_work(&mut self, value: &Work);
}

/// Extension for reading a [`Work`] value from 32 big-endian bytes.
pub trait WorkReader {
    fn read_work(&mut self) -> Result<Work>;
}

impl WorkWriter for Writer {
    fn write_work(&mut self, value: &Work) {
        // U256 stores four u64 limbs in little-endian limb order; emit them
        // most-significant-limb-first, each limb big-endian, for a 32-byte
        // big-endian representation on the wire.
        for limb in value.0.iter().rev() {
            self.write_bytes(&limb.to_be_bytes());
        }
    }
}

impl<'a> WorkReader for Reader<'a> {
    fn read_work(&mut self) -> Result<Work> {
        let bytes = self.read_bytes_32()?;
        Ok(U256::from_big_endian(&bytes))
    }
}

impl Serializer for Work {
    fn read(reader: &mut Reader) -> Result<Self> {
        reader.read_work()
    }

    fn write(&self, writer: &mut Writer) {
        writer.write_work(self);
    }

    fn size(&self) -> usize {
        32
    }
}

/// The per-header proof weight: `floor(2^256 / (target + 1))`.
///
/// `2^256` itself does not fit in a 256-bit integer, so it is computed here
/// as `U256::max_value() / (target + 1)`, i.e. `(2^256 - 1) / (target + 1)`.
/// For every `target > 0` this differs from the true quotient by at most one
/// part in `target + 1`, immaterial at these magnitudes. For `target == 0`
/// (reachable: see DESIGN.md OQ5) the true quotient is `2^256 / 1 = 2^256`,
/// which has no 256-bit representation at all; this implementation
/// deliberately saturates to `U256::MAX`, the maximum representable work,
/// rather than wrapping to zero or panicking.
pub fn proof_weight(target: &U256) -> Work {
    let target_plus_one = target.saturating_add(U256::one());
    U256::max_value() / target_plus_one
}

/// Accumulate chain work: the genesis header's work is its own proof weight,
/// every subsequent header's work is its predecessor's plus its own.
pub fn accumulate(prev_work: Option<&Work>, target: &U256) -> Work {
    let weight = proof_weight(target);
    match prev_work {
        None => weight,
        Some(prev) => prev + weight,
    }
}
