//! Proof-of-work verification: target comparison plus the external
//! Cuckoo-cycle verifier call.

use crate::block::header::Header;
use crate::config::{CUCKOO_BITS, CUCKOO_EASE, CUCKOO_LEGACY, CUCKOO_SIZE};
use crate::crypto::blake2b_256;
use crate::difficulty::bits_to_target;
use crate::error::{Result, VerifyError};

/// The Cuckoo-cycle cycle-finding/verification primitive, consumed through a
/// narrow contract (§6): a context is configured once from the chain's graph
/// parameters, then asked whether a given solution is a valid cycle over a
/// given pre-image.
///
/// This crate does not implement Cuckoo cycles; callers supply a verifier
/// (e.g. a binding to a memory-hard cycle-finder) that satisfies this trait.
pub trait CuckooVerifier {
    /// Build a context for the given graph parameters. `bits` is `edgeBits`,
    /// `size` is the required cycle length, `ease` the edges-per-node
    /// percentage, `legacy` selects the pre-hardfork graph construction.
    fn init(bits: u32, size: u32, ease: u32, legacy: bool) -> Result<Self>
    where
        Self: Sized;

    /// Check that `sol` is a valid cycle of the configured length over the
    /// graph derived from `pre_image`. Returns `Ok(())` when valid, or the
    /// verifier's own categorized error code otherwise.
    fn verify_header(&self, pre_image: &[u8], sol: &[u32]) -> std::result::Result<(), i32>;
}

/// Verify a header's embedded solution against its own declared target,
/// using `verifier` as the Cuckoo-cycle collaborator.
///
/// This does not check linkage to a previous header, timestamp rules, or
/// anything about the chain the header belongs to -- only that the header is
/// internally self-consistent proof-of-work.
pub fn verify_pow<V: CuckooVerifier>(header: &Header, verifier: &V) -> Result<()> {
    let target = bits_to_target(header.bits)?;

    let solhash = header.hash_sol();

    if reverse_compare(solhash.as_bytes(), &target) > 0 {
        log::debug!("header bits {:#x} rejected: solution hash exceeds target", header.bits);
        return Err(VerifyError::HighHash);
    }

    let pre_image = header.encode_pre();
    verifier
        .verify_header(&pre_image, &header.sol)
        .map_err(|code| {
            log::debug!("cuckoo verifier rejected solution with code {code}");
            VerifyError::Cuckoo(code)
        })
}

/// Build a [`CuckooVerifier`] context configured with this crate's fixed
/// graph parameters.
pub fn init_verifier<V: CuckooVerifier>() -> Result<V> {
    V::init(CUCKOO_BITS, CUCKOO_SIZE, CUCKOO_EASE, CUCKOO_LEGACY)
}

/// Compare `a` (read from its most-significant byte down) against `b` (read
/// from its least-significant byte up), returning `>0` if `a` is the larger
/// value under that interleaved reading, `<0` if smaller, `0` if equal.
///
/// This mirrors the source's `rcmp`: `solhash` and `target` are both 32-byte
/// arrays, but one is compared MSB-first and the other LSB-first, so neither
/// needs reversing in place before the comparison.
fn reverse_compare(a: &[u8; 32], b: &[u8; 32]) -> i32 {
    for j in 0..32 {
        let i = 31 - j;
        if a[i] < b[j] {
            return -1;
        }
        if a[i] > b[j] {
            return 1;
        }
    }
    0
}
