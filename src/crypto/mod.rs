mod hash;
mod work;

pub use hash::{blake2b_256, Hash};
pub use work::{accumulate, proof_weight, Work, WorkReader, WorkWriter};
