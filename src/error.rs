use thiserror::Error;

/// Closed set of outcomes for every fallible operation in the verification kernel.
///
/// Every decode, hash-chain check, and proof walk in this crate bottoms out in one of
/// these variants. There is no retry and no logging at this layer; the caller decides
/// how to turn a variant into a user-facing diagnostic.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyError {
    /// A caller-side precondition was violated (e.g. a key that isn't 32 bytes).
    #[error("invalid arguments")]
    BadArgs,

    /// A varint/varbytes was truncated or used a non-canonical encoding.
    #[error("encoding error")]
    Encoding,

    /// A trie node tag byte is not one of the five known variants, or its body
    /// was truncated.
    #[error("malformed trie node")]
    MalformedNode,

    /// A node variant appeared where the walker's state machine forbids it.
    #[error("unexpected node in this position")]
    InvalidNode,

    /// A VALUE node was reached mid-path instead of at the end of the proof.
    #[error("value node encountered mid-path")]
    UnexpectedNode,

    /// A node blob did not hash to the commitment its parent expected.
    #[error("node hash does not match expected commitment")]
    HashMismatch,

    /// The walk terminated (absence or value) but more blobs remained in the list.
    #[error("proof list has unconsumed trailing nodes")]
    EarlyEnd,

    /// The blob list was exhausted without the walk terminating.
    #[error("proof list exhausted without a result")]
    NoResult,

    /// The compact difficulty `bits` decoded to a negative or zero target.
    #[error("bits field decodes to a negative or zero target")]
    NegTarget,

    /// The solution hash did not meet the decoded target.
    #[error("solution hash exceeds target")]
    HighHash,

    /// The Cuckoo-cycle verifier rejected the solution; the wrapped value is its
    /// own categorized, implementation-defined error code.
    #[error("cuckoo-cycle verification failed (code {0})")]
    Cuckoo(i32),
}

pub type Result<T> = core::result::Result<T, VerifyError>;
