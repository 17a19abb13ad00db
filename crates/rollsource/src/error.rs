use crate::state::STATE_LEN;

/// A result type defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors that `rollsource` can produce.
///
/// [`Error::InvalidFormat`] is recoverable: the source that reported it is
/// left exactly as it was. [`Error::InvalidCapacity`] comes from
/// [`SourceConfig::with_capacity`](crate::SourceConfig::with_capacity) before
/// any source exists. The remaining variants are fatal for the instance that
/// raised them and are not expected to surface in normal operation.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The operating system entropy source could not fill the requested
    /// number of bytes during seedless seeding.
    ///
    /// No secure state can be established without it, so the source was not
    /// (re)seeded.
    #[error("OS entropy source failed to provide {requested} bytes")]
    EntropySourceFailure {
        /// Number of bytes that were requested.
        requested: usize,
    },

    /// The ChaCha20 cipher rejected the key or nonce length.
    ///
    /// Key and nonce are fixed-size arrays, so this indicates a broken
    /// internal invariant rather than bad input.
    #[error("ChaCha20 rejected the key/nonce lengths")]
    CipherInitFailure,

    /// Incrementing the 96-bit nonce wrapped around to zero.
    ///
    /// Every keystream block reachable under the current key has been used.
    /// The source refuses to produce more output until it is re-seeded or a
    /// different state is restored.
    #[error("ChaCha20 nonce (12-byte) overflowed; re-seed the source")]
    NonceExhausted,

    /// A serialized state did not have exactly 44 bytes.
    #[error("invalid state length: got {len} bytes, want {}", STATE_LEN)]
    InvalidFormat {
        /// Length of the rejected input.
        len: usize,
    },

    /// A keystream buffer capacity that is zero, not a whole number of 64-byte
    /// ChaCha20 blocks, or larger than `SourceConfig::MAX_CAPACITY`.
    #[error("invalid keystream capacity {capacity}: must be a non-zero multiple of 64 up to 16 MiB")]
    InvalidCapacity {
        /// The rejected capacity, in bytes.
        capacity: usize,
    },
}
