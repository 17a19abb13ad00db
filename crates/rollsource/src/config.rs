use crate::{Error, Result};

/// Size of one ChaCha20 keystream block in bytes.
pub const BLOCK_LEN: usize = 64;

/// Tunables for a [`RandomSource`](crate::RandomSource).
///
/// The only knob is the keystream buffer capacity: how many bytes are
/// generated per refill. Larger buffers amortize cipher setup over more draws
/// at the cost of memory; the output sequence for a given seed depends on it,
/// because the nonce advances once per refill.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SourceConfig {
    capacity: usize,
}

impl SourceConfig {
    /// Default keystream buffer capacity in bytes (16 ChaCha20 blocks).
    pub const DEFAULT_CAPACITY: usize = 1024;

    /// Largest accepted keystream buffer capacity in bytes (16 MiB).
    pub const MAX_CAPACITY: usize = 16 * 1024 * 1024;

    /// Creates a configuration with the default capacity.
    pub const fn new() -> Self {
        Self {
            capacity: Self::DEFAULT_CAPACITY,
        }
    }

    /// Creates a configuration with a custom keystream capacity.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCapacity`] unless `capacity` is a non-zero
    /// multiple of [`BLOCK_LEN`] no larger than [`Self::MAX_CAPACITY`].
    pub const fn with_capacity(capacity: usize) -> Result<Self> {
        if capacity == 0 || capacity % BLOCK_LEN != 0 || capacity > Self::MAX_CAPACITY {
            return Err(Error::InvalidCapacity { capacity });
        }
        Ok(Self { capacity })
    }

    /// Keystream buffer capacity in bytes.
    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of `u64` values served by one buffer.
    pub const fn draws_per_refill(&self) -> usize {
        self.capacity / 8
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::new()
    }
}
