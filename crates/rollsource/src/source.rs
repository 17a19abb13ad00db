use chacha20::ChaCha20;
use chacha20::cipher::{KeyIvInit, StreamCipher};

#[cfg(feature = "tracing")]
use tracing::{debug, error, instrument, trace};

use crate::{
    Error, KEY_LEN, Nonce, Result, STATE_LEN, SourceConfig, SourceState, derive,
};

/// Seeded ChaCha20 random source for dice rolling.
///
/// A source owns a 256-bit key, a 96-bit nonce, and a fixed-capacity buffer of
/// keystream. Values are read from the buffer eight bytes at a time as
/// little-endian `u64`s. When fewer than eight unread bytes remain, the nonce
/// is advanced by one and the whole buffer is regenerated, so no keystream
/// block is ever reused under the same `(key, nonce)`.
///
/// ## Seeding
/// - A nonzero seed produces a fully reproducible sequence: the key is
///   `SHA-256(seed)` and the nonce a domain-separated, salted `SHA-256`.
/// - A zero seed (or [`RandomSource::new`]) draws key and nonce from the
///   operating system and is not reproducible.
///
/// ## Persistence
/// [`RandomSource::save_state`] captures only `key || nonce` (44 bytes).
/// Restoring it resumes at the start of a fresh buffer, so values that were
/// buffered but unread at save time are not replayed.
///
/// ## Concurrency
/// Every mutating method takes `&mut self`. Give each worker its own source or
/// wrap a shared one in a mutex.
///
/// # Example
/// ```
/// use rollsource::RandomSource;
///
/// let mut a = RandomSource::from_seed(1234);
/// let mut b = RandomSource::from_seed(1234);
/// for _ in 0..500 {
///     assert_eq!(a.next_u64(), b.next_u64());
/// }
/// ```
pub struct RandomSource {
    key: [u8; KEY_LEN],
    nonce: Nonce,
    /// Empty until the first draw after (re)seeding, then exactly
    /// `config.capacity()` bytes of keystream.
    buffer: Vec<u8>,
    cursor: usize,
    config: SourceConfig,
}

impl RandomSource {
    /// Creates a source seeded from operating system entropy.
    ///
    /// Equivalent to `RandomSource::from_seed(0)`.
    ///
    /// # Panics
    ///
    /// Panics if the OS entropy source fails. Use [`Self::try_new`] to handle
    /// that case.
    pub fn new() -> Self {
        match Self::try_new() {
            Ok(source) => source,
            Err(e) => panic!("{e}"),
        }
    }

    /// Creates a source seeded from operating system entropy.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EntropySourceFailure`] if the OS cannot provide the
    /// key and nonce.
    pub fn try_new() -> Result<Self> {
        Self::with_config(0, SourceConfig::default())
    }

    /// Creates a source from a seed. Zero means "seed from the OS".
    ///
    /// # Panics
    ///
    /// Panics only when `seed == 0` and the OS entropy source fails.
    pub fn from_seed(seed: u64) -> Self {
        match Self::with_config(seed, SourceConfig::default()) {
            Ok(source) => source,
            Err(e) => panic!("{e}"),
        }
    }

    /// Creates a source from a seed with a custom configuration.
    ///
    /// The keystream buffer is allocated here once and reused for the
    /// lifetime of the source.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EntropySourceFailure`] if `seed == 0` and the OS
    /// entropy source fails.
    pub fn with_config(seed: u64, config: SourceConfig) -> Result<Self> {
        let (key, nonce) = derive::key_and_nonce(seed)?;
        Ok(Self::from_parts(key, nonce, config))
    }

    /// Creates a source from a serialized [`SourceState`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] if `bytes` is not exactly 44 bytes
    /// long.
    pub fn from_state(bytes: &[u8], config: SourceConfig) -> Result<Self> {
        let state = SourceState::try_from(bytes)?;
        Ok(Self::from_parts(state.key(), state.nonce(), config))
    }

    fn from_parts(key: [u8; KEY_LEN], nonce: Nonce, config: SourceConfig) -> Self {
        Self {
            key,
            nonce,
            buffer: Vec::with_capacity(config.capacity()),
            cursor: 0,
            config,
        }
    }

    /// Re-seeds the source, replacing key and nonce and discarding any
    /// buffered keystream.
    ///
    /// # Panics
    ///
    /// Panics only when `seed == 0` and the OS entropy source fails. Use
    /// [`Self::try_seed`] to handle that case.
    pub fn seed(&mut self, seed: u64) {
        if let Err(e) = self.try_seed(seed) {
            panic!("{e}");
        }
    }

    /// Re-seeds the source, replacing key and nonce and discarding any
    /// buffered keystream.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EntropySourceFailure`] if `seed == 0` and the OS
    /// entropy source fails. The source is left unchanged in that case.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip_all))]
    pub fn try_seed(&mut self, seed: u64) -> Result<()> {
        let (key, nonce) = derive::key_and_nonce(seed)?;
        self.key = key;
        self.nonce = nonce;
        self.reset_buffer();
        Ok(())
    }

    /// Returns the next 64 random bits.
    ///
    /// # Panics
    ///
    /// Panics if the 96-bit nonce space is exhausted for the current key.
    /// That takes 2^96 refills and does not happen in practice; use
    /// [`Self::try_next_u64`] to observe it as an error.
    pub fn next_u64(&mut self) -> u64 {
        match self.try_next_u64() {
            Ok(value) => value,
            Err(e) => panic!("{e}"),
        }
    }

    /// Returns the next 64 random bits.
    ///
    /// # Errors
    ///
    /// - [`Error::NonceExhausted`] if advancing the nonce would wrap it to
    ///   zero. Every later call fails the same way until the source is
    ///   re-seeded or restored.
    /// - [`Error::CipherInitFailure`] if the cipher rejects the key/nonce.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_next_u64(&mut self) -> Result<u64> {
        if self.buffer.len() - self.cursor < 8 {
            self.refill()?;
        }

        let mut word = [0u8; 8];
        word.copy_from_slice(&self.buffer[self.cursor..self.cursor + 8]);
        self.cursor += 8;
        Ok(u64::from_le_bytes(word))
    }

    /// Regenerates the keystream buffer, advancing the nonce first unless this
    /// is the first generation since (re)seeding.
    fn refill(&mut self) -> Result<()> {
        if !self.buffer.is_empty() {
            self.nonce.increment().inspect_err(|_e| {
                #[cfg(feature = "tracing")]
                error!(error = %_e, "cannot rotate nonce");
            })?;
            #[cfg(feature = "tracing")]
            debug!(nonce = ?self.nonce.as_bytes(), "rotated nonce");
        }

        let mut cipher = ChaCha20::new_from_slices(&self.key, self.nonce.as_bytes())
            .map_err(|_| Error::CipherInitFailure)?;

        self.buffer.clear();
        self.buffer.resize(self.config.capacity(), 0);
        cipher.apply_keystream(&mut self.buffer);
        self.cursor = 0;

        #[cfg(feature = "tracing")]
        trace!(capacity = self.config.capacity(), "generated keystream buffer");
        Ok(())
    }

    fn reset_buffer(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    /// Serializes `key || nonce` into the 44-byte state format.
    pub fn save_state(&self) -> [u8; STATE_LEN] {
        self.state().to_bytes()
    }

    /// Returns the current key and nonce as a [`SourceState`].
    pub fn state(&self) -> SourceState {
        SourceState::new(&self.key, &self.nonce)
    }

    /// Restores a state produced by [`Self::save_state`].
    ///
    /// Output resumes at the start of a fresh keystream buffer under the
    /// restored `(key, nonce)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] if `bytes` is not exactly 44 bytes
    /// long. The source is left untouched in that case.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip_all, fields(len = bytes.len())))]
    pub fn restore_state(&mut self, bytes: &[u8]) -> Result<()> {
        let state = SourceState::try_from(bytes)?;
        self.restore(&state);
        Ok(())
    }

    /// Restores an already-parsed [`SourceState`].
    pub fn restore(&mut self, state: &SourceState) {
        self.key = state.key();
        self.nonce = state.nonce();
        self.reset_buffer();
    }

    /// The configuration this source was built with.
    pub const fn config(&self) -> &SourceConfig {
        &self.config
    }

    /// Number of `u64` draws left before the next refill.
    pub fn buffered(&self) -> usize {
        (self.buffer.len() - self.cursor) / 8
    }
}

impl Default for RandomSource {
    /// Creates a source seeded from operating system entropy.
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for RandomSource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RandomSource")
            .field("key", &"<redacted>")
            .field("nonce", &self.nonce)
            .field("cursor", &self.cursor)
            .field("buffered", &self.buffered())
            .field("config", &self.config)
            .finish()
    }
}

impl From<&SourceState> for RandomSource {
    fn from(state: &SourceState) -> Self {
        Self::from_parts(state.key(), state.nonce(), SourceConfig::default())
    }
}
