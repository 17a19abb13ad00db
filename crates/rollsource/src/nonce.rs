use crate::{Error, Result};

/// Size of a ChaCha20 (IETF) nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// A 96-bit ChaCha20 nonce that doubles as a little-endian block-generation
/// counter.
///
/// Each keystream refill after the first advances the nonce by one, so no
/// `(key, nonce)` pair is ever used for two buffers. Byte `0` is the least
/// significant.
///
/// # Example
/// ```
/// use rollsource::Nonce;
///
/// let mut nonce = Nonce::from_bytes([0xFF, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
/// nonce.increment().unwrap();
/// assert_eq!(nonce.as_bytes(), &[0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Nonce([u8; NONCE_LEN]);

impl Nonce {
    /// Wraps raw nonce bytes.
    pub const fn from_bytes(bytes: [u8; NONCE_LEN]) -> Self {
        Self(bytes)
    }

    /// Returns the raw nonce bytes.
    pub const fn as_bytes(&self) -> &[u8; NONCE_LEN] {
        &self.0
    }

    /// Returns the nonce advanced by one, or `None` if the carry runs out of
    /// all 12 bytes.
    pub fn checked_next(&self) -> Option<Self> {
        let mut next = self.0;
        for byte in &mut next {
            let (value, carry) = byte.overflowing_add(1);
            *byte = value;
            if !carry {
                return Some(Self(next));
            }
        }
        None
    }

    /// Advances the nonce by one in place.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NonceExhausted`] if the counter would wrap to zero. The
    /// nonce is left unchanged in that case.
    pub fn increment(&mut self) -> Result<()> {
        *self = self.checked_next().ok_or(Error::NonceExhausted)?;
        Ok(())
    }
}

impl From<[u8; NONCE_LEN]> for Nonce {
    fn from(bytes: [u8; NONCE_LEN]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Nonce {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
