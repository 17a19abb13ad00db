use crate::{Error, KEY_LEN, NONCE_LEN, Nonce, Result};

/// Size of a serialized [`SourceState`]: a 32-byte key followed by a 12-byte
/// nonce.
pub const STATE_LEN: usize = KEY_LEN + NONCE_LEN;

/// The persistable part of a [`RandomSource`](crate::RandomSource).
///
/// The wire format is exactly `key || nonce`: 44 raw bytes with no header,
/// length prefix, or checksum. Buffered keystream and the read cursor are not
/// part of it, so a restored source resumes at the start of a fresh block
/// under the saved `(key, nonce)`.
///
/// The blob contains the secret key. Treat it like one.
///
/// # Example
/// ```
/// use rollsource::{RandomSource, SourceState};
///
/// let source = RandomSource::from_seed(42);
/// let state = source.state();
/// let parsed = SourceState::try_from(state.as_ref()).unwrap();
/// assert_eq!(state, parsed);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceState([u8; STATE_LEN]);

impl SourceState {
    /// Assembles a state from its key and nonce.
    pub fn new(key: &[u8; KEY_LEN], nonce: &Nonce) -> Self {
        let mut bytes = [0u8; STATE_LEN];
        bytes[..KEY_LEN].copy_from_slice(key);
        bytes[KEY_LEN..].copy_from_slice(nonce.as_bytes());
        Self(bytes)
    }

    /// Wraps a raw 44-byte blob. Every 44-byte value is a valid state.
    pub const fn from_bytes(bytes: [u8; STATE_LEN]) -> Self {
        Self(bytes)
    }

    /// Returns the raw 44-byte blob.
    pub const fn to_bytes(&self) -> [u8; STATE_LEN] {
        self.0
    }

    /// The ChaCha20 key portion.
    pub fn key(&self) -> [u8; KEY_LEN] {
        let mut key = [0u8; KEY_LEN];
        key.copy_from_slice(&self.0[..KEY_LEN]);
        key
    }

    /// The nonce portion.
    pub fn nonce(&self) -> Nonce {
        let mut nonce = [0u8; NONCE_LEN];
        nonce.copy_from_slice(&self.0[KEY_LEN..]);
        Nonce::from_bytes(nonce)
    }
}

impl TryFrom<&[u8]> for SourceState {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        let bytes: [u8; STATE_LEN] = bytes
            .try_into()
            .map_err(|_| Error::InvalidFormat { len: bytes.len() })?;
        Ok(Self(bytes))
    }
}

impl From<[u8; STATE_LEN]> for SourceState {
    fn from(bytes: [u8; STATE_LEN]) -> Self {
        Self(bytes)
    }
}

impl From<SourceState> for [u8; STATE_LEN] {
    fn from(state: SourceState) -> Self {
        state.0
    }
}

impl AsRef<[u8]> for SourceState {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl core::fmt::Debug for SourceState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SourceState")
            .field("key", &"<redacted>")
            .field("nonce", &self.nonce())
            .finish()
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::{STATE_LEN, SourceState};
    use crate::Error;
    use core::fmt;
    use serde::de::{self, SeqAccess, Visitor};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    impl Serialize for SourceState {
        fn serialize<S>(&self, s: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            s.serialize_bytes(&self.0)
        }
    }

    impl<'de> Deserialize<'de> for SourceState {
        /// Accepts a byte string or a sequence of bytes of exactly
        /// [`STATE_LEN`] elements.
        fn deserialize<D>(d: D) -> Result<Self, D::Error>
        where
            D: Deserializer<'de>,
        {
            d.deserialize_bytes(StateVisitor)
        }
    }

    struct StateVisitor;

    impl<'de> Visitor<'de> for StateVisitor {
        type Value = SourceState;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{STATE_LEN} raw state bytes")
        }

        fn visit_bytes<E>(self, v: &[u8]) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            SourceState::try_from(v).map_err(E::custom)
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: SeqAccess<'de>,
        {
            let mut bytes = [0u8; STATE_LEN];
            let mut len = 0;
            while let Some(byte) = seq.next_element::<u8>()? {
                if let Some(slot) = bytes.get_mut(len) {
                    *slot = byte;
                }
                len += 1;
            }
            if len != STATE_LEN {
                return Err(de::Error::custom(Error::InvalidFormat { len }));
            }
            Ok(SourceState(bytes))
        }
    }
}
