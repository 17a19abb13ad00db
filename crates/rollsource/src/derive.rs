//! Key and nonce derivation.
//!
//! Nonzero seeds are expanded with SHA-256 along two separate paths: the key
//! hashes the seed alone, the nonce hashes a fixed salt followed by the seed.
//! A zero seed means "no seed" and draws both values from the operating
//! system.

use rand::{TryRngCore, rngs::OsRng};
use sha2::{Digest, Sha256};

#[cfg(feature = "tracing")]
use tracing::error;

use crate::{Error, NONCE_LEN, Nonce, Result};

/// Size of a ChaCha20 key in bytes.
pub const KEY_LEN: usize = 32;

/// Salt prepended to the seed on the nonce path. The key path is unsalted, so
/// the two digests never coincide for any seed.
pub(crate) const NONCE_SALT: &[u8] = b"NONCE_PREFIX_SALT_FOR_CHACHA_";

/// Derives the ChaCha20 key for a nonzero seed.
pub(crate) fn key_from_seed(seed: u64) -> [u8; KEY_LEN] {
    Sha256::digest(seed.to_le_bytes()).into()
}

/// Derives the ChaCha20 nonce for a nonzero seed.
pub(crate) fn nonce_from_seed(seed: u64) -> Nonce {
    let digest = Sha256::new()
        .chain_update(NONCE_SALT)
        .chain_update(seed.to_le_bytes())
        .finalize();

    let mut nonce = [0u8; NONCE_LEN];
    nonce.copy_from_slice(&digest[..NONCE_LEN]);
    Nonce::from_bytes(nonce)
}

/// Draws a fresh key and nonce from the operating system.
///
/// # Errors
///
/// Returns [`Error::EntropySourceFailure`] if the OS cannot fill either
/// value.
pub(crate) fn from_os() -> Result<([u8; KEY_LEN], Nonce)> {
    let mut key = [0u8; KEY_LEN];
    fill_from_os(&mut key)?;

    let mut nonce = [0u8; NONCE_LEN];
    fill_from_os(&mut nonce)?;

    Ok((key, Nonce::from_bytes(nonce)))
}

fn fill_from_os(buf: &mut [u8]) -> Result<()> {
    let requested = buf.len();
    OsRng.try_fill_bytes(buf).map_err(|_e| {
        #[cfg(feature = "tracing")]
        error!(error = %_e, requested, "OS entropy read failed");
        Error::EntropySourceFailure { requested }
    })
}

/// Derives `(key, nonce)` for any seed, treating zero as "seed from the OS".
pub(crate) fn key_and_nonce(seed: u64) -> Result<([u8; KEY_LEN], Nonce)> {
    if seed == 0 {
        from_os()
    } else {
        Ok((key_from_seed(seed), nonce_from_seed(seed)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_sha256_of_le_seed() {
        let expected: [u8; KEY_LEN] = Sha256::digest(42u64.to_le_bytes()).into();
        assert_eq!(key_from_seed(42), expected);
    }

    #[test]
    fn nonce_is_salted_sha256_prefix() {
        let mut input = NONCE_SALT.to_vec();
        input.extend_from_slice(&42u64.to_le_bytes());
        let digest = Sha256::digest(&input);
        assert_eq!(nonce_from_seed(42).as_bytes()[..], digest[..NONCE_LEN]);
    }

    #[test]
    fn nonce_path_is_domain_separated_from_key_path() {
        for seed in [1u64, 2, 0xDEAD_BEEF, u64::MAX] {
            let key = key_from_seed(seed);
            let nonce = nonce_from_seed(seed);
            assert_ne!(&key[..NONCE_LEN], nonce.as_bytes());
        }
    }

    #[test]
    fn derivation_is_deterministic() {
        assert_eq!(key_and_nonce(7).unwrap(), key_and_nonce(7).unwrap());
        assert_ne!(key_and_nonce(7).unwrap(), key_and_nonce(8).unwrap());
    }

    #[test]
    fn zero_seed_draws_from_os() {
        let (key_a, nonce_a) = key_and_nonce(0).unwrap();
        let (key_b, nonce_b) = key_and_nonce(0).unwrap();
        assert_ne!(key_a, key_b);
        assert_ne!(nonce_a, nonce_b);
    }
}
