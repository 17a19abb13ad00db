use rand::rand_core::{CryptoRng, RngCore, impls};

use crate::RandomSource;

/// A trait for random sources that return random integers.
///
/// This is the seam a dice engine consumes: it only ever asks for raw values
/// and maps them onto a die range itself. Plug in a [`RandomSource`] for real
/// rolls or a fixed source in tests.
///
/// The random type `T` is generic (typically `u64`).
///
/// # Example
/// ```
/// use rollsource::RandSource;
///
/// struct FixedRand;
/// impl RandSource<u64> for FixedRand {
///     fn rand(&mut self) -> u64 {
///         1234
///     }
/// }
///
/// let mut rng = FixedRand;
/// assert_eq!(rng.rand(), 1234);
/// ```
pub trait RandSource<T> {
    /// Returns a random integer.
    fn rand(&mut self) -> T;
}

impl RandSource<u64> for RandomSource {
    fn rand(&mut self) -> u64 {
        self.next_u64()
    }
}

impl RandSource<u32> for RandomSource {
    fn rand(&mut self) -> u32 {
        self.next_u64() as u32
    }
}

impl RandSource<u128> for RandomSource {
    fn rand(&mut self) -> u128 {
        let lo = self.next_u64() as u128;
        let hi = self.next_u64() as u128;
        (hi << 64) | lo
    }
}

impl<R: RandSource<u64> + ?Sized> RandSource<u64> for &mut R {
    fn rand(&mut self) -> u64 {
        (**self).rand()
    }
}

/// Lets a [`RandomSource`] drive anything written against `rand`, such as
/// `Rng::random_range` for bounded rolls.
///
/// Each `next_u32` consumes a full 64-bit draw, so interleaving `u32` and
/// `u64` reads stays aligned with the `u64` sequence.
impl RngCore for RandomSource {
    fn next_u32(&mut self) -> u32 {
        RandomSource::next_u64(self) as u32
    }

    fn next_u64(&mut self) -> u64 {
        RandomSource::next_u64(self)
    }

    fn fill_bytes(&mut self, dst: &mut [u8]) {
        impls::fill_bytes_via_next(self, dst);
    }
}

impl CryptoRng for RandomSource {}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn roll<R: RandSource<u64>>(mut rng: R, sides: u64) -> u64 {
        rng.rand() % sides + 1
    }

    struct Sequence(Vec<u64>);

    impl RandSource<u64> for Sequence {
        fn rand(&mut self) -> u64 {
            self.0.remove(0)
        }
    }

    #[test]
    fn consumer_sees_same_values_as_inherent_api() {
        let mut a = RandomSource::from_seed(99);
        let mut b = RandomSource::from_seed(99);
        for _ in 0..300 {
            let via_trait: u64 = RandSource::rand(&mut a);
            assert_eq!(via_trait, b.next_u64());
        }
    }

    #[test]
    fn mocked_source_drives_roll() {
        let mut seq = Sequence(vec![0, 5, 6, u64::MAX]);
        assert_eq!(roll(&mut seq, 6), 1);
        assert_eq!(roll(&mut seq, 6), 6);
        assert_eq!(roll(&mut seq, 6), 1);
        assert_eq!(roll(&mut seq, 6), 4);
    }

    #[test]
    fn u128_combines_two_draws_low_first() {
        let mut a = RandomSource::from_seed(5);
        let mut b = RandomSource::from_seed(5);
        let wide: u128 = a.rand();
        let lo = b.next_u64() as u128;
        let hi = b.next_u64() as u128;
        assert_eq!(wide, (hi << 64) | lo);
    }

    #[test]
    fn rng_core_matches_inherent_sequence() {
        let mut a = RandomSource::from_seed(3);
        let mut b = RandomSource::from_seed(3);
        for _ in 0..200 {
            assert_eq!(RngCore::next_u64(&mut a), b.next_u64());
        }
    }

    #[test]
    fn fill_bytes_uses_little_endian_draws() {
        let mut a = RandomSource::from_seed(11);
        let mut b = RandomSource::from_seed(11);
        let mut bytes = [0u8; 16];
        a.fill_bytes(&mut bytes);
        assert_eq!(bytes[..8], b.next_u64().to_le_bytes());
        assert_eq!(bytes[8..], b.next_u64().to_le_bytes());
    }

    #[test]
    fn works_with_rng_range_helpers() {
        let mut source = RandomSource::from_seed(2024);
        for _ in 0..1000 {
            let face = source.random_range(1..=20u32);
            assert!((1..=20).contains(&face));
        }
    }
}
