//! The polynomial string hash used to place keys in a [`HashTable`].
//!
//! Keys are hashed as `h = 31 * h + c` over their UTF-16 code units, starting
//! from zero, in wrapping two's-complement 32-bit arithmetic. This makes the
//! hash of a given string identical to what any other implementation of the
//! same recurrence over UTF-16 strings produces, including the sign.
//!
//! [`HashTable`]: crate::HashTable

use core::hash::BuildHasher;
use core::hash::Hasher;

/// Multiplier applied to the running hash before adding each code unit.
pub const MULTIPLIER: i32 = 31;

/// Computes the 32-bit polynomial hash of `key`.
///
/// Characters outside the Basic Multilingual Plane contribute both of their
/// UTF-16 surrogate units. Overflow wraps silently, so long keys routinely
/// produce negative hashes.
///
/// # Examples
///
/// ```rust
/// use strtab::hash::hash_str;
///
/// assert_eq!(hash_str(""), 0);
/// assert_eq!(hash_str("a"), 97);
/// assert_eq!(hash_str("ab"), 97 * 31 + 98);
///
/// // Wraparound is reproduced bit for bit.
/// assert_eq!(hash_str("polygenelubricants"), i32::MIN);
/// ```
#[inline]
pub fn hash_str(key: &str) -> i32 {
    key.encode_utf16().fold(0i32, |h, unit| {
        h.wrapping_mul(MULTIPLIER).wrapping_add(i32::from(unit))
    })
}

/// Maps a hash to a bucket in `0..capacity`.
///
/// This is the non-negative remainder of `hash` divided by `capacity`.
/// `capacity` must be a non-zero power of two, which lets the remainder be
/// taken by masking the hash reinterpreted as `u32`.
///
/// # Examples
///
/// ```rust
/// use strtab::hash::bucket_index;
///
/// assert_eq!(bucket_index(97, 16), 1);
/// assert_eq!(bucket_index(-1, 16), 15);
/// assert_eq!(bucket_index(i32::MIN, 16), 0);
/// ```
#[inline(always)]
pub fn bucket_index(hash: i32, capacity: usize) -> usize {
    debug_assert!(capacity.is_power_of_two());
    (hash as u32 as usize) & (capacity - 1)
}

/// A [`Hasher`] running the same polynomial over raw bytes.
///
/// The table hashes its keys with [`hash_str`] directly; this adapter exists
/// for callers that want the polynomial behind the standard hashing traits,
/// for example to hash non-string values through their [`Hash`] impl. Note
/// that it consumes bytes rather than UTF-16 units, and `str`'s `Hash` impl
/// appends a `0xff` terminator, so its output differs from [`hash_str`] for
/// the same string.
///
/// [`Hash`]: core::hash::Hash
///
/// # Examples
///
/// ```rust
/// use core::hash::Hasher;
///
/// use strtab::hash::PolynomialHasher;
///
/// let mut hasher = PolynomialHasher::default();
/// hasher.write(b"ab");
/// assert_eq!(hasher.finish(), (97 * 31 + 98) as u32 as u64);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct PolynomialHasher {
    hash: i32,
}

impl PolynomialHasher {
    /// Returns the signed 32-bit state accumulated so far.
    pub fn finish_i32(&self) -> i32 {
        self.hash
    }
}

impl Hasher for PolynomialHasher {
    fn finish(&self) -> u64 {
        self.hash as u32 as u64
    }

    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.hash = self
                .hash
                .wrapping_mul(MULTIPLIER)
                .wrapping_add(i32::from(byte));
        }
    }
}

/// Builds [`PolynomialHasher`]s.
#[derive(Debug, Default, Clone, Copy)]
pub struct BuildPolynomialHasher;

impl BuildHasher for BuildPolynomialHasher {
    type Hasher = PolynomialHasher;

    fn build_hasher(&self) -> Self::Hasher {
        PolynomialHasher::default()
    }
}

#[cfg(test)]
mod tests {
    use core::hash::Hash;

    use rand::Rng;
    use rand::SeedableRng;
    use rand::TryRngCore;
    use rand::rngs::OsRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn known_hashes() {
        assert_eq!(hash_str(""), 0);
        assert_eq!(hash_str("a"), 97);
        assert_eq!(hash_str("ab"), 3105);
        assert_eq!(hash_str("hello"), 99162322);
    }

    #[test]
    fn wraps_to_negative() {
        assert_eq!(hash_str("polygenelubricants"), i32::MIN);
        assert_eq!(hash_str("abcdefg"), -1206291356);
        assert_eq!(bucket_index(hash_str("polygenelubricants"), 16), 0);
    }

    #[test]
    fn hashes_utf16_units() {
        // U+1F600 encodes as the surrogate pair D83D DE00.
        assert_eq!(hash_str("\u{1F600}"), 0xD83D * 31 + 0xDE00);
        // U+00E9 is a single unit even though it is two UTF-8 bytes.
        assert_eq!(hash_str("\u{e9}"), 0xE9);
    }

    #[test]
    fn colliding_strings() {
        assert_eq!(hash_str("Aa"), hash_str("BB"));
        assert_eq!(hash_str("AaAa"), hash_str("BBBB"));
        assert_eq!(hash_str("AaBB"), hash_str("BBAa"));
        assert_ne!(hash_str("Aa"), hash_str("AaAa"));
    }

    #[test]
    fn bucket_index_matches_euclidean_remainder() {
        let seed = OsRng.try_next_u64().unwrap();
        let mut rng = SmallRng::seed_from_u64(seed);

        for _ in 0..10_000 {
            let hash: i32 = rng.random();
            let capacity = 1usize << rng.random_range(0..20u32);
            assert_eq!(
                bucket_index(hash, capacity),
                i64::from(hash).rem_euclid(capacity as i64) as usize,
                "seed {seed}, hash {hash}, capacity {capacity}"
            );
        }
    }

    #[test]
    fn hasher_runs_polynomial_over_bytes() {
        let mut hasher = BuildPolynomialHasher.build_hasher();
        hasher.write(b"hello");
        assert_eq!(hasher.finish_i32(), hash_str("hello"));

        let mut hasher = BuildPolynomialHasher.build_hasher();
        "hello".hash(&mut hasher);
        assert_eq!(
            hasher.finish_i32(),
            hash_str("hello").wrapping_mul(31).wrapping_add(0xff)
        );
    }
}
