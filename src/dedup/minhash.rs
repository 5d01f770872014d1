/*! MinHash signatures over whitespace token sets.

Each permutation is simulated by a universal hash `(a * h + b) mod p`, `p` being the
Mersenne prime `2^61 - 1`, applied to a 32-bit base hash of the token.
The `(a, b)` coefficients are drawn from a seeded RNG, making signatures reproducible
for a given `(seed, num_perm)` couple.
!*/
use std::collections::HashSet;
use std::hash::Hasher;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use twox_hash::XxHash64;

const MERSENNE_PRIME: u64 = (1 << 61) - 1;
const MAX_HASH: u64 = u32::MAX as u64;

/// Fixed-size sketch of a token set. One value per permutation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature(Vec<u32>);

impl Signature {
    pub fn values(&self) -> &[u32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u32>> for Signature {
    fn from(v: Vec<u32>) -> Self {
        Self(v)
    }
}

#[derive(Debug, Clone)]
pub struct MinHasher {
    permutations: Vec<(u64, u64)>,
}

impl MinHasher {
    pub fn new(num_perm: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let permutations = (0..num_perm)
            .map(|_| {
                (
                    rng.gen_range(1..MERSENNE_PRIME),
                    rng.gen_range(0..MERSENNE_PRIME),
                )
            })
            .collect();
        Self { permutations }
    }

    pub fn num_perm(&self) -> usize {
        self.permutations.len()
    }

    /// Build the signature of the set of distinct whitespace-delimited tokens of `text`.
    pub fn fingerprint(&self, text: &str) -> Signature {
        let tokens: HashSet<&str> = text.split_whitespace().collect();
        self.signature(tokens.into_iter())
    }

    /// Build a signature from already deduplicated tokens.
    ///
    /// An empty set yields a signature made of [u32::MAX] values.
    pub fn signature<'a>(&self, tokens: impl Iterator<Item = &'a str>) -> Signature {
        let mut mins = vec![MAX_HASH; self.permutations.len()];
        for token in tokens {
            let hv = Self::base_hash(token);
            for (min, (a, b)) in mins.iter_mut().zip(self.permutations.iter()) {
                let phv = Self::permute(hv, *a, *b);
                if phv < *min {
                    *min = phv;
                }
            }
        }

        // values are masked to 32 bits in permute.
        Signature(mins.into_iter().map(|v| v as u32).collect())
    }

    #[inline]
    fn base_hash(token: &str) -> u64 {
        let mut hasher = XxHash64::with_seed(0);
        hasher.write(token.as_bytes());
        hasher.finish() & MAX_HASH
    }

    #[inline]
    fn permute(hv: u64, a: u64, b: u64) -> u64 {
        // a < 2^61 and hv < 2^32, so the product needs 128 bits.
        let v = (u128::from(a) * u128::from(hv) + u128::from(b)) % u128::from(MERSENNE_PRIME);
        (v as u64) & MAX_HASH
    }
}

impl Default for MinHasher {
    fn default() -> Self {
        Self::new(128, 1)
    }
}
