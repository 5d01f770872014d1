/*! Banded near-duplicate index.

Signatures are cut into `bands` contiguous groups of `rows` values. Two signatures are
candidates as soon as one of their bands is equal, which happens with probability
`1 - (1 - s^rows)^bands` for a Jaccard similarity `s`.

The index reports any candidate as a duplicate: it is a probabilistic test, tuned by
the `(bands, rows)` couple, and never an exact one.
!*/
use std::collections::HashMap;
use std::hash::Hasher;

use log::debug;
use twox_hash::XxHash64;

use crate::error::Error;

use super::minhash::Signature;

/// Weight of false positives when choosing banding parameters.
const FALSE_POSITIVE_WEIGHT: f64 = 0.5;
/// Weight of false negatives when choosing banding parameters.
const FALSE_NEGATIVE_WEIGHT: f64 = 0.5;
/// Number of steps used to integrate probabilities.
const INTEGRATION_STEPS: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Banding {
    pub bands: usize,
    pub rows: usize,
}

impl Banding {
    /// Choose `(bands, rows)` with `bands * rows <= num_perm` minimizing the weighted
    /// integrated false positive (similarity under `threshold`) and false negative
    /// (similarity over `threshold`) probabilities.
    pub fn optimal(threshold: f64, num_perm: usize) -> Self {
        let mut best = Banding { bands: 1, rows: 1 };
        let mut min_error = f64::MAX;

        for bands in 1..=num_perm {
            for rows in 1..=(num_perm / bands) {
                let fp = integrate(|s| candidate_probability(s, bands, rows), 0.0, threshold);
                let fn_ = integrate(
                    |s| 1.0 - candidate_probability(s, bands, rows),
                    threshold,
                    1.0,
                );
                let error = fp * FALSE_POSITIVE_WEIGHT + fn_ * FALSE_NEGATIVE_WEIGHT;
                if error < min_error {
                    min_error = error;
                    best = Banding { bands, rows };
                }
            }
        }

        best
    }

    pub fn num_perm(&self) -> usize {
        self.bands * self.rows
    }
}

/// Probability that two sets of similarity `s` share at least one band.
fn candidate_probability(s: f64, bands: usize, rows: usize) -> f64 {
    1.0 - (1.0 - s.powi(rows as i32)).powi(bands as i32)
}

/// midpoint rule integration
fn integrate(f: impl Fn(f64) -> f64, a: f64, b: f64) -> f64 {
    if b <= a {
        return 0.0;
    }
    let step = (b - a) / INTEGRATION_STEPS as f64;
    (0..INTEGRATION_STEPS)
        .map(|i| f(a + (i as f64 + 0.5) * step))
        .sum::<f64>()
        * step
}

/// Incremental near-duplicate index.
///
/// Holds the signature of each inserted content key, and one bucket table per band.
/// The index only grows.
#[derive(Debug)]
pub struct NearDuplicateIndex {
    num_perm: usize,
    banding: Banding,
    keys: HashMap<String, Signature>,
    buckets: Vec<HashMap<u64, Vec<usize>>>,
    nb_inserted: usize,
}

impl NearDuplicateIndex {
    /// Create an index for signatures of `num_perm` values,
    /// with banding parameters tuned for `threshold`.
    pub fn new(threshold: f64, num_perm: usize) -> Self {
        let banding = Banding::optimal(threshold, num_perm);
        debug!(
            "index for threshold {}: {} bands of {} rows",
            threshold, banding.bands, banding.rows
        );
        Self::with_banding(num_perm, banding)
    }

    /// Create an index with explicit banding parameters.
    ///
    /// `banding.bands * banding.rows` must not exceed `num_perm`.
    pub fn with_banding(num_perm: usize, banding: Banding) -> Self {
        Self {
            num_perm,
            banding,
            keys: HashMap::new(),
            buckets: (0..banding.bands).map(|_| HashMap::new()).collect(),
            nb_inserted: 0,
        }
    }

    pub fn banding(&self) -> Banding {
        self.banding
    }

    /// Number of inserted documents.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains_key(key)
    }

    /// Returns `true` if any inserted signature shares at least one band with `signature`.
    ///
    /// Fails with [Error::IndexCorruption] if the signature does not have the
    /// number of permutations the index has been built for, or if the band tables are not set up.
    pub fn query(&self, signature: &Signature) -> Result<bool, Error> {
        self.check(signature)?;
        if self.is_empty() {
            return Ok(false);
        }

        let hit = self
            .band_hashes(signature)
            .zip(self.buckets.iter())
            .any(|(hash, table)| table.contains_key(&hash));

        Ok(hit)
    }

    /// Insert `signature` under `key`.
    ///
    /// Inserting an already present key is a no-op.
    pub fn insert(&mut self, key: String, signature: Signature) -> Result<(), Error> {
        self.check(&signature)?;
        if self.keys.contains_key(&key) {
            debug!("key {} already indexed", key);
            return Ok(());
        }

        let id = self.nb_inserted;
        let hashes: Vec<u64> = self.band_hashes(&signature).collect();
        for (hash, table) in hashes.into_iter().zip(self.buckets.iter_mut()) {
            table.entry(hash).or_default().push(id);
        }

        self.keys.insert(key, signature);
        self.nb_inserted += 1;
        Ok(())
    }

    fn check(&self, signature: &Signature) -> Result<(), Error> {
        if signature.len() != self.num_perm {
            return Err(Error::IndexCorruption(format!(
                "signature has {} values, index expects {}",
                signature.len(),
                self.num_perm
            )));
        }
        if self.banding.rows == 0
            || self.buckets.len() != self.banding.bands
            || self.banding.num_perm() > self.num_perm
        {
            return Err(Error::IndexCorruption(format!(
                "inconsistent banding {:?} for {} permutations ({} tables)",
                self.banding,
                self.num_perm,
                self.buckets.len()
            )));
        }
        Ok(())
    }

    /// Hash of each band of the signature. Bands are seeded by their index.
    fn band_hashes<'a>(&self, signature: &'a Signature) -> impl Iterator<Item = u64> + 'a {
        signature
            .values()
            .chunks_exact(self.banding.rows)
            .take(self.banding.bands)
            .enumerate()
            .map(|(band, values)| {
                let mut hasher = XxHash64::with_seed(band as u64);
                for v in values {
                    hasher.write_u32(*v);
                }
                hasher.finish()
            })
    }
}

impl Default for NearDuplicateIndex {
    fn default() -> Self {
        Self::new(0.9, 128)
    }
}
