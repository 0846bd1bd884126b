//! Locality-sensitive bucket index over MinHash signatures.
//!
//! The signature's ordered values are partitioned into bands of
//! `rows_per_band` elements; each band hashes to a bucket key, and two
//! documents become comparison candidates only when they share at least one
//! band's bucket. Candidates are never reported as similar directly; the
//! clustering engine always confirms or rejects them with exact Jaccard over
//! the characteristic matrix. The band/row split trades a tunable
//! false-negative rate for a near-linear expected scan cost.

use std::collections::{HashMap, HashSet};
use std::hash::{Hash, Hasher};

use ahash::AHasher;

use super::matrix::DocumentId;
use super::signature::MinHashSignature;

/// LSH banding index mapping bucket keys to document ids.
#[derive(Debug)]
pub struct BucketIndex {
    /// Number of bands
    num_bands: usize,

    /// Signature elements per band
    rows_per_band: usize,

    /// Hash tables for each band
    bands: Vec<HashMap<u64, Vec<DocumentId>>>,
}

impl BucketIndex {
    /// Create an empty index with the given banding parameters.
    pub fn new(num_bands: usize, rows_per_band: usize) -> Self {
        Self {
            num_bands,
            rows_per_band,
            bands: vec![HashMap::with_capacity(64); num_bands],
        }
    }

    /// Add a document's signature to every band bucket it falls into.
    pub fn insert(&mut self, id: &DocumentId, signature: &MinHashSignature) {
        for (band_idx, band_hash) in self.band_hashes(signature) {
            self.bands[band_idx]
                .entry(band_hash)
                .or_default()
                .push(id.clone());
        }
    }

    /// Remove a document's entries, given the signature it was inserted
    /// under. Called before overwriting an id so stale buckets never surface
    /// candidates for a replaced signature.
    pub fn remove(&mut self, id: &DocumentId, signature: &MinHashSignature) {
        for (band_idx, band_hash) in self.band_hashes(signature) {
            if let Some(bucket) = self.bands[band_idx].get_mut(&band_hash) {
                bucket.retain(|entry| entry != id);
                if bucket.is_empty() {
                    self.bands[band_idx].remove(&band_hash);
                }
            }
        }
    }

    /// Collect candidate ids sharing at least one band bucket with the given
    /// signature, excluding the queried id itself.
    pub fn candidates(
        &self,
        id: &DocumentId,
        signature: &MinHashSignature,
    ) -> HashSet<DocumentId> {
        let mut candidates = HashSet::new();

        for (band_idx, band_hash) in self.band_hashes(signature) {
            if let Some(bucket) = self.bands[band_idx].get(&band_hash) {
                for candidate in bucket {
                    if candidate != id {
                        candidates.insert(candidate.clone());
                    }
                }
            }
        }

        candidates
    }

    /// Bucket keys for each band of a signature.
    ///
    /// Signatures are sets, so banding runs over the ordered value sequence
    /// in `rows_per_band` chunks. Internal hash collisions can shrink a
    /// signature below the nominal size, shortening the final band; the band
    /// position is mixed into the key so short bands only match at the same
    /// position.
    fn band_hashes(&self, signature: &MinHashSignature) -> Vec<(usize, u64)> {
        let values: Vec<&str> = signature.values().collect();

        values
            .chunks(self.rows_per_band)
            .take(self.num_bands)
            .enumerate()
            .map(|(band_idx, rows)| (band_idx, Self::hash_band(band_idx, rows)))
            .collect()
    }

    /// Hash one band's rows into a bucket key.
    fn hash_band(band_idx: usize, rows: &[&str]) -> u64 {
        let mut hasher = AHasher::default();
        band_idx.hash(&mut hasher);
        rows.hash(&mut hasher);
        hasher.finish()
    }
}
