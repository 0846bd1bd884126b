//! MinHash signature generation from shingle sets.
//!
//! Each shingle is hashed once with a 256-bit cryptographic digest; the hex
//! encoding of that digest is split into four equal quarters, each quarter
//! acting as an independent hash function. Per quarter, the five smallest
//! values (lexicographic over the hex text) observed across all shingles are
//! retained via a min-heap, giving a 4 × 5 = 20 element signature from a
//! single digest computation per shingle.

use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap};

use tracing::debug;

use super::signature::{MinHashSignature, NUM_HASH_FAMILIES, SIGNATURE_SIZE};

/// Hex length of the full digest (256 bits).
const DIGEST_HEX_LEN: usize = 64;

/// Hex length of a single digest quarter.
const QUARTER_HEX_LEN: usize = DIGEST_HEX_LEN / NUM_HASH_FAMILIES;

/// Generate the MinHash signature for a shingle set.
///
/// Pops are interleaved round-robin across the four heaps, [`HASHES_PER_FAMILY`]
/// pops each. When a heap runs dry before its pops complete (too few distinct
/// shingles), the pop is substituted with a sentinel unique to the pop index.
/// Sentinels only ever match sentinels at the same index in another document's
/// signature, so very short or empty documents register as fully similar to
/// one another; that inflation is intentional and bounds comparison cost for
/// tiny inputs rather than chasing precision where there is no data.
pub fn min_hashes(shingles: &BTreeSet<String>) -> MinHashSignature {
    let mut heaps: [BinaryHeap<Reverse<String>>; NUM_HASH_FAMILIES] =
        std::array::from_fn(|_| BinaryHeap::with_capacity(shingles.len()));

    for shingle in shingles {
        let hex = blake3::hash(shingle.as_bytes()).to_hex();
        let hex = hex.as_str();

        // Each quarter of the digest is treated as its own hash function.
        for (family, heap) in heaps.iter_mut().enumerate() {
            let quarter = &hex[family * QUARTER_HEX_LEN..(family + 1) * QUARTER_HEX_LEN];
            heap.push(Reverse(quarter.to_string()));
        }
    }

    let mut values = BTreeSet::new();
    let mut sentinels = 0usize;

    for i in 0..SIGNATURE_SIZE {
        match heaps[i % NUM_HASH_FAMILIES].pop() {
            Some(Reverse(value)) => {
                values.insert(value);
            }
            None => {
                values.insert(format!("sentinel{i}"));
                sentinels += 1;
            }
        }
    }

    if sentinels > 0 {
        debug!(sentinels, "padded signature for short document");
    }

    MinHashSignature::from_values(values)
}
