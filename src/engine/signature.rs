//! MinHash signature type and Jaccard similarity estimation.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Number of independent hash families, one per digest quarter.
pub const NUM_HASH_FAMILIES: usize = 4;

/// Number of minimum values retained per hash family.
pub const HASHES_PER_FAMILY: usize = 5;

/// Total number of signature elements produced per document.
pub const SIGNATURE_SIZE: usize = NUM_HASH_FAMILIES * HASHES_PER_FAMILY;

/// MinHash signature for efficient similarity estimation.
///
/// A signature holds the [`SIGNATURE_SIZE`] smallest digest-quarter values
/// observed across a document's shingles (plus sentinel placeholders when the
/// document was too short to supply enough). Values collide across hash
/// families in rare cases, so the distinct cardinality may fall below
/// [`SIGNATURE_SIZE`]; that shrinkage is a documented property of the scheme,
/// not corrected here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinHashSignature {
    /// The signature values, ordered for deterministic banding and output
    values: BTreeSet<String>,
}

impl MinHashSignature {
    /// Create a signature from already-selected minimum hash values.
    pub fn from_values(values: BTreeSet<String>) -> Self {
        Self { values }
    }

    /// Number of distinct signature values.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the signature holds no values. Never true for signatures
    /// produced by the generator, which pads with sentinels.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate the signature values in lexicographic order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(String::as_str)
    }

    /// Calculate Jaccard similarity with another signature.
    ///
    /// `|A ∩ B| / |A ∪ B|` over the two value sets, in `[0, 1]`. Symmetric.
    /// The union is never empty for generator-produced signatures, so the
    /// estimate is always defined for stored documents.
    pub fn jaccard_similarity(&self, other: &Self) -> f64 {
        let union = self.values.union(&other.values).count();
        if union == 0 {
            return 1.0;
        }

        let intersection = self.values.intersection(&other.values).count();
        intersection as f64 / union as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signature_of(values: &[&str]) -> MinHashSignature {
        MinHashSignature::from_values(values.iter().map(|v| v.to_string()).collect())
    }

    #[test]
    fn test_identical_signatures_score_one() {
        let a = signature_of(&["aa", "bb", "cc", "dd"]);
        let b = signature_of(&["aa", "bb", "cc", "dd"]);
        assert_eq!(a.jaccard_similarity(&b), 1.0);
    }

    #[test]
    fn test_disjoint_signatures_score_zero() {
        let a = signature_of(&["aa", "bb"]);
        let b = signature_of(&["cc", "dd"]);
        assert_eq!(a.jaccard_similarity(&b), 0.0);
    }

    #[test]
    fn test_partial_overlap() {
        let a = signature_of(&["aa", "bb", "cc"]);
        let b = signature_of(&["bb", "cc", "dd"]);
        // 2 shared out of 4 total.
        assert_eq!(a.jaccard_similarity(&b), 0.5);
    }

    #[test]
    fn test_one_third_overlap() {
        use approx::assert_relative_eq;

        let a = signature_of(&["aa", "bb"]);
        let b = signature_of(&["aa", "cc"]);
        assert_relative_eq!(a.jaccard_similarity(&b), 1.0 / 3.0);
    }

    #[test]
    fn test_symmetry() {
        let a = signature_of(&["aa", "bb", "cc"]);
        let b = signature_of(&["bb", "dd"]);
        assert_eq!(a.jaccard_similarity(&b), b.jaccard_similarity(&a));
    }

    #[test]
    fn test_serde_round_trip() {
        let a = signature_of(&["aa", "bb", "cc"]);
        let json = serde_json::to_string(&a).unwrap();
        let back: MinHashSignature = serde_json::from_str(&json).unwrap();
        assert_eq!(a, back);
    }
}
