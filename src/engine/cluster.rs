//! Clustering and similarity queries over the characteristic matrix.
//!
//! [`NearDupEngine`] owns the corpus state: it shingles and signs incoming
//! documents, stores signatures in the characteristic matrix, keeps the
//! bucket index in step with every write, and answers per-document and
//! corpus-wide similarity queries.

use std::cmp::Ordering;

use indexmap::IndexMap;
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::core::config::EngineConfig;
use crate::core::errors::{NeardupError, Result};

use super::index::BucketIndex;
use super::matrix::{CharacteristicMatrix, DocumentId};
use super::minhash::min_hashes;
use super::shingle::ShingleGenerator;
use super::signature::MinHashSignature;

/// A document scored against a query document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimilarDoc {
    /// The matched document's id
    pub id: DocumentId,

    /// Estimated Jaccard similarity in `[0, 1]`
    pub score: f64,
}

/// MinHash near-duplicate detection engine.
pub struct NearDupEngine {
    config: EngineConfig,
    shingler: ShingleGenerator,
    matrix: CharacteristicMatrix,
    index: Option<BucketIndex>,
}

impl NearDupEngine {
    /// Create an engine with the given configuration.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;

        let shingler = ShingleGenerator::new(config.window_size);
        let index = config
            .use_bucket_index
            .then(|| BucketIndex::new(config.num_bands, config.rows_per_band()));

        Ok(Self {
            config,
            shingler,
            matrix: CharacteristicMatrix::new(),
            index,
        })
    }

    /// Returns the engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the characteristic matrix.
    pub fn matrix(&self) -> &CharacteristicMatrix {
        &self.matrix
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.matrix.len()
    }

    /// Whether the engine holds no documents.
    pub fn is_empty(&self) -> bool {
        self.matrix.is_empty()
    }

    /// Shingle and sign a document, then store its signature.
    ///
    /// When no id is supplied the raw text becomes the id, so two calls with
    /// identical text collapse to one entry. Re-adding an existing id
    /// replaces the prior signature entirely (last-write-wins); the bucket
    /// index is purged of the stale entry before the new one lands, so a
    /// signature is only ever visible complete.
    pub fn add(&mut self, text: &str, id: Option<DocumentId>) -> DocumentId {
        let id = id.unwrap_or_else(|| DocumentId::from(text));
        let signature = self.sign(text);
        self.store(id.clone(), signature);
        id
    }

    /// Validate raw bytes as UTF-8 text, then [`add`](Self::add) them.
    ///
    /// Invalid input fails with a validation error and leaves the store
    /// untouched.
    pub fn add_bytes(&mut self, raw: &[u8], id: Option<DocumentId>) -> Result<DocumentId> {
        let text = std::str::from_utf8(raw).map_err(|err| {
            NeardupError::validation_field(
                format!("document is not valid UTF-8: {err}"),
                "document",
            )
        })?;

        Ok(self.add(text, id))
    }

    /// Add a batch of documents, generating signatures in parallel.
    ///
    /// Signature generation has no shared mutable state across documents, so
    /// it fans out across the rayon pool; results merge into the matrix
    /// sequentially under `&mut self`, preserving per-document atomicity.
    pub fn add_batch(&mut self, docs: Vec<(Option<DocumentId>, String)>) -> Vec<DocumentId> {
        let signed: Vec<(DocumentId, MinHashSignature)> = docs
            .into_par_iter()
            .map(|(id, text)| {
                let id = id.unwrap_or_else(|| DocumentId::from(text.as_str()));
                (id, self.sign(&text))
            })
            .collect();

        let mut ids = Vec::with_capacity(signed.len());
        for (id, signature) in signed {
            self.store(id.clone(), signature);
            ids.push(id);
        }
        ids
    }

    /// Jaccard similarity between two stored documents.
    ///
    /// Symmetric; both ids must already exist in the store.
    pub fn similarity_between(&self, a: &DocumentId, b: &DocumentId) -> Result<f64> {
        self.matrix.similarity_between(a, b)
    }

    /// All stored documents whose similarity to `id` meets the threshold,
    /// sorted by descending score (ascending id on ties).
    ///
    /// With the bucket index enabled only same-bucket candidates are scored;
    /// the linear scan covers every other document otherwise. Either way the
    /// reported score is the exact signature Jaccard, never the bucket
    /// estimate.
    pub fn get_similar(&self, id: &DocumentId, threshold: f64) -> Result<Vec<SimilarDoc>> {
        let signature = self.matrix.signature(id)?;
        let mut matches = Vec::new();

        match &self.index {
            Some(index) => {
                let candidates = index.candidates(id, signature);
                debug!(
                    query = %id,
                    candidates = candidates.len(),
                    corpus = self.matrix.len(),
                    "bucket index restricted scan"
                );

                for candidate in candidates {
                    let score = signature.jaccard_similarity(self.matrix.signature(&candidate)?);
                    if score >= threshold {
                        matches.push(SimilarDoc {
                            id: candidate,
                            score,
                        });
                    }
                }
            }
            None => {
                for (other, other_signature) in self.matrix.iter() {
                    if other == id {
                        continue;
                    }

                    let score = signature.jaccard_similarity(other_signature);
                    if score >= threshold {
                        matches.push(SimilarDoc {
                            id: other.clone(),
                            score,
                        });
                    }
                }
            }
        }

        matches.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });

        Ok(matches)
    }

    /// [`get_similar`](Self::get_similar) for every stored document.
    ///
    /// Quadratic in corpus size without the bucket index; near-linear
    /// expected with it.
    pub fn all_similar(&self, threshold: f64) -> Result<IndexMap<DocumentId, Vec<SimilarDoc>>> {
        let mut results = IndexMap::with_capacity(self.matrix.len());

        for id in self.matrix.ids() {
            results.insert(id.clone(), self.get_similar(id, threshold)?);
        }

        Ok(results)
    }

    /// Replace the characteristic matrix, rebuilding the bucket index.
    /// Used when restoring from a checkpoint.
    pub fn restore_matrix(&mut self, matrix: CharacteristicMatrix) {
        self.index = self
            .config
            .use_bucket_index
            .then(|| BucketIndex::new(self.config.num_bands, self.config.rows_per_band()));

        if let Some(index) = &mut self.index {
            for (id, signature) in matrix.iter() {
                index.insert(id, signature);
            }
        }

        self.matrix = matrix;
    }

    fn sign(&self, text: &str) -> MinHashSignature {
        min_hashes(&self.shingler.shingle(text))
    }

    fn store(&mut self, id: DocumentId, signature: MinHashSignature) {
        let displaced = self.matrix.insert(id.clone(), signature.clone());

        if let Some(index) = &mut self.index {
            if let Some(old) = displaced {
                index.remove(&id, &old);
            }
            index.insert(&id, &signature);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::signature::SIGNATURE_SIZE;

    fn engine() -> NearDupEngine {
        NearDupEngine::new(EngineConfig::default()).unwrap()
    }

    #[test]
    fn test_default_id_is_the_text() {
        let mut engine = engine();
        let id = engine.add("some listing text", None);
        assert_eq!(id.as_str(), "some listing text");
        assert_eq!(engine.len(), 1);

        // Identical text without an id collapses to the same entry.
        engine.add("some listing text", None);
        assert_eq!(engine.len(), 1);
    }

    #[test]
    fn test_add_bytes_rejects_invalid_utf8() {
        let mut engine = engine();
        let err = engine.add_bytes(&[0xff, 0xfe, 0x00], None).unwrap_err();
        assert!(matches!(err, NeardupError::Validation { .. }));
        assert!(engine.is_empty());
    }

    #[test]
    fn test_signature_pop_count() {
        let mut engine = engine();
        let text = "a".repeat(40) + "the quick brown fox jumps over the lazy dog";
        let id = engine.add(&text, Some("doc".into()));

        let signature = engine.matrix().signature(&id).unwrap();
        assert!(signature.len() <= SIGNATURE_SIZE);
        assert!(!signature.is_empty());
    }

    #[test]
    fn test_readd_replaces_signature() {
        let mut engine = engine();
        engine.add("first version of this listing, fairly long text", Some("doc".into()));
        let before = engine.matrix().signature(&"doc".into()).unwrap().clone();

        engine.add("second version, a completely different body text", Some("doc".into()));
        let after = engine.matrix().signature(&"doc".into()).unwrap();

        assert_eq!(engine.len(), 1);
        assert_ne!(&before, after);
    }

    #[test]
    fn test_unknown_id_propagates_not_found() {
        let engine = engine();
        assert!(engine.get_similar(&"ghost".into(), 0.5).is_err());
        assert!(engine
            .similarity_between(&"ghost".into(), &"ghost".into())
            .is_err());
    }

    #[test]
    fn test_add_batch_matches_sequential_adds() {
        let docs: Vec<(Option<DocumentId>, String)> = (0..8)
            .map(|i| {
                (
                    Some(DocumentId::from(format!("doc{i}").as_str())),
                    format!("listing number {i}: one careful owner, low mileage, must sell"),
                )
            })
            .collect();

        let mut batched = engine();
        batched.add_batch(docs.clone());

        let mut sequential = engine();
        for (id, text) in docs {
            sequential.add(&text, id);
        }

        assert_eq!(batched.len(), sequential.len());
        for id in sequential.matrix().ids() {
            assert_eq!(
                batched.matrix().signature(id).unwrap(),
                sequential.matrix().signature(id).unwrap()
            );
        }
    }

    #[test]
    fn test_index_and_linear_scan_agree_on_near_duplicates() {
        let base = "for sale: 2014 compact hatchback, 62k miles, clean title, \
                    new tires, cold a/c, asking 7200 obo, call after 5pm";
        // Same length, final character swapped: the omitted last window means
        // the trailing character never lands in a shingle, so the signatures
        // are identical.
        let copy = format!("{}x", &base[..base.len() - 1]);

        let mut indexed = NearDupEngine::new(EngineConfig::default()).unwrap();
        let mut linear =
            NearDupEngine::new(EngineConfig::default().with_bucket_index(false)).unwrap();

        for engine in [&mut indexed, &mut linear] {
            engine.add(base, Some("orig".into()));
            engine.add(&copy, Some("copy".into()));
            engine.add("completely unrelated text about apartment rentals downtown", Some("other".into()));
        }

        let from_index = indexed.get_similar(&"orig".into(), 0.95).unwrap();
        let from_scan = linear.get_similar(&"orig".into(), 0.95).unwrap();

        assert_eq!(from_scan[0].id, DocumentId::from("copy"));
        assert_eq!(from_index, from_scan);
    }
}
