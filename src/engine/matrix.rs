//! Characteristic matrix: the corpus-wide document → signature store.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::errors::{NeardupError, Result};

use super::signature::MinHashSignature;

/// Opaque, ordered, hashable document identifier.
///
/// Callers that supply no identifier get the raw document text as the id,
/// which collapses distinct submissions of identical text into one entry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(String);

impl DocumentId {
    /// View the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for DocumentId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for DocumentId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Mapping from document identifier to MinHash signature.
///
/// This is the engine's sole persistent state. It grows monotonically under
/// insertion; re-inserting an existing id overwrites the previous signature
/// (last-write-wins). Iteration order is insertion order, so scans and
/// serialized checkpoints are deterministic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CharacteristicMatrix {
    entries: IndexMap<DocumentId, MinHashSignature>,
}

impl CharacteristicMatrix {
    /// Create an empty matrix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the matrix holds no documents.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether a document id is present.
    pub fn contains(&self, id: &DocumentId) -> bool {
        self.entries.contains_key(id)
    }

    /// Store a signature under an id, returning the displaced signature when
    /// the id was already present.
    pub fn insert(
        &mut self,
        id: DocumentId,
        signature: MinHashSignature,
    ) -> Option<MinHashSignature> {
        self.entries.insert(id, signature)
    }

    /// Look up the signature for an id.
    ///
    /// Unknown ids are a caller error and fail loudly; they are never treated
    /// as zero similarity.
    pub fn signature(&self, id: &DocumentId) -> Result<&MinHashSignature> {
        self.entries
            .get(id)
            .ok_or_else(|| NeardupError::document_not_found(id.as_str()))
    }

    /// Jaccard similarity between two stored documents.
    pub fn similarity_between(&self, a: &DocumentId, b: &DocumentId) -> Result<f64> {
        let sig_a = self.signature(a)?;
        let sig_b = self.signature(b)?;
        Ok(sig_a.jaccard_similarity(sig_b))
    }

    /// Iterate stored `(id, signature)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&DocumentId, &MinHashSignature)> {
        self.entries.iter()
    }

    /// Iterate stored ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &DocumentId> {
        self.entries.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn signature_of(values: &[&str]) -> MinHashSignature {
        let set: BTreeSet<String> = values.iter().map(|v| v.to_string()).collect();
        MinHashSignature::from_values(set)
    }

    #[test]
    fn test_insert_and_lookup() {
        let mut matrix = CharacteristicMatrix::new();
        matrix.insert("doc1".into(), signature_of(&["aa", "bb"]));

        assert_eq!(matrix.len(), 1);
        assert!(matrix.contains(&"doc1".into()));
        assert!(matrix.signature(&"doc1".into()).is_ok());
    }

    #[test]
    fn test_unknown_id_is_an_error() {
        let matrix = CharacteristicMatrix::new();
        let err = matrix.signature(&"ghost".into()).unwrap_err();
        assert!(matches!(
            err,
            NeardupError::DocumentNotFound { ref id } if id == "ghost"
        ));
    }

    #[test]
    fn test_reinsert_overwrites() {
        let mut matrix = CharacteristicMatrix::new();
        matrix.insert("doc1".into(), signature_of(&["aa"]));
        let displaced = matrix.insert("doc1".into(), signature_of(&["bb"]));

        assert_eq!(matrix.len(), 1);
        assert_eq!(displaced, Some(signature_of(&["aa"])));
        let stored = matrix.signature(&"doc1".into()).unwrap();
        assert_eq!(stored, &signature_of(&["bb"]));
    }

    #[test]
    fn test_similarity_between_is_symmetric() {
        let mut matrix = CharacteristicMatrix::new();
        matrix.insert("a".into(), signature_of(&["aa", "bb", "cc"]));
        matrix.insert("b".into(), signature_of(&["bb", "cc", "dd"]));

        let ab = matrix.similarity_between(&"a".into(), &"b".into()).unwrap();
        let ba = matrix.similarity_between(&"b".into(), &"a".into()).unwrap();
        assert_eq!(ab, ba);
        assert_eq!(ab, 0.5);
    }
}
