//! Characteristic-matrix checkpointing.
//!
//! Serializes the matrix as JSON (id → sorted signature strings) so a corpus
//! can be signed once and queried later. No other wire format is owned by
//! the engine.

use std::fs;
use std::path::Path;

use crate::core::errors::{NeardupError, Result};
use crate::engine::matrix::CharacteristicMatrix;

/// Write the characteristic matrix to a JSON checkpoint file.
pub fn save_matrix(matrix: &CharacteristicMatrix, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(matrix)
        .map_err(|err| NeardupError::serialization("failed to encode matrix", err))?;

    fs::write(path, json).map_err(|err| {
        NeardupError::io(
            format!("failed to write checkpoint {}", path.display()),
            err,
        )
    })
}

/// Load a characteristic matrix from a JSON checkpoint file.
pub fn load_matrix(path: &Path) -> Result<CharacteristicMatrix> {
    let json = fs::read_to_string(path).map_err(|err| {
        NeardupError::io(
            format!("failed to read checkpoint {}", path.display()),
            err,
        )
    })?;

    serde_json::from_str(&json)
        .map_err(|err| NeardupError::serialization("failed to decode matrix", err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::EngineConfig;
    use crate::engine::cluster::NearDupEngine;
    use tempfile::tempdir;

    #[test]
    fn test_checkpoint_round_trip() {
        let mut engine = NearDupEngine::new(EngineConfig::default()).unwrap();
        engine.add(
            "spacious two bedroom apartment, hardwood floors, pets welcome",
            Some("ad-1".into()),
        );
        engine.add("", Some("empty".into()));

        let dir = tempdir().unwrap();
        let path = dir.path().join("matrix.json");
        save_matrix(engine.matrix(), &path).unwrap();

        let restored = load_matrix(&path).unwrap();
        assert_eq!(restored.len(), engine.matrix().len());
        for (id, signature) in engine.matrix().iter() {
            assert_eq!(restored.signature(id).unwrap(), signature);
        }
    }

    #[test]
    fn test_restored_matrix_supports_queries() {
        let mut engine = NearDupEngine::new(EngineConfig::default()).unwrap();
        let text = "one owner truck, tow package, recent brakes, runs great";
        engine.add(text, Some("a".into()));
        engine.add(text, Some("b".into()));

        let dir = tempdir().unwrap();
        let path = dir.path().join("matrix.json");
        save_matrix(engine.matrix(), &path).unwrap();

        let mut fresh = NearDupEngine::new(EngineConfig::default()).unwrap();
        fresh.restore_matrix(load_matrix(&path).unwrap());

        assert_eq!(
            fresh.similarity_between(&"a".into(), &"b".into()).unwrap(),
            1.0
        );
        let similar = fresh.get_similar(&"a".into(), 0.95).unwrap();
        assert_eq!(similar[0].id, "b".into());
    }
}
