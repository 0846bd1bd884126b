//! # Neardup-RS: MinHash Near-Duplicate Detection Engine
//!
//! A Rust engine for estimating near-duplicate relationships between text
//! documents, built around MinHash signatures and Jaccard similarity. The
//! library provides:
//!
//! - **Shingling**: fixed-length overlapping character windows over raw text
//! - **MinHash Signatures**: fixed-size signatures from quartered
//!   cryptographic digests with heap-based minimum selection
//! - **Characteristic Matrix**: the corpus-wide id → signature store
//! - **Similarity Estimation**: set Jaccard over stored signatures
//! - **Clustering Queries**: per-document and corpus-wide similarity scans,
//!   restricted by a locality-sensitive banding index
//!
//! ## Quick Start
//!
//! ```rust
//! use neardup_rs::{EngineConfig, NearDupEngine};
//!
//! fn main() -> neardup_rs::Result<()> {
//!     let mut engine = NearDupEngine::new(EngineConfig::default())?;
//!
//!     engine.add("used sedan, one owner, great condition, garage kept", Some("ad-1".into()));
//!     engine.add("used sedan, one owner, great condition, garage kept!", Some("ad-2".into()));
//!
//!     for m in engine.get_similar(&"ad-1".into(), 0.5)? {
//!         println!("{} scored {:.3}", m.id, m.score);
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(unsafe_code)]
#![allow(clippy::module_name_repetitions)]
#![cfg_attr(docsrs, feature(doc_cfg))]

// Core configuration and error types
pub mod core {
    //! Configuration and error handling.

    pub mod config;
    pub mod errors;
}

// Similarity engine modules
pub mod engine {
    //! MinHash signature generation and similarity clustering.

    pub mod cluster;
    pub mod index;
    pub mod matrix;
    pub mod minhash;
    pub mod shingle;
    pub mod signature;
}

// I/O: corpus ingestion and checkpointing
pub mod io {
    //! Corpus ingestion and characteristic-matrix checkpointing.

    pub mod checkpoint;
    pub mod ingest;
}

// Re-export primary types for convenience
pub use core::config::EngineConfig;
pub use core::errors::{NeardupError, Result};
pub use engine::cluster::{NearDupEngine, SimilarDoc};
pub use engine::matrix::{CharacteristicMatrix, DocumentId};
pub use engine::signature::MinHashSignature;

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
