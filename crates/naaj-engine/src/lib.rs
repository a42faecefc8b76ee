pub mod config;
pub mod corpus;
pub mod engine;
pub mod geo;
pub mod hybrid;
pub mod places;
pub mod query;
pub mod types;

// Re-export primary types for convenience
pub use config::EngineConfig;
pub use corpus::{CorpusSnapshot, CorpusStore};
pub use engine::RetrievalEngine;
pub use places::{PlacesError, PlacesProvider, ProviderPlace};
pub use query::mode::SearchMode;
pub use types::{Coordinates, Place, Provenance, RankedPlace, Review, Turn};

// Re-export common types
pub use anyhow::{Error, Result};
