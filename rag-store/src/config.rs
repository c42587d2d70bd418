//! Runtime and collection configuration.
//!
//! # Environment variables
//! - `VECTOR_BACKEND`      = `qdrant` | `memory` (default `qdrant`)
//! - `QDRANT_URL`          = gRPC endpoint (default `http://localhost:6334`)
//! - `QDRANT_API_KEY`      = optional key for Qdrant Cloud
//! - `QDRANT_COLLECTION`   = collection name (default `devdoc-index`)
//! - `QDRANT_DISTANCE`     = `cosine` | `dot` | `euclid` (default `cosine`)
//! - `QDRANT_EXACT_SEARCH` = `true` to disable HNSW (default `false`)
//! - `EMBEDDING_DIM`       = vector size (default 384)

use std::str::FromStr;

use ai_llm_service::error_handler::env_opt;

use crate::errors::RagError;

pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";
pub const DEFAULT_COLLECTION: &str = "devdoc-index";
pub const DEFAULT_EMBEDDING_DIM: usize = 384;

/// Distance function used for the vector space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DistanceKind {
    /// Cosine distance (recommended for most embeddings).
    Cosine,
    /// Dot product (useful for normalized vectors).
    Dot,
    /// Euclidean distance (L2).
    Euclid,
}

impl FromStr for DistanceKind {
    type Err = RagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cosine" => Ok(Self::Cosine),
            "dot" => Ok(Self::Dot),
            "euclid" | "euclidean" | "l2" => Ok(Self::Euclid),
            other => Err(RagError::Config(format!(
                "QDRANT_DISTANCE: unsupported value '{other}'"
            ))),
        }
    }
}

/// Describes the vector space of the collection.
#[derive(Clone, Debug)]
pub struct VectorSpace {
    /// Dimensionality of vectors.
    pub size: usize,
    /// Distance function.
    pub distance: DistanceKind,
}

/// Which [`crate::VectorStore`] implementation the application wires in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreBackend {
    Qdrant,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = RagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "qdrant" => Ok(Self::Qdrant),
            "memory" | "in-memory" | "inmemory" => Ok(Self::Memory),
            other => Err(RagError::Config(format!(
                "VECTOR_BACKEND: unsupported value '{other}'"
            ))),
        }
    }
}

/// Configuration for the vector index.
#[derive(Clone, Debug)]
pub struct RagConfig {
    pub backend: StoreBackend,
    /// Qdrant endpoint, e.g. `http://localhost:6334`.
    pub qdrant_url: String,
    /// Optional API key for Qdrant Cloud.
    pub qdrant_api_key: Option<String>,
    /// Target collection name.
    pub collection: String,
    /// Vector size and distance of the collection.
    pub space: VectorSpace,
    /// Exact search flag (false = HNSW ANN).
    pub exact_search: bool,
}

impl RagConfig {
    /// Creates a sane default config for a given collection name and Qdrant endpoint.
    pub fn new_default(url: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            backend: StoreBackend::Qdrant,
            qdrant_url: url.into(),
            qdrant_api_key: None,
            collection: collection.into(),
            space: VectorSpace {
                size: DEFAULT_EMBEDDING_DIM,
                distance: DistanceKind::Cosine,
            },
            exact_search: false,
        }
    }

    /// Loads the config from environment variables (see module docs).
    ///
    /// # Errors
    /// `RagError::Config` for unparsable values or an invalid result.
    pub fn from_env() -> Result<Self, RagError> {
        let backend = match env_opt("VECTOR_BACKEND") {
            Some(v) => v.parse()?,
            None => StoreBackend::Qdrant,
        };
        let distance = match env_opt("QDRANT_DISTANCE") {
            Some(v) => v.parse()?,
            None => DistanceKind::Cosine,
        };
        let size = match env_opt("EMBEDDING_DIM") {
            Some(v) => v.trim().parse::<usize>().map_err(|_| {
                RagError::Config(format!("EMBEDDING_DIM: expected positive integer, got '{v}'"))
            })?,
            None => DEFAULT_EMBEDDING_DIM,
        };
        let exact_search = match env_opt("QDRANT_EXACT_SEARCH") {
            Some(v) => parse_bool("QDRANT_EXACT_SEARCH", &v)?,
            None => false,
        };

        let cfg = Self {
            backend,
            qdrant_url: env_opt("QDRANT_URL").unwrap_or_else(|| DEFAULT_QDRANT_URL.into()),
            qdrant_api_key: env_opt("QDRANT_API_KEY"),
            collection: env_opt("QDRANT_COLLECTION").unwrap_or_else(|| DEFAULT_COLLECTION.into()),
            space: VectorSpace { size, distance },
            exact_search,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validates config values.
    pub fn validate(&self) -> Result<(), RagError> {
        if self.qdrant_url.trim().is_empty() {
            return Err(RagError::Config("qdrant_url is empty".into()));
        }
        if self.collection.trim().is_empty() {
            return Err(RagError::Config("collection is empty".into()));
        }
        if self.space.size == 0 {
            return Err(RagError::Config("vector size must be > 0".into()));
        }
        Ok(())
    }
}

fn parse_bool(var: &str, v: &str) -> Result<bool, RagError> {
    match v.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(RagError::Config(format!("{var}: expected bool, got '{other}'"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_backend_and_distance() {
        assert_eq!("Memory".parse::<StoreBackend>().unwrap(), StoreBackend::Memory);
        assert_eq!(" qdrant ".parse::<StoreBackend>().unwrap(), StoreBackend::Qdrant);
        assert!("redis".parse::<StoreBackend>().is_err());
        assert_eq!("l2".parse::<DistanceKind>().unwrap(), DistanceKind::Euclid);
    }

    #[test]
    fn validate_rejects_zero_dimension() {
        let mut cfg = RagConfig::new_default(DEFAULT_QDRANT_URL, DEFAULT_COLLECTION);
        assert!(cfg.validate().is_ok());
        cfg.space.size = 0;
        assert!(matches!(cfg.validate(), Err(RagError::Config(_))));
    }

    #[test]
    fn bool_flags() {
        assert!(parse_bool("X", "Yes").unwrap());
        assert!(!parse_bool("X", "0").unwrap());
        assert!(parse_bool("X", "maybe").is_err());
    }
}
