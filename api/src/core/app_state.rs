use std::sync::Arc;

use ai_llm_service::config::default_config::{SynthesisSettings, config_embedding};
use ai_llm_service::error_handler::env_opt;
use contextor::{OpenAiCompatFactory, RagEngine};
use rag_store::{LlmEmbedder, RagConfig};
use services::storage::{ObjectStorage, StorageConfig, SupabaseStorage};
use tracing::info;

use crate::error_handler::AppError;

const DEFAULT_EXPORT_PREFIX: &str = "exports";

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Indexing + query pipeline.
    pub engine: RagEngine,
    /// Export target; `None` disables `/export`.
    pub storage: Option<Arc<dyn ObjectStorage>>,
    /// Folder inside the bucket that exports land in.
    pub export_prefix: String,
}

impl AppState {
    pub fn new(
        engine: RagEngine,
        storage: Option<Arc<dyn ObjectStorage>>,
        export_prefix: impl Into<String>,
    ) -> Self {
        Self {
            engine,
            storage,
            export_prefix: export_prefix.into(),
        }
    }

    /// Wires the vector store, embedder, synthesis factory and export storage
    /// from environment variables.
    ///
    /// # Errors
    /// Any invalid setting, or Qdrant being unreachable when the collection
    /// is checked.
    pub async fn from_env() -> Result<Self, AppError> {
        let rag_cfg = RagConfig::from_env()?;
        let store = rag_store::connect(&rag_cfg).await?;

        let embed_cfg = config_embedding()?;
        info!(provider = ?embed_cfg.provider, model = %embed_cfg.model, dim = rag_cfg.space.size, "embedding model");
        let embedder = LlmEmbedder::new(embed_cfg, rag_cfg.space.size)?;

        let synthesis = SynthesisSettings::from_env()?;
        info!(endpoint = %synthesis.endpoint, "synthesis endpoint");
        let synthesizers = OpenAiCompatFactory::new(synthesis);

        let storage: Option<Arc<dyn ObjectStorage>> = match StorageConfig::from_env()? {
            Some(cfg) => {
                info!(bucket = %cfg.bucket, "export storage enabled");
                Some(Arc::new(SupabaseStorage::new(cfg)?))
            }
            None => {
                info!("export storage not configured; /export disabled");
                None
            }
        };

        let export_prefix =
            env_opt("EXPORT_PREFIX").unwrap_or_else(|| DEFAULT_EXPORT_PREFIX.into());

        let engine = RagEngine::new(store, Arc::new(embedder), Arc::new(synthesizers));
        Ok(Self::new(engine, storage, export_prefix))
    }
}
