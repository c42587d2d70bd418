//! Object storage for exported documents (Supabase Storage REST).
//!
//! - `POST {url}/storage/v1/object/{bucket}/{path}` uploads (with `x-upsert`)
//! - `{url}/storage/v1/object/public/{bucket}/{path}` is the public link
//!
//! # Environment variables
//! - `SUPABASE_URL`         = project URL
//! - `SUPABASE_SERVICE_KEY` = service role key
//! - `SUPABASE_BUCKET`      = bucket name (default `exports`)
//!
//! Export is disabled when URL or key is unset.

use std::{future::Future, pin::Pin, time::Duration};

use ai_llm_service::error_handler::{env_opt, make_snippet};
use reqwest::{StatusCode, Url, header};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

const DEFAULT_BUCKET: &str = "exports";
const UPLOAD_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("[Storage] invalid config: {0}")]
    Config(String),

    #[error("[Storage] invalid object path: {0}")]
    InvalidPath(String),

    #[error("[Storage] transport error: {0}")]
    HttpTransport(#[from] reqwest::Error),

    #[error("[Storage] upload failed: HTTP {status}: {snippet}")]
    HttpStatus { status: StatusCode, snippet: String },
}

/// Boxed future returned by [`ObjectStorage::upload`].
pub type UploadFuture<'a> = Pin<Box<dyn Future<Output = Result<String, StorageError>> + Send + 'a>>;

/// Uploads bytes and returns a publicly reachable URL.
pub trait ObjectStorage: Send + Sync {
    fn upload<'a>(&'a self, bytes: Vec<u8>, path: &'a str, content_type: &'a str)
    -> UploadFuture<'a>;
}

#[derive(Clone)]
pub struct StorageConfig {
    pub url: String,
    pub service_key: String,
    pub bucket: String,
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("url", &self.url)
            .field("service_key", &"<redacted>")
            .field("bucket", &self.bucket)
            .finish()
    }
}

impl StorageConfig {
    /// Reads the Supabase settings. `Ok(None)` when export is not configured.
    ///
    /// # Errors
    /// [`StorageError::Config`] if `SUPABASE_URL` is not an http(s) URL.
    pub fn from_env() -> Result<Option<Self>, StorageError> {
        let (url, service_key) = match (env_opt("SUPABASE_URL"), env_opt("SUPABASE_SERVICE_KEY")) {
            (Some(url), Some(key)) => (url, key),
            (None, None) => return Ok(None),
            _ => {
                warn!("SUPABASE_URL and SUPABASE_SERVICE_KEY must both be set; export disabled");
                return Ok(None);
            }
        };

        let cfg = Self {
            url: url.trim().trim_end_matches('/').to_string(),
            service_key: service_key.trim().to_string(),
            bucket: env_opt("SUPABASE_BUCKET").unwrap_or_else(|| DEFAULT_BUCKET.into()),
        };
        Url::parse(&cfg.url).map_err(|e| StorageError::Config(format!("SUPABASE_URL: {e}")))?;
        Ok(Some(cfg))
    }
}

/// Supabase Storage client.
pub struct SupabaseStorage {
    client: reqwest::Client,
    cfg: StorageConfig,
}

impl SupabaseStorage {
    pub fn new(cfg: StorageConfig) -> Result<Self, StorageError> {
        let mut headers = header::HeaderMap::new();
        let mut auth = header::HeaderValue::from_str(&format!("Bearer {}", cfg.service_key))
            .map_err(|_| StorageError::Config("service key is not a valid header value".into()))?;
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth.clone());
        let mut apikey = header::HeaderValue::from_str(&cfg.service_key)
            .map_err(|_| StorageError::Config("service key is not a valid header value".into()))?;
        apikey.set_sensitive(true);
        headers.insert("apikey", apikey);

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(UPLOAD_TIMEOUT_SECS))
            .default_headers(headers)
            .build()?;

        Ok(Self { client, cfg })
    }

    fn object_url(&self, path: &str) -> Result<Url, StorageError> {
        storage_url(&self.cfg, "object", path)
    }

    fn public_url(&self, path: &str) -> Result<Url, StorageError> {
        storage_url(&self.cfg, "object/public", path)
    }

    #[instrument(skip_all, fields(bucket = %self.cfg.bucket, path, bytes = bytes.len()))]
    async fn put_object(
        &self,
        bytes: Vec<u8>,
        path: &str,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let url = self.object_url(path)?;
        debug!("POST {url}");

        let resp = self
            .client
            .post(url)
            .header(header::CONTENT_TYPE, content_type)
            .header("x-upsert", "true")
            .body(bytes)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(StorageError::HttpStatus {
                status,
                snippet: make_snippet(&text),
            });
        }

        let public = self.public_url(path)?;
        info!(url = %public, "object uploaded");
        Ok(public.to_string())
    }
}

impl ObjectStorage for SupabaseStorage {
    fn upload<'a>(
        &'a self,
        bytes: Vec<u8>,
        path: &'a str,
        content_type: &'a str,
    ) -> UploadFuture<'a> {
        Box::pin(self.put_object(bytes, path, content_type))
    }
}

fn storage_url(cfg: &StorageConfig, kind: &str, path: &str) -> Result<Url, StorageError> {
    let path = path.trim_matches('/');
    if path.is_empty() || path.split('/').any(|seg| seg.is_empty() || seg == "..") {
        return Err(StorageError::InvalidPath(path.to_string()));
    }
    Url::parse(&format!(
        "{}/storage/v1/{kind}/{}/{path}",
        cfg.url, cfg.bucket
    ))
    .map_err(|e| StorageError::InvalidPath(format!("{path}: {e}")))
}
