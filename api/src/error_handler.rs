use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use ai_llm_service::AiLlmError;
use contextor::ContextorError;
use rag_store::RagError;
use serde::Serialize;
use services::storage::StorageError;
use thiserror::Error;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error(transparent)]
    LlmConfig(#[from] AiLlmError),

    #[error(transparent)]
    Store(#[from] RagError),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request / routing ---
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Pipeline(#[from] ContextorError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("export storage is not configured")]
    ExportDisabled,
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            // startup-only
            AppError::LlmConfig(_) | AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Bind(_) | AppError::Server(_) => StatusCode::INTERNAL_SERVER_ERROR,

            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,

            AppError::Pipeline(e) => match e {
                ContextorError::InvalidArgument(_)
                | ContextorError::MissingCredential
                | ContextorError::MissingModel
                | ContextorError::MissingTenant => StatusCode::BAD_REQUEST,
                ContextorError::Upstream { .. } => StatusCode::BAD_GATEWAY,
                ContextorError::Indexing { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },

            AppError::Storage(e) => match e {
                StorageError::InvalidPath(_) => StatusCode::BAD_REQUEST,
                StorageError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
                StorageError::HttpTransport(_) | StorageError::HttpStatus { .. } => {
                    StatusCode::BAD_GATEWAY
                }
            },
            AppError::ExportDisabled => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::LlmConfig(_) | AppError::Store(_) => "CONFIG_ERROR",
            AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Pipeline(e) => match e {
                ContextorError::InvalidArgument(_) => "INVALID_ARGUMENT",
                ContextorError::MissingCredential => "MISSING_CREDENTIAL",
                ContextorError::MissingModel => "MISSING_MODEL",
                ContextorError::MissingTenant => "MISSING_TENANT",
                ContextorError::Upstream { .. } => "UPSTREAM_FAILURE",
                ContextorError::Indexing { .. } => "INDEXING_FAILURE",
            },
            AppError::Storage(e) => match e {
                StorageError::InvalidPath(_) => "INVALID_ARGUMENT",
                StorageError::Config(_) => "CONFIG_ERROR",
                StorageError::HttpTransport(_) | StorageError::HttpStatus { .. } => {
                    "EXPORT_FAILED"
                }
            },
            AppError::ExportDisabled => "EXPORT_DISABLED",
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, code = self.error_code(), "request failed");
        }
        let body = ErrorBody {
            error: self.error_code(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;
