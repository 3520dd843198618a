use api_types::{error::ErrorBody, export::ExportKind};
use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

pub use server::{app, run_with_listener, spawn_with_listener};

mod export;
mod server;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub enum ServerError {
    /// Bad request parameters, reported verbatim.
    Validation(String),
    /// Anything that went wrong while producing an export. The source is only
    /// logged; clients get a generic per-kind message.
    Export { kind: ExportKind, source: BoxError },
}

impl ServerError {
    pub fn export(kind: ExportKind, source: impl Into<BoxError>) -> Self {
        Self::Export {
            kind,
            source: source.into(),
        }
    }

    /// Map an engine error raised while serving an export of `kind`.
    pub fn from_engine(kind: ExportKind, err: EngineError) -> Self {
        match err {
            EngineError::Validation(message) => Self::Validation(message),
            other => Self::export(kind, other),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            ServerError::Validation(message) => (StatusCode::BAD_REQUEST, message),
            ServerError::Export { kind, source } => {
                tracing::error!("failed to export {}: {source}", kind.file_prefix());
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    kind.failure_message().to_string(),
                )
            }
        };

        (status, Json(ErrorBody::new(error))).into_response()
    }
}
