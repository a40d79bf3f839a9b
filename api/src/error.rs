use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use food_vision::{ClassifyError, LookupError, PipelineError};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("request must include an image file in the `file` field")]
    MissingUpload,
    #[error("invalid upload: {0}")]
    BadUpload(String),
    #[error("uploaded image could not be decoded")]
    UnreadableImage,
    #[error("nutrition lookup failed with status {status}")]
    Upstream { status: u16, body: String },
    #[error("Something went wrong: {0}")]
    ServerError(String),
}

#[derive(Serialize)]
struct ErrorBody {
    ok: bool,
    message: String,
    status: u16,
    #[serde(rename = "statusText")]
    status_text: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        // Upstream failures relay the remote status and body text untouched.
        if let AppError::Upstream { status, body } = self {
            let code = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            return (code, body).into_response();
        }

        let code = self.error_code();

        let message = Json(ErrorBody {
            ok: false,
            message: self.to_string(),
            status: code.as_u16(),
            status_text: code
                .canonical_reason()
                .expect("canonical reason must be defined")
                .to_string(),
        });

        (code, message).into_response()
    }
}

impl AppError {
    fn error_code(&self) -> StatusCode {
        match self {
            AppError::MissingUpload | AppError::BadUpload(_) | AppError::UnreadableImage => {
                StatusCode::BAD_REQUEST
            }
            AppError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            AppError::ServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Classify(ClassifyError::Decode(_)) => AppError::UnreadableImage,
            PipelineError::Classify(err @ ClassifyError::Inference(_)) => {
                AppError::ServerError(err.to_string())
            }
            PipelineError::Lookup(LookupError::Upstream { status, body }) => {
                AppError::Upstream { status, body }
            }
            PipelineError::Lookup(err @ LookupError::Transport(_)) => {
                AppError::ServerError(err.to_string())
            }
        }
    }
}
