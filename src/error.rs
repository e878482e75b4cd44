use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    InvalidRequest(String),
    MissingLinkColumn(String),
    FetchError(String),
    EmptyDocument(String),
    LlmError(String),
    ExportError(String),
    InvalidConfig(String),
    SerializationError(String),
    InternalError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            AppError::MissingLinkColumn(msg) => write!(f, "{}", msg),
            AppError::FetchError(msg) => write!(f, "Error fetching {}", msg),
            AppError::EmptyDocument(msg) => write!(f, "Error: {}", msg),
            AppError::LlmError(msg) => write!(f, "LLM error: {}", msg),
            AppError::ExportError(msg) => write!(f, "Export error: {}", msg),
            AppError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            AppError::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            AppError::InternalError(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::SerializationError(err.to_string())
    }
}

// CSV problems only show up while reading uploads or writing exports
impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::InvalidRequest(format!("Malformed CSV: {}", err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        match err.url().map(|url| url.to_string()) {
            Some(url) => AppError::FetchError(format!("{}: {}", url, err.without_url())),
            None => AppError::FetchError(err.to_string()),
        }
    }
}

impl From<rust_xlsxwriter::XlsxError> for AppError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        AppError::ExportError(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::MissingLinkColumn(_) => StatusCode::BAD_REQUEST,
            AppError::FetchError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::EmptyDocument(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::LlmError(_) => StatusCode::BAD_GATEWAY,
            AppError::ExportError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InvalidConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::SerializationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string(),
        }));

        (status, body).into_response()
    }
}
