use axum::{
    extract::{Multipart, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_governor::{
    governor::GovernorConfigBuilder,
    key_extractor::SmartIpKeyExtractor,
    GovernorLayer,
};
use tower_http::cors::{Any, CorsLayer};
use utoipa::{IntoParams, OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

pub mod config;
pub mod error;
pub mod fetch;
pub mod input;
pub mod metadata;
pub mod parser;
pub mod pipeline;
pub mod report;
pub mod summarizer;

use crate::config::Config;
use crate::error::AppError;
use crate::metadata::FilingMetadata;
use crate::parser::TwoLSummary;
use crate::pipeline::{BatchReport, Extractor};
use crate::report::{ReportRow, CSV_FILE_NAME, XLSX_FILE_NAME, XLSX_MIME};

#[derive(Clone)]
pub struct AppState {
    pub extractor: Extractor,
}

/// Output format of an extraction run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    /// Table rows as JSON
    #[default]
    Json,
    /// Spreadsheet download (`2l_summary.csv`)
    Csv,
    /// Spreadsheet download (`2l_summary.xlsx`)
    Xlsx,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExtractQuery {
    /// Optional: `json` (default), `csv` or `xlsx`
    #[serde(default)]
    #[param(required = false)]
    format: ExportFormat,
}

/// Multipart upload carrying the links file
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct LinksUpload {
    /// CSV file with a `link` column
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
}

/// Summarize every link of an uploaded CSV into the 2l format
#[utoipa::path(
    post,
    path = "/filings/extract",
    params(ExtractQuery),
    request_body(content = LinksUpload, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Extraction complete; JSON table or spreadsheet download", body = BatchReport),
        (status = 400, description = "Missing upload or CSV without a 'link' column")
    )
)]
#[tracing::instrument(skip(state, multipart), fields(format = ?query.format))]
async fn extract_filings(
    State(state): State<AppState>,
    Query(query): Query<ExtractQuery>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let mut upload: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidRequest(format!("Malformed multipart body: {}", e)))?
    {
        if field.name() == Some("file") {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::InvalidRequest(format!("Failed to read upload: {}", e)))?;
            upload = Some(bytes.to_vec());
        }
    }

    let upload = upload.ok_or_else(|| AppError::InvalidRequest("missing 'file' field".to_string()))?;
    let links = input::read_links(&upload)?;

    let batch = state
        .extractor
        .run(&links, |i, total, link| {
            tracing::debug!("Processing {}/{}: {}", i + 1, total, link);
        })
        .await;

    match query.format {
        ExportFormat::Json => Ok((StatusCode::OK, Json(batch)).into_response()),
        ExportFormat::Csv => {
            let body = report::write_csv(&batch.rows)?;
            Ok(attachment("text/csv; charset=utf-8", CSV_FILE_NAME, body))
        }
        ExportFormat::Xlsx => {
            let body = report::write_xlsx(&batch.rows)?;
            Ok(attachment(XLSX_MIME, XLSX_FILE_NAME, body))
        }
    }
}

fn attachment(content_type: &str, file_name: &str, body: Vec<u8>) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", file_name)),
        ],
        body,
    )
        .into_response()
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = String)
    )
)]
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "Service is healthy")
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "FILING INTEL API",
        version = "0.1.0"
    ),
    paths(
        extract_filings,
        health_check
    ),
    components(schemas(
        ExportFormat,
        ExtractQuery,
        LinksUpload,
        BatchReport,
        ReportRow,
        FilingMetadata,
        TwoLSummary
    ))
)]
struct ApiDoc;

/// Create the application with all routes and middleware
pub fn create_app(config: &Config) -> Result<Router, AppError> {
    let state = AppState {
        extractor: Extractor::new(config)?,
    };

    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/filings/extract", post(extract_filings));

    // Rate limiting needs the peer address, which in-process test requests lack
    let api_routes = if config.rate_limit {
        let governor_conf = GovernorConfigBuilder::default()
            .key_extractor(SmartIpKeyExtractor)
            .period(std::time::Duration::from_secs(60))
            .burst_size(10)
            .finish()
            .ok_or_else(|| AppError::InvalidConfig("invalid rate limit settings".to_string()))?;
        api_routes.layer(GovernorLayer {
            config: Arc::new(governor_conf),
        })
    } else {
        api_routes
    };

    let api_routes: Router = api_routes.with_state(state);
    let docs_router = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    let app = Router::new()
        .merge(api_routes)
        .merge(docs_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    Ok(app)
}
