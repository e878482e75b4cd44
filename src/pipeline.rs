use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use tracing::{error, info, warn};
use utoipa::ToSchema;

use crate::config::Config;
use crate::error::AppError;
use crate::fetch::fetch_clean_text;
use crate::metadata::extract_metadata;
use crate::parser::{parse_2l, TwoLSummary};
use crate::report::{ReportRow, ERROR};
use crate::summarizer::LlmClient;

/// Outcome of a batch run.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BatchReport {
    /// One row per input link, in input order
    pub rows: Vec<ReportRow>,
    /// Links whose document was fetched and summarized
    pub processed: usize,
    /// Links that ended up as error rows
    pub failed: usize,
}

/// Runs links through fetch, metadata, summarize and parse, one at a time.
#[derive(Debug, Clone)]
pub struct Extractor {
    http: Client,
    llm: LlmClient,
    max_text_chars: usize,
    row_delay: Duration,
}

impl Extractor {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let http = Client::builder()
            .timeout(config.fetch_timeout)
            .build()
            .map_err(|e| AppError::InternalError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            llm: LlmClient::new(config)?,
            max_text_chars: config.max_text_chars,
            row_delay: config.row_delay,
        })
    }

    pub fn with_row_delay(mut self, row_delay: Duration) -> Self {
        self.row_delay = row_delay;
        self
    }

    /// Produce the output row for one link, and whether its document was
    /// fetched. Never fails: problems become `Error` cells.
    #[tracing::instrument(skip(self), fields(link = %link))]
    pub async fn process_link(&self, link: &str) -> (ReportRow, bool) {
        if link.trim().is_empty() {
            warn!("Empty link, nothing to fetch");
            return (ReportRow::error(link), false);
        }

        let text = match fetch_clean_text(&self.http, link, self.max_text_chars).await {
            Ok(text) => text,
            Err(e) => {
                warn!("{}", e);
                return (ReportRow::error(link), false);
            }
        };

        let metadata = extract_metadata(link, &text);

        let summary = match self.llm.generate_2l_format(&text).await {
            Ok(raw) => parse_2l(&raw),
            Err(e) => {
                error!("Summary failed for {}: {}", link, e);
                TwoLSummary::filled(ERROR)
            }
        };

        (ReportRow::new(link, metadata, summary), true)
    }

    /// Process every link in order. `on_progress(index, total, link)` is called
    /// before each link is fetched.
    pub async fn run<F>(&self, links: &[String], mut on_progress: F) -> BatchReport
    where
        F: FnMut(usize, usize, &str),
    {
        let total = links.len();
        let mut rows = Vec::with_capacity(total);
        let mut failed = 0;

        for (i, link) in links.iter().enumerate() {
            on_progress(i, total, link);
            info!("Processing {}/{}: {}", i + 1, total, link);

            let (row, fetched) = self.process_link(link).await;
            rows.push(row);

            if !fetched {
                failed += 1;
                continue;
            }
            // Fixed pause between summaries; skipped after error rows
            if !self.row_delay.is_zero() {
                tokio::time::sleep(self.row_delay).await;
            }
        }

        info!("Extraction complete: {} rows, {} failed", total, failed);
        BatchReport {
            processed: total - failed,
            failed,
            rows,
        }
    }
}
