pub mod alpha_vantage;
pub mod cleaner;
pub mod finnhub;
pub mod http_client;

use crate::models::ListingRow;
use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;
use tracing::{info, warn};

pub use self::alpha_vantage::AlphaVantageSource;
pub use self::finnhub::FinnhubSource;

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("invalid request url: {0}")]
    Url(#[from] url::ParseError),

    #[error("transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider rejected request: {0}")]
    Api(String),

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
}

// ── Source trait ──────────────────────────────────────────────────────────────

/// Inclusive calendar range handed to sources that accept one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// Swappable IPO calendar provider.
#[async_trait]
pub trait IpoSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch(&self, range: DateRange) -> Result<Vec<ListingRow>, SourceError>;
}

// ── Fetch outcome ─────────────────────────────────────────────────────────────

/// What one source produced during a run.
#[derive(Debug)]
pub struct FetchOutcome {
    pub source: &'static str,
    pub result: Result<Vec<ListingRow>, SourceError>,
}

/// Query every source in order. A failing source is logged and recorded,
/// never propagated.
pub async fn fetch_all(sources: &[Box<dyn IpoSource>], range: DateRange) -> Vec<FetchOutcome> {
    let mut outcomes = Vec::with_capacity(sources.len());

    for source in sources {
        let result = source.fetch(range).await;
        match &result {
            Ok(rows) => info!("{}: {} rows", source.name(), rows.len()),
            Err(e) => warn!("{}: fetch failed: {}", source.name(), e),
        }
        outcomes.push(FetchOutcome {
            source: source.name(),
            result,
        });
    }

    outcomes
}
