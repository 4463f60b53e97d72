//! Alpha Vantage `IPO_CALENDAR`: a CSV of every scheduled listing. The endpoint
//! takes no date range, so the full calendar is returned on every call.

use super::cleaner::{non_blank, or_placeholder};
use super::http_client::HttpClient;
use super::{DateRange, IpoSource, SourceError};
use crate::config::AlphaVantageConfig;
use crate::models::ListingRow;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

/// `symbol,name,ipoDate,priceRangeLow,priceRangeHigh,currency,exchange`
#[derive(Debug, Deserialize)]
struct CalendarRow {
    symbol: Option<String>,
    name: Option<String>,
    #[serde(rename = "ipoDate")]
    ipo_date: Option<String>,
}

pub struct AlphaVantageSource {
    client: HttpClient,
    base_url: String,
    api_key: String,
}

impl AlphaVantageSource {
    pub fn new(client: HttpClient, config: &AlphaVantageConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }
}

fn calendar_url(base_url: &str, api_key: &str) -> Result<url::Url, url::ParseError> {
    url::Url::parse_with_params(
        &format!("{}/query", base_url),
        &[("function", "IPO_CALENDAR"), ("apikey", api_key)],
    )
}

#[async_trait]
impl IpoSource for AlphaVantageSource {
    fn name(&self) -> &'static str {
        "Alpha Vantage"
    }

    async fn fetch(&self, _range: DateRange) -> Result<Vec<ListingRow>, SourceError> {
        let url = calendar_url(&self.base_url, &self.api_key)?;
        let body = self.client.get_text(&url).await?;
        parse_calendar_csv(&body)
    }
}

/// Throttled or rejected requests come back as a JSON object instead of CSV.
fn api_message(body: &str) -> Option<String> {
    if !body.trim_start().starts_with('{') {
        return None;
    }
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["Error Message", "Information", "Note"]
        .iter()
        .find_map(|key| value.get(*key).and_then(|v| v.as_str()))
        .map(str::to_string)
        .or_else(|| Some(body.trim().to_string()))
}

pub fn parse_calendar_csv(body: &str) -> Result<Vec<ListingRow>, SourceError> {
    if let Some(msg) = api_message(body) {
        return Err(SourceError::Api(msg));
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(body.as_bytes());

    let mut rows = Vec::new();
    for result in reader.deserialize::<CalendarRow>() {
        let raw = result?;
        rows.push(ListingRow {
            symbol: or_placeholder(raw.symbol.as_deref()),
            company_name: or_placeholder(raw.name.as_deref()),
            ipo_date: non_blank(raw.ipo_date.as_deref()),
        });
    }

    debug!("Alpha Vantage calendar: {} rows", rows.len());
    Ok(rows)
}
