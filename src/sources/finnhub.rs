//! Finnhub `calendar/ipo`: JSON calendar filtered by a `from`/`to` range.

use super::cleaner::{non_blank, or_placeholder};
use super::http_client::HttpClient;
use super::{DateRange, IpoSource, SourceError};
use crate::config::FinnhubConfig;
use crate::models::ListingRow;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct CalendarResponse {
    #[serde(rename = "ipoCalendar", default)]
    ipo_calendar: Vec<CalendarEntry>,
}

/// Finnhub also sends exchange, price, share counts and status; unused here.
#[derive(Debug, Deserialize)]
struct CalendarEntry {
    date: Option<String>,
    name: Option<String>,
    symbol: Option<String>,
}

pub struct FinnhubSource {
    client: HttpClient,
    base_url: String,
    api_key: String,
}

impl FinnhubSource {
    pub fn new(client: HttpClient, config: &FinnhubConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }
}

fn calendar_url(base_url: &str, api_key: &str, range: DateRange) -> Result<url::Url, url::ParseError> {
    let from = range.from.format("%Y-%m-%d").to_string();
    let to = range.to.format("%Y-%m-%d").to_string();
    url::Url::parse_with_params(
        &format!("{}/calendar/ipo", base_url),
        &[("from", from.as_str()), ("to", to.as_str()), ("token", api_key)],
    )
}

#[async_trait]
impl IpoSource for FinnhubSource {
    fn name(&self) -> &'static str {
        "Finnhub"
    }

    async fn fetch(&self, range: DateRange) -> Result<Vec<ListingRow>, SourceError> {
        let url = calendar_url(&self.base_url, &self.api_key, range)?;
        let body = self.client.get_text(&url).await?;
        parse_calendar_json(&body)
    }
}

pub fn parse_calendar_json(body: &str) -> Result<Vec<ListingRow>, SourceError> {
    let response: CalendarResponse = serde_json::from_str(body)?;

    let rows: Vec<ListingRow> = response
        .ipo_calendar
        .into_iter()
        .map(|entry| ListingRow {
            symbol: or_placeholder(entry.symbol.as_deref()),
            company_name: or_placeholder(entry.name.as_deref()),
            ipo_date: non_blank(entry.date.as_deref()),
        })
        .collect();

    debug!("Finnhub calendar: {} rows", rows.len());
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PLACEHOLDER;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_calendar_json() {
        let body = r#"{
            "ipoCalendar": [
                {"date": "2024-06-06", "exchange": "NASDAQ", "name": "Acme Corporation",
                 "numberOfShares": 1000000, "price": "14-16", "status": "expected",
                 "symbol": "ACME", "totalSharesValue": 16000000},
                {"date": "2024-06-10", "name": "Nameless Inc", "symbol": null},
                {"date": "2024-06-11", "name": "Quiet Co"}
            ]
        }"#;
        let rows = parse_calendar_json(body).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].symbol, "ACME");
        assert_eq!(rows[0].company_name, "Acme Corporation");
        assert_eq!(rows[0].ipo_date.as_deref(), Some("2024-06-06"));
        assert_eq!(rows[1].symbol, PLACEHOLDER);
        assert_eq!(rows[2].symbol, PLACEHOLDER);
    }

    #[test]
    fn test_missing_calendar_is_empty() {
        assert!(parse_calendar_json("{}").unwrap().is_empty());
        assert!(parse_calendar_json(r#"{"ipoCalendar": []}"#).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_body_is_error() {
        assert!(matches!(
            parse_calendar_json("<html>oops</html>"),
            Err(SourceError::Json(_))
        ));
    }

    #[test]
    fn test_calendar_url_carries_range() {
        let range = DateRange {
            from: NaiveDate::from_ymd_opt(2024, 6, 6).unwrap(),
            to: NaiveDate::from_ymd_opt(2024, 6, 16).unwrap(),
        };
        let url = calendar_url("https://finnhub.io/api/v1", "key", range).unwrap();
        assert_eq!(
            url.as_str(),
            "https://finnhub.io/api/v1/calendar/ipo?from=2024-06-06&to=2024-06-16&token=key"
        );
    }
}
