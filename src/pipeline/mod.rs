//! Pipeline orchestrator: sources → aggregator → windows → report → delivery.
//!
//! One run is strictly sequential. Source and destination failures degrade
//! the digest; they never abort the run.
//!
//! Re-running inside the same window sends the same digest again: nothing is
//! remembered between runs.

use crate::aggregator::merge;
use crate::config::AppConfig;
use crate::delivery::{DeliveryReport, MessageSender, TelegramSender, deliver};
use crate::report::{fetch_span, plan_for, recently_priced, render_report};
use crate::sources::http_client::HttpClient;
use crate::sources::{AlphaVantageSource, DateRange, FinnhubSource, IpoSource, fetch_all};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use tracing::{debug, info, warn};

pub struct Pipeline {
    sources: Vec<Box<dyn IpoSource>>,
    sender: Box<dyn MessageSender>,
    destinations: Vec<String>,
    include_recent: bool,
}

impl Pipeline {
    pub fn new(
        sources: Vec<Box<dyn IpoSource>>,
        sender: Box<dyn MessageSender>,
        destinations: Vec<String>,
        include_recent: bool,
    ) -> Self {
        Self {
            sources,
            sender,
            destinations,
            include_recent,
        }
    }

    /// Wire up the real providers and Telegram. Alpha Vantage is listed first
    /// so its rows take priority in deduplication.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let client = HttpClient::new(&config.http)?;

        let sources: Vec<Box<dyn IpoSource>> = vec![
            Box::new(AlphaVantageSource::new(client.clone(), &config.providers.alpha_vantage)),
            Box::new(FinnhubSource::new(client.clone(), &config.providers.finnhub)),
        ];
        let sender = TelegramSender::new(client, &config.telegram)
            .context("Failed to build Telegram sender")?;

        Ok(Self::new(
            sources,
            Box::new(sender),
            config.telegram.chat_ids.clone(),
            config.report.include_recent,
        ))
    }

    /// Fetch, merge and render the digest for `today`.
    pub async fn build_digest(&self, today: NaiveDate) -> Digest {
        let mut windows = plan_for(today);
        if self.include_recent {
            windows.insert(0, recently_priced(today));
        }
        let range = fetch_span(&windows).unwrap_or(DateRange { from: today, to: today });

        info!("=== Step 1: Fetching IPO calendars ({} → {}) ===", range.from, range.to);
        let outcomes = fetch_all(&self.sources, range).await;

        info!("=== Step 2: Merging ===");
        let (ipos, merge_stats) = merge(&outcomes);
        if ipos.is_empty() {
            warn!("No dated IPOs from any source");
        }
        for r in ipos.records() {
            debug!("{} {} ({})", r.ipo_date, r.company_name, r.symbol);
        }

        info!("=== Step 3: Rendering {} windows ===", windows.len());
        let mut text = render_report(&ipos, &windows);
        if !merge_stats.failed_sources.is_empty() {
            text.push_str(&format!(
                "\n\n_Could not reach {}; listings may be incomplete._",
                merge_stats.failed_sources.join(", ")
            ));
        }

        Digest {
            text,
            windows: windows.len(),
            ipos: ipos.len(),
            failed_sources: merge_stats.failed_sources.len(),
        }
    }

    /// Build the digest and, unless `dry_run`, send it to every destination.
    pub async fn run(&self, today: NaiveDate, dry_run: bool) -> (Digest, Option<DeliveryReport>) {
        let digest = self.build_digest(today).await;

        if dry_run {
            info!("Dry run: skipping delivery to {} destinations", self.destinations.len());
            return (digest, None);
        }

        info!("=== Step 4: Delivering to {} destinations ===", self.destinations.len());
        let report = deliver(self.sender.as_ref(), &digest.text, &self.destinations).await;
        info!(
            "=== Done: {} IPOs | {} delivered | {} failed ===",
            digest.ipos,
            report.delivered.len(),
            report.failed.len()
        );

        (digest, Some(report))
    }
}

#[derive(Debug)]
pub struct Digest {
    pub text: String,
    pub windows: usize,
    pub ipos: usize,
    pub failed_sources: usize,
}
