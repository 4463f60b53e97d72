//! Digest delivery: length capping and per-destination sends.
//!
//! Each destination is attempted exactly once. A failed send is recorded and
//! the remaining destinations are still tried.

pub mod telegram;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{info, warn};

pub use self::telegram::TelegramSender;

/// Message ceiling, counted in UTF-16 code units as the messaging API does.
pub const MESSAGE_LIMIT: usize = 4096;

/// Appended to truncated messages; exactly six units long.
pub const TRUNCATION_MARKER: &str = "\n[...]";

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("invalid endpoint: {0}")]
    Url(#[from] url::ParseError),

    #[error("transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("rejected ({status}): {description}")]
    Rejected { status: u16, description: String },
}

/// Send primitive of the messaging platform.
#[async_trait]
pub trait MessageSender: Send + Sync {
    async fn send(&self, destination: &str, text: &str) -> Result<(), DeliveryError>;
}

fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

/// Cap `text` at [`MESSAGE_LIMIT`] units, cutting on a char boundary and
/// appending [`TRUNCATION_MARKER`].
pub fn truncate_message(text: &str) -> String {
    if utf16_len(text) <= MESSAGE_LIMIT {
        return text.to_string();
    }

    let budget = MESSAGE_LIMIT - utf16_len(TRUNCATION_MARKER);
    let mut used = 0;
    let mut cut = 0;
    for (idx, ch) in text.char_indices() {
        if used + ch.len_utf16() > budget {
            break;
        }
        used += ch.len_utf16();
        cut = idx + ch.len_utf8();
    }

    let mut out = String::with_capacity(cut + TRUNCATION_MARKER.len());
    out.push_str(&text[..cut]);
    out.push_str(TRUNCATION_MARKER);
    out
}

#[derive(Debug, Default)]
pub struct DeliveryReport {
    pub delivered: Vec<String>,
    pub failed: Vec<(String, DeliveryError)>,
}

impl DeliveryReport {
    pub fn all_failed(&self) -> bool {
        self.delivered.is_empty() && !self.failed.is_empty()
    }
}

pub async fn deliver(
    sender: &dyn MessageSender,
    text: &str,
    destinations: &[String],
) -> DeliveryReport {
    let message = truncate_message(text);
    if message.len() != text.len() {
        warn!(
            "Digest is {} units, truncated to {}",
            utf16_len(text),
            utf16_len(&message)
        );
    }

    let mut report = DeliveryReport::default();
    for destination in destinations {
        match sender.send(destination, &message).await {
            Ok(()) => {
                info!("Digest sent to {}", destination);
                report.delivered.push(destination.clone());
            }
            Err(e) => {
                warn!("Failed to send digest to {}: {}", destination, e);
                report.failed.push((destination.clone(), e));
            }
        }
    }

    report
}
