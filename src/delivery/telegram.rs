use super::{DeliveryError, MessageSender};
use crate::config::TelegramConfig;
use crate::sources::http_client::HttpClient;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'static str,
}

#[derive(Debug, Deserialize)]
struct ApiReply {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Telegram Bot API `sendMessage`.
pub struct TelegramSender {
    client: HttpClient,
    endpoint: url::Url,
}

impl TelegramSender {
    pub fn new(client: HttpClient, config: &TelegramConfig) -> Result<Self, DeliveryError> {
        Ok(Self {
            client,
            endpoint: send_message_url(&config.api_base, &config.bot_token)?,
        })
    }
}

fn send_message_url(api_base: &str, token: &str) -> Result<url::Url, url::ParseError> {
    url::Url::parse(&format!(
        "{}/bot{}/sendMessage",
        api_base.trim_end_matches('/'),
        token
    ))
}

/// Decide the outcome from status + body; Telegram reports errors as
/// `{"ok": false, "description": ...}`.
fn check_reply(status: u16, body: &str) -> Result<(), DeliveryError> {
    match serde_json::from_str::<ApiReply>(body) {
        Ok(reply) if reply.ok && (200..300).contains(&status) => Ok(()),
        Ok(reply) => Err(DeliveryError::Rejected {
            status,
            description: reply
                .description
                .unwrap_or_else(|| "no description".to_string()),
        }),
        Err(_) => Err(DeliveryError::Rejected {
            status,
            description: body.chars().take(200).collect(),
        }),
    }
}

#[async_trait]
impl MessageSender for TelegramSender {
    async fn send(&self, destination: &str, text: &str) -> Result<(), DeliveryError> {
        let payload = SendMessage {
            chat_id: destination,
            text,
            parse_mode: "Markdown",
        };

        let response = self.client.post_json(&self.endpoint, &payload).await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        check_reply(status, &body)
    }
}
