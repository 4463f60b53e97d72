use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Top-level application configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub providers: ProvidersConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

/// Messaging credentials and destinations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TelegramConfig {
    #[serde(default)]
    pub bot_token: String,

    /// Accepts a TOML list or a comma-separated string (handy for env vars).
    #[serde(default, deserialize_with = "deserialize_chat_ids")]
    pub chat_ids: Vec<String>,

    #[serde(default = "default_telegram_api_base")]
    pub api_base: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub alpha_vantage: AlphaVantageConfig,
    #[serde(default)]
    pub finnhub: FinnhubConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AlphaVantageConfig {
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_alpha_vantage_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FinnhubConfig {
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_finnhub_url")]
    pub base_url: String,
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Report layout configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ReportConfig {
    /// Prepend a "Recently Priced (Past 7 Days)" section.
    #[serde(default)]
    pub include_recent: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("missing required config field `{0}`")]
    Missing(&'static str),
}

// ── Defaults ─────────────────────────────────────────────────────────────────

fn default_telegram_api_base() -> String {
    "https://api.telegram.org".to_string()
}
fn default_alpha_vantage_url() -> String {
    "https://www.alphavantage.co".to_string()
}
fn default_finnhub_url() -> String {
    "https://finnhub.io/api/v1".to_string()
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_user_agent() -> String {
    "ipo-digest/0.1 (IPO calendar notifier)".to_string()
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            chat_ids: Vec::new(),
            api_base: default_telegram_api_base(),
        }
    }
}

impl Default for AlphaVantageConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_alpha_vantage_url(),
        }
    }
}

impl Default for FinnhubConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_finnhub_url(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

// ── Chat id parsing ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(untagged)]
enum ChatIds {
    Joined(String),
    List(Vec<ChatId>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ChatId {
    Text(String),
    Number(i64),
}

fn deserialize_chat_ids<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let ids = match ChatIds::deserialize(deserializer)? {
        ChatIds::Joined(s) => split_chat_ids(&s),
        ChatIds::List(items) => items
            .into_iter()
            .map(|id| match id {
                ChatId::Text(s) => s.trim().to_string(),
                ChatId::Number(n) => n.to_string(),
            })
            .filter(|s| !s.is_empty())
            .collect(),
    };
    Ok(ids)
}

pub fn split_chat_ids(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

// ── Loader ───────────────────────────────────────────────────────────────────

impl AppConfig {
    /// Load configuration from file + environment overrides, then validate.
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let cfg = config::Config::builder()
            .add_source(
                config::File::with_name("config/default")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(
                config::File::with_name("config/local")
                    .required(false)
                    .format(config::FileFormat::Toml),
            )
            .add_source(config::Environment::with_prefix("IPO").separator("__"))
            .build()?;

        let app_cfg: AppConfig = cfg.try_deserialize()?;
        app_cfg.validate()?;
        Ok(app_cfg)
    }

    /// Every credential and at least one destination must be present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.telegram.bot_token.trim().is_empty() {
            return Err(ConfigError::Missing("telegram.bot_token"));
        }
        if self.telegram.chat_ids.is_empty() {
            return Err(ConfigError::Missing("telegram.chat_ids"));
        }
        if self.providers.alpha_vantage.api_key.trim().is_empty() {
            return Err(ConfigError::Missing("providers.alpha_vantage.api_key"));
        }
        if self.providers.finnhub.api_key.trim().is_empty() {
            return Err(ConfigError::Missing("providers.finnhub.api_key"));
        }
        Ok(())
    }
}
