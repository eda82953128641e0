use std::env;

pub const OPENROUTER_URL: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const OPENROUTER_MODEL: &str = "bytedance-seed/seed-1.6-flash";
pub const LASTFM_URL: &str = "http://ws.audioscrobbler.com/2.0/";

const APP_REFERER: &str = "http://localhost:5000";
const APP_TITLE: &str = "AI Song Recommender";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Completion provider credential. Recommendation requests fail without it.
    pub openrouter_api_key: Option<String>,
    pub openrouter_url: String,
    pub openrouter_model: String,
    /// Sent as `HTTP-Referer` / `X-Title` for OpenRouter app attribution
    pub app_referer: String,
    pub app_title: String,
    /// Metadata provider credential. Enrichment is skipped when unset.
    pub lastfm_api_key: Option<String>,
    pub lastfm_url: String,
    /// Country passed to `geo.getTopTracks` for trending enrichment
    pub trending_country: String,
    pub server_host: String,
    pub server_port: u16,
    /// Allowed CORS origins (comma-separated). "*" allows any origin.
    pub cors_origins: Vec<String>,
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openrouter_api_key: None,
            openrouter_url: OPENROUTER_URL.to_string(),
            openrouter_model: OPENROUTER_MODEL.to_string(),
            app_referer: APP_REFERER.to_string(),
            app_title: APP_TITLE.to_string(),
            lastfm_api_key: None,
            lastfm_url: LASTFM_URL.to_string(),
            trending_country: "US".to_string(),
            server_host: "0.0.0.0".to_string(),
            server_port: 5000,
            cors_origins: vec!["*".to_string()],
            log_format: LogFormat::Pretty,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let defaults = Config::default();

        let server_port = match env::var("SERVER_PORT") {
            Ok(port) => port
                .parse()
                .map_err(|_| anyhow::anyhow!("SERVER_PORT must be a valid port number, got {:?}", port))?,
            Err(_) => defaults.server_port,
        };

        let cors_origins = parse_origins(
            &env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string()),
        );

        let log_format = match env::var("LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Config {
            openrouter_api_key: non_empty_var("OPENROUTER_API_KEY"),
            lastfm_api_key: non_empty_var("LASTFM_API_KEY"),
            trending_country: env::var("TRENDING_COUNTRY")
                .unwrap_or(defaults.trending_country),
            server_host: env::var("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port,
            cors_origins,
            log_format,
            ..Config::default()
        })
    }

    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.iter().any(|o| o == "*")
    }
}

/// An empty `KEY=` line in `.env` counts as unset.
fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
