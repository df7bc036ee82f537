use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub game: GameConfig,
    pub storage: StorageConfig,
    pub publish: PublishConfig,
    pub scheduler: SchedulerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub frontend_url: String,
    /// Expose internal error detail in failure responses
    pub debug: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GameConfig {
    pub corpus_path: String,
    pub option_count: usize,
    pub min_answer: usize,
    pub max_answer: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub record_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishTarget {
    /// Object storage endpoint accepting `PUT {url}/{key}`
    Http(String),
    /// Local directory
    Directory(String),
}

#[derive(Debug, Clone, Deserialize)]
pub struct CdnConfig {
    pub distribution_id: String,
    pub invalidation_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PublishConfig {
    pub target: PublishTarget,
    pub auth_token: Option<String>,
    pub game_data_key: String,
    pub font_key: String,
    pub source_font_path: Option<String>,
    pub cdn: Option<CdnConfig>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunMode {
    /// Serve the read API and run the pipeline every UTC midnight
    Server,
    /// Run the pipeline once and exit
    Once,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    pub run_mode: RunMode,
    pub run_on_start: bool,
}

fn parse_or<T: FromStr>(value: Option<String>, key: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {:?}", key, raw)),
        None => Ok(default),
    }
}

fn parse_flag(value: Option<String>, key: &str, default: bool) -> Result<bool> {
    match value.as_deref().map(|v| v.trim().to_ascii_lowercase()) {
        None => Ok(default),
        Some(v) if matches!(v.as_str(), "1" | "true" | "yes" | "on") => Ok(true),
        Some(v) if matches!(v.as_str(), "0" | "false" | "no" | "off") => Ok(false),
        Some(v) => bail!("{} must be true or false, got {:?}", key, v),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup (the process environment in production)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| non_empty(lookup(key));

        let server = ServerConfig {
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(var("PORT"), "PORT", 8000)?,
            frontend_url: var("FRONTEND_URL")
                .unwrap_or_else(|| "http://localhost:3000".to_string()),
            debug: parse_flag(var("DEBUG"), "DEBUG", false)?,
        };

        let game = GameConfig {
            corpus_path: var("EMOJI_CORPUS_PATH")
                .unwrap_or_else(|| "./base_emojis.json".to_string()),
            option_count: parse_or(var("OPTION_COUNT"), "OPTION_COUNT", 25)?,
            min_answer: parse_or(var("MIN_ANSWER"), "MIN_ANSWER", 2)?,
            max_answer: parse_or(var("MAX_ANSWER"), "MAX_ANSWER", 4)?,
        };
        if game.min_answer == 0 || game.min_answer > game.max_answer {
            bail!(
                "MIN_ANSWER ({}) must be at least 1 and not above MAX_ANSWER ({})",
                game.min_answer,
                game.max_answer
            );
        }
        if game.max_answer > game.option_count {
            bail!(
                "MAX_ANSWER ({}) cannot exceed OPTION_COUNT ({})",
                game.max_answer,
                game.option_count
            );
        }

        let storage = StorageConfig {
            record_path: var("DAILY_GAME_RECORD_PATH")
                .unwrap_or_else(|| "./data/daily_game.json".to_string()),
        };

        let target = var("PUBLISH_TARGET").context("PUBLISH_TARGET must be set")?;
        let target = if target.starts_with("http://") || target.starts_with("https://") {
            PublishTarget::Http(target)
        } else {
            PublishTarget::Directory(target)
        };

        let cdn = match var("CDN_DISTRIBUTION_ID") {
            Some(distribution_id) => Some(CdnConfig {
                distribution_id,
                invalidation_url: var("CDN_INVALIDATION_URL")
                    .context("CDN_INVALIDATION_URL must be set when CDN_DISTRIBUTION_ID is")?,
            }),
            None => None,
        };

        let publish = PublishConfig {
            target,
            auth_token: var("PUBLISH_AUTH_TOKEN"),
            game_data_key: var("GAME_DATA_KEY")
                .unwrap_or_else(|| "stackmoji-game-data.json".to_string()),
            font_key: var("FONT_KEY").unwrap_or_else(|| "stackmoji-emoji-subset.ttf".to_string()),
            source_font_path: var("SOURCE_FONT_PATH"),
            cdn,
            timeout_secs: parse_or(var("PUBLISH_TIMEOUT_SECS"), "PUBLISH_TIMEOUT_SECS", 30)?,
        };

        let run_mode = match var("RUN_MODE").as_deref().map(str::to_ascii_lowercase).as_deref() {
            None | Some("server") => RunMode::Server,
            Some("once") => RunMode::Once,
            Some(other) => bail!("RUN_MODE must be 'server' or 'once', got {:?}", other),
        };
        let scheduler = SchedulerConfig {
            run_mode,
            run_on_start: parse_flag(var("SCHEDULE_ON_START"), "SCHEDULE_ON_START", true)?,
        };

        Ok(Config {
            server,
            game,
            storage,
            publish,
            scheduler,
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
