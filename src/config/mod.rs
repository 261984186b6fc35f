use std::path::PathBuf;

use garde::Validate;
use serde::Deserialize;
use strum::{Display, EnumString};

/// Smallest and largest number of images a single post may carry.
pub const MIN_IMAGE_COUNT: usize = 1;
pub const MAX_IMAGE_COUNT: usize = 4;

#[derive(Debug, Deserialize, Validate)]
pub struct AppConfig {
    /// Bluesky handle (or DID) used for login and for the public post URL
    #[garde(length(min = 1))]
    pub bluesky_handle: String,

    /// Bluesky app password
    #[garde(length(min = 1))]
    pub bluesky_app_password: String,

    /// XRPC host of the account's PDS
    #[serde(default = "default_pds_url")]
    #[garde(length(min = 1))]
    pub bluesky_pds_url: String,

    /// Requested image width: 640, 816, 1200, 1920 or "full"
    #[serde(default = "default_image_size")]
    #[garde(skip)]
    pub image_size: String,

    /// Requested number of images per post (clamped to 1..=4)
    #[serde(default = "default_image_count")]
    #[garde(skip)]
    pub image_count: i64,

    /// Directory holding last_updated.json
    #[serde(default = "default_data_dir")]
    #[garde(skip)]
    pub data_dir: PathBuf,

    /// User-Agent sent with every outbound request
    #[serde(default = "default_user_agent")]
    #[garde(length(min = 1))]
    pub user_agent: String,

    /// Base URL of the DWD webcam open data directory
    #[serde(default = "default_webcam_base_url")]
    #[garde(length(min = 1))]
    pub webcam_base_url: String,

    /// Optional Prometheus textfile written at the end of a run
    #[serde(default)]
    #[garde(skip)]
    pub metrics_file: Option<PathBuf>,
}

fn default_pds_url() -> String {
    "https://bsky.social".to_string()
}

fn default_image_size() -> String {
    "1920".to_string()
}

fn default_image_count() -> i64 {
    1
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_user_agent() -> String {
    concat!("dwd-webcam-bot/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_webcam_base_url() -> String {
    "https://opendata.dwd.de/weather/webcam".to_string()
}

impl AppConfig {
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }
}

/// Image widths published by the DWD for every webcam.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
pub enum Resolution {
    #[strum(serialize = "640")]
    W640,
    #[strum(serialize = "816")]
    W816,
    #[strum(serialize = "1200")]
    W1200,
    #[strum(serialize = "1920")]
    W1920,
    #[strum(serialize = "full")]
    Full,
}

impl Resolution {
    /// Parse a configured size, ignoring surrounding whitespace.
    pub fn parse(value: &str) -> Result<Self, ConfigError> {
        let trimmed = value.trim();
        trimmed
            .parse()
            .map_err(|_| ConfigError::InvalidResolution(trimmed.to_string()))
    }
}

/// Clamp a requested image count into the range a post can hold.
pub fn clamp_image_count(requested: i64) -> usize {
    requested.clamp(MIN_IMAGE_COUNT as i64, MAX_IMAGE_COUNT as i64) as usize
}

/// Validated, typed options for one bot run.
#[derive(Debug, Clone)]
pub struct BotOptions {
    pub bluesky_handle: String,
    pub bluesky_app_password: String,
    pub bluesky_pds_url: String,
    pub resolution: Resolution,
    pub image_count: usize,
    pub data_dir: PathBuf,
    pub user_agent: String,
    pub webcam_base_url: String,
    pub metrics_file: Option<PathBuf>,
}

impl BotOptions {
    pub fn from_config(config: AppConfig) -> Result<Self, ConfigError> {
        config.validate().map_err(ConfigError::Invalid)?;

        Ok(Self {
            resolution: Resolution::parse(&config.image_size)?,
            image_count: clamp_image_count(config.image_count),
            bluesky_handle: config.bluesky_handle,
            bluesky_app_password: config.bluesky_app_password,
            bluesky_pds_url: config.bluesky_pds_url.trim_end_matches('/').to_string(),
            data_dir: config.data_dir,
            user_agent: config.user_agent,
            webcam_base_url: config.webcam_base_url.trim_end_matches('/').to_string(),
            metrics_file: config.metrics_file,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid image size: \"{0}\" (accepted: 640, 816, 1200, 1920, full)")]
    InvalidResolution(String),

    #[error("invalid configuration: {0}")]
    Invalid(garde::Report),

    #[error("failed to read configuration from environment: {0}")]
    Env(#[from] envy::Error),
}
