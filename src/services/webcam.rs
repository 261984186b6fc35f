//! DWD open data webcam client.
//!
//! Every webcam publishes its latest image in several widths next to a small
//! EXIF dump. The dump carries the capture time, which lets us skip images we
//! already posted without downloading them.
//!
//! Official Source: <https://opendata.dwd.de/weather/webcam/>

use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use tracing::{debug, warn};

use crate::config::Resolution;

/// The only content type accepted for downloaded images.
pub const JPEG_CONTENT_TYPE: &str = "image/jpeg";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Read access to the latest image of a webcam.
///
/// Implementations absorb every failure: `None` means "try another webcam".
#[async_trait]
pub trait WebcamSource: Send + Sync {
    /// Capture time (Unix seconds) of the latest image.
    async fn latest_timestamp(&self, webcam_id: &str) -> Option<i64>;

    /// Raw JPEG bytes of the latest image at the given width.
    async fn fetch_image(&self, webcam_id: &str, resolution: Resolution) -> Option<Vec<u8>>;
}

#[derive(Debug, thiserror::Error)]
pub enum WebcamError {
    #[error("HTTP request to DWD failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("DWD returned HTTP {0}")]
    Status(StatusCode),

    #[error("no FileDateTime in exif data")]
    MissingTimestamp,

    #[error("invalid image content type \"{0}\"")]
    ContentType(String),
}

/// Extract the `FileDateTime: <digits>` value from an EXIF dump.
pub fn parse_exif_timestamp(body: &str) -> Option<i64> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        Regex::new(r"FileDateTime: ([0-9]+)").expect("valid FileDateTime pattern")
    });

    pattern.captures(body)?.get(1)?.as_str().parse().ok()
}

/// HTTP client for the DWD webcam directory.
pub struct DwdWebcamClient {
    http: reqwest::Client,
    base_url: String,
}

impl DwdWebcamClient {
    pub fn new(base_url: &str, user_agent: &str) -> Result<Self, WebcamError> {
        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn exif_url(&self, webcam_id: &str) -> String {
        format!("{0}/{1}/{1}_latest.exif", self.base_url, webcam_id)
    }

    pub fn image_url(&self, webcam_id: &str, resolution: Resolution) -> String {
        format!("{0}/{1}/{1}_latest_{2}.jpg", self.base_url, webcam_id, resolution)
    }

    async fn fetch_exif_time(&self, webcam_id: &str) -> Result<i64, WebcamError> {
        let response = self.http.get(self.exif_url(webcam_id)).send().await?;

        if !response.status().is_success() {
            return Err(WebcamError::Status(response.status()));
        }

        let body = response.text().await?;
        parse_exif_timestamp(&body).ok_or(WebcamError::MissingTimestamp)
    }

    async fn download_image(
        &self,
        webcam_id: &str,
        resolution: Resolution,
    ) -> Result<Vec<u8>, WebcamError> {
        let response = self
            .http
            .get(self.image_url(webcam_id, resolution))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(WebcamError::Status(response.status()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_string();

        if content_type != JPEG_CONTENT_TYPE {
            return Err(WebcamError::ContentType(content_type));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl WebcamSource for DwdWebcamClient {
    async fn latest_timestamp(&self, webcam_id: &str) -> Option<i64> {
        match self.fetch_exif_time(webcam_id).await {
            Ok(timestamp) => {
                debug!(webcam = %webcam_id, timestamp, "Fetched exif timestamp");
                Some(timestamp)
            }
            Err(e) => {
                warn!(webcam = %webcam_id, error = %e, "Could not fetch exif timestamp");
                None
            }
        }
    }

    async fn fetch_image(&self, webcam_id: &str, resolution: Resolution) -> Option<Vec<u8>> {
        match self.download_image(webcam_id, resolution).await {
            Ok(bytes) => {
                debug!(webcam = %webcam_id, size = bytes.len(), "Downloaded latest image");
                Some(bytes)
            }
            Err(WebcamError::ContentType(content_type)) => {
                warn!(webcam = %webcam_id, content_type = %content_type, "Invalid image content type");
                None
            }
            Err(e) => {
                warn!(webcam = %webcam_id, error = %e, "Could not fetch image");
                None
            }
        }
    }
}
