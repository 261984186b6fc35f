//! Image acquisition loop.
//!
//! Draws webcams from the pool until either `image_count` images have been
//! uploaded or the pool runs dry. A webcam without a readable timestamp or whose image is
//! not newer than the recorded high-water mark is skipped without delay; only
//! a confirmed newer image is downloaded, and every successful download is
//! followed by a politeness delay towards the image host.

use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::Resolution;
use crate::models::image::{AspectRatio, ImageCandidate, PublishedImage};
use crate::models::last_updated::LastUpdated;
use crate::models::post::BlobRef;
use crate::services::caption;
use crate::services::pool::CandidatePool;
use crate::services::webcam::WebcamSource;

/// Delay after each successful image download.
pub const POLITENESS_DELAY: Duration = Duration::from_secs(1);

/// Uploads an image to the platform's media store.
///
/// Failures are absorbed by the implementation; `None` means the candidate is
/// dropped and its high-water mark is left untouched.
#[async_trait]
pub trait MediaUploader: Send + Sync {
    async fn upload(&self, candidate: ImageCandidate) -> Option<BlobRef>;
}

#[derive(Debug, Clone)]
pub struct AcquisitionSettings {
    pub image_count: usize,
    pub resolution: Resolution,
    pub politeness_delay: Duration,
}

impl AcquisitionSettings {
    pub fn new(image_count: usize, resolution: Resolution) -> Self {
        Self {
            image_count,
            resolution,
            politeness_delay: POLITENESS_DELAY,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AcquisitionError {
    #[error("could not fetch a valid image ({attempted} webcams tried)")]
    NoImageAvailable { attempted: usize },
}

/// Why a drawn webcam did not contribute an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Skip {
    NoTimestamp,
    NotNewer,
    FetchFailed,
    CaptionFailed,
    UploadFailed,
}

impl Skip {
    fn as_str(self) -> &'static str {
        match self {
            Skip::NoTimestamp => "no_timestamp",
            Skip::NotNewer => "not_newer",
            Skip::FetchFailed => "fetch_failed",
            Skip::CaptionFailed => "caption_failed",
            Skip::UploadFailed => "upload_failed",
        }
    }

    fn record(self, webcam_id: &str) {
        metrics::counter!("webcam_candidates_skipped_total", "reason" => self.as_str()).increment(1);
        debug!(webcam = %webcam_id, reason = self.as_str(), "Skipping webcam");
    }
}

/// Collect up to `settings.image_count` newly published webcam images.
///
/// `last_updated` is advanced in place for every image that was uploaded, so
/// the caller can persist partial progress even when this returns an error.
/// Returns `NoImageAvailable` only when the pool is exhausted and nothing was
/// collected; a partial batch at exhaustion is a success.
pub async fn acquire_latest_images<S, U, R>(
    source: &S,
    uploader: &U,
    pool: &mut CandidatePool<'_, R>,
    last_updated: &mut LastUpdated,
    settings: &AcquisitionSettings,
) -> Result<Vec<PublishedImage>, AcquisitionError>
where
    S: WebcamSource + ?Sized,
    U: MediaUploader + ?Sized,
    R: Rng,
{
    let mut batch = Vec::with_capacity(settings.image_count);
    let mut attempted = 0;

    loop {
        let Some(webcam) = pool.draw() else {
            if batch.is_empty() {
                warn!(attempted, "Webcam pool exhausted without a single new image");
                return Err(AcquisitionError::NoImageAvailable { attempted });
            }
            info!(
                collected = batch.len(),
                wanted = settings.image_count,
                "Webcam pool exhausted, posting partial batch"
            );
            return Ok(batch);
        };
        attempted += 1;

        let Some(timestamp) = source.latest_timestamp(webcam.id).await else {
            Skip::NoTimestamp.record(webcam.id);
            continue;
        };

        if !last_updated.is_newer(webcam.id, timestamp) {
            Skip::NotNewer.record(webcam.id);
            continue;
        }

        let Some(bytes) = source.fetch_image(webcam.id, settings.resolution).await else {
            Skip::FetchFailed.record(webcam.id);
            continue;
        };

        match caption::describe(webcam, timestamp) {
            Some(caption) => {
                let aspect_ratio = AspectRatio::detect(&bytes);
                let candidate = ImageCandidate {
                    webcam_id: webcam.id,
                    timestamp,
                    bytes,
                };

                match uploader.upload(candidate).await {
                    Some(blob) => {
                        last_updated.advance(webcam.id, timestamp);
                        info!(
                            webcam = %webcam.id,
                            media_id = %blob.media_id(),
                            "Uploaded latest image for webcam"
                        );
                        metrics::counter!("webcam_images_acquired_total", "webcam" => webcam.id)
                            .increment(1);
                        batch.push(PublishedImage {
                            caption,
                            image: blob,
                            aspect_ratio,
                        });
                    }
                    None => Skip::UploadFailed.record(webcam.id),
                }
            }
            None => {
                warn!(webcam = %webcam.id, timestamp, "Timestamp out of range for caption");
                Skip::CaptionFailed.record(webcam.id);
            }
        }

        // try not to hammer the image host, even when the upload failed
        sleep(settings.politeness_delay).await;

        if batch.len() == settings.image_count {
            return Ok(batch);
        }
    }
}
