use std::future::Future;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info};

use crate::config::{AppConfig, BotOptions, ConfigError};
use crate::models::last_updated::LastUpdated;
use crate::models::webcam::WEBCAMS;
use crate::services::acquisition::{self, AcquisitionError, AcquisitionSettings};
use crate::services::bluesky::{BlueskyClient, BlueskyError};
use crate::services::pool::CandidatePool;
use crate::services::publisher::{self, PublishError};
use crate::services::state::{StateError, StateStore};
use crate::services::webcam::{DwdWebcamClient, WebcamError};

#[derive(Debug, thiserror::Error)]
pub enum BotError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Webcam(#[from] WebcamError),

    #[error("Bluesky login failed: {0}")]
    Bluesky(#[from] BlueskyError),

    #[error(transparent)]
    Acquisition(#[from] AcquisitionError),

    #[error(transparent)]
    Publish(#[from] PublishError),
}

/// Process exit status of a run that posted.
pub const EXIT_SUCCESS: u8 = 0;

/// Process exit status for every fatal condition.
pub const EXIT_FAILURE: u8 = 255;

/// Read the environment (and `.env`) into validated options.
pub fn load_options() -> Result<BotOptions, BotError> {
    let config = AppConfig::from_env().map_err(ConfigError::from)?;
    Ok(BotOptions::from_config(config)?)
}

pub fn exit_status<T>(result: &Result<T, BotError>) -> u8 {
    match result {
        Ok(_) => EXIT_SUCCESS,
        Err(_) => EXIT_FAILURE,
    }
}

/// One complete bot run. Returns the public URL of the new post.
pub async fn run(options: &BotOptions) -> Result<String, BotError> {
    let store = StateStore::new(&options.data_dir);

    with_saved_state(&store, |mut last_updated| async move {
        let outcome = post_latest_images(options, &mut last_updated).await;
        (last_updated, outcome)
    })
    .await
}

/// Load the state record, hand it to `body`, and save whatever record `body`
/// hands back, whether it succeeded or not. High-water marks advanced before
/// a later failure are therefore kept.
pub async fn with_saved_state<F, Fut, T>(store: &StateStore, body: F) -> Result<T, BotError>
where
    F: FnOnce(LastUpdated) -> Fut,
    Fut: Future<Output = (LastUpdated, Result<T, BotError>)>,
{
    let last_updated = store.load()?;
    let (last_updated, outcome) = body(last_updated).await;

    if let Err(e) = store.save(&last_updated) {
        error!(error = %e, "Failed to save state");
        // an earlier failure is the more useful one to report
        outcome?;
        return Err(e.into());
    }

    outcome
}

async fn post_latest_images(
    options: &BotOptions,
    last_updated: &mut LastUpdated,
) -> Result<String, BotError> {
    let bluesky = BlueskyClient::login(
        &options.bluesky_pds_url,
        &options.bluesky_handle,
        &options.bluesky_app_password,
        &options.user_agent,
    )
    .await?;
    let webcams = DwdWebcamClient::new(&options.webcam_base_url, &options.user_agent)?;

    let settings = AcquisitionSettings::new(options.image_count, options.resolution);
    let mut pool = CandidatePool::new(WEBCAMS, StdRng::from_entropy());

    info!(
        image_count = settings.image_count,
        resolution = %settings.resolution,
        webcams = pool.remaining(),
        "Looking for new webcam images"
    );

    let images =
        acquisition::acquire_latest_images(&webcams, &bluesky, &mut pool, last_updated, &settings)
            .await?;

    Ok(publisher::publish(&bluesky, images).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_state_saved_when_body_fails() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path());

        let result: Result<(), BotError> = with_saved_state(&store, |mut record| async move {
            record.advance("Hamburg-SO", 1_700_000_000);
            let outcome: Result<(), BotError> =
                Err(AcquisitionError::NoImageAvailable { attempted: 10 }.into());
            (record, outcome)
        })
        .await;

        assert!(matches!(
            result,
            Err(BotError::Acquisition(AcquisitionError::NoImageAvailable { attempted: 10 }))
        ));
        assert_eq!(store.load().unwrap().last_seen("Hamburg-SO"), 1_700_000_000);
    }

    #[tokio::test]
    async fn test_state_saved_on_success() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path());

        let url = with_saved_state(&store, |mut record| async move {
            record.advance("Offenbach-W", 42);
            (record, Ok("https://bsky.app/profile/h/post/x".to_string()))
        })
        .await
        .unwrap();

        assert_eq!(url, "https://bsky.app/profile/h/post/x");
        assert_eq!(store.load().unwrap().last_seen("Offenbach-W"), 42);
    }

    #[test]
    fn test_exit_status() {
        let posted: Result<String, BotError> = Ok("https://bsky.app/profile/h/post/x".to_string());
        assert_eq!(exit_status(&posted), 0);

        let config: Result<String, BotError> =
            Err(ConfigError::InvalidResolution("800".to_string()).into());
        assert!(matches!(config, Err(BotError::Config(_))));
        assert_eq!(exit_status(&config), 255);

        let nothing_new: Result<String, BotError> =
            Err(AcquisitionError::NoImageAvailable { attempted: 10 }.into());
        assert_eq!(exit_status(&nothing_new), 255);

        let rejected: Result<String, BotError> =
            Err(PublishError::InvalidStatus(Some("unknown".to_string())).into());
        assert_eq!(exit_status(&rejected), 255);
    }

    #[tokio::test]
    async fn test_unreadable_state_aborts_before_body() {
        let dir = TempDir::new().unwrap();
        let store = StateStore::new(dir.path());
        std::fs::write(store.path(), "not json").unwrap();

        let mut ran = false;
        let result: Result<(), BotError> = with_saved_state(&store, |record| {
            ran = true;
            async move { (record, Ok(())) }
        })
        .await;

        assert!(matches!(result, Err(BotError::State(StateError::Parse { .. }))));
        assert!(!ran);
    }
}
