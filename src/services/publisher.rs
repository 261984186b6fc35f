use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{error, info};

use crate::models::image::PublishedImage;
use crate::models::post::{
    CreateRecordRequest, CreateRecordResponse, EmbeddedImage, ImagesEmbed, PostRecord,
    IMAGES_EMBED_TYPE, POST_COLLECTION,
};
use crate::services::bluesky::{BlueskyClient, BlueskyError};

/// The only `validationStatus` that counts as a published post.
const VALID_STATUS: &str = "valid";

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("post submission failed: {0}")]
    Submit(#[from] BlueskyError),

    #[error("invalid post status: {}", .0.as_deref().unwrap_or("missing"))]
    InvalidStatus(Option<String>),

    #[error("cannot derive post URL from record uri \"{0}\"")]
    MalformedUri(String),
}

/// Build the `app.bsky.feed.post` record embedding `images` in batch order.
pub fn build_post(repo: &str, images: Vec<PublishedImage>, created_at: DateTime<Utc>) -> CreateRecordRequest {
    let images = images
        .into_iter()
        .map(|image| EmbeddedImage {
            alt: image.caption,
            image: image.image,
            aspect_ratio: image.aspect_ratio,
        })
        .collect();

    CreateRecordRequest {
        repo: repo.to_string(),
        collection: POST_COLLECTION,
        record: PostRecord {
            kind: POST_COLLECTION,
            text: String::new(),
            langs: Vec::new(),
            created_at: created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            embed: ImagesEmbed {
                kind: IMAGES_EMBED_TYPE,
                images,
            },
        },
    }
}

/// Public web URL of a post: `https://bsky.app/profile/<handle>/post/<rkey>`.
pub fn post_url(handle: &str, uri: &str) -> Option<String> {
    let rkey = uri.rsplit('/').next().filter(|rkey| !rkey.is_empty())?;
    Some(format!("https://bsky.app/profile/{handle}/post/{rkey}"))
}

/// Decide whether the platform accepted the post. Returns the public URL.
pub fn interpret_response(handle: &str, response: &CreateRecordResponse) -> Result<String, PublishError> {
    if response.validation_status.as_deref() != Some(VALID_STATUS) {
        return Err(PublishError::InvalidStatus(response.validation_status.clone()));
    }

    post_url(handle, &response.uri).ok_or_else(|| PublishError::MalformedUri(response.uri.clone()))
}

/// Submit one post with the acquired images. Single attempt, no retry.
pub async fn publish(client: &BlueskyClient, images: Vec<PublishedImage>) -> Result<String, PublishError> {
    let count = images.len();
    let request = build_post(client.did(), images, Utc::now());

    let response = match client.create_record(&request).await {
        Ok(response) => response,
        Err(e) => {
            error!(error = %e, "Post submission failed");
            return Err(e.into());
        }
    };

    let url = interpret_response(client.handle(), &response)?;
    info!(url = %url, images = count, cid = %response.cid, "Posted");
    Ok(url)
}
