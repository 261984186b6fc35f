use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::models::image::ImageCandidate;
use crate::models::post::{
    BlobRef, CreateRecordRequest, CreateRecordResponse, CreateSessionRequest, Session,
    UploadBlobResponse, XrpcError,
};
use crate::services::acquisition::MediaUploader;
use crate::services::webcam::JPEG_CONTENT_TYPE;

/// Largest blob `app.bsky.embed.images` accepts.
pub const MAX_IMAGE_BLOB_SIZE: usize = 1_000_000;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum BlueskyError {
    #[error("HTTP request to Bluesky failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Bluesky returned HTTP {status}: {}", describe_xrpc(.error, .message))]
    Api {
        status: StatusCode,
        error: Option<String>,
        message: Option<String>,
    },

    #[error("image of {size} bytes exceeds the 1000000 byte blob limit")]
    BlobTooLarge { size: usize },
}

fn describe_xrpc(error: &Option<String>, message: &Option<String>) -> String {
    match (error, message) {
        (Some(error), Some(message)) => format!("{error}: {message}"),
        (Some(text), None) | (None, Some(text)) => text.clone(),
        (None, None) => "no error details".to_string(),
    }
}

/// Authenticated XRPC client for a single Bluesky account.
pub struct BlueskyClient {
    http: reqwest::Client,
    pds_url: String,
    session: Session,
}

impl BlueskyClient {
    /// Log in with an app password via `com.atproto.server.createSession`.
    pub async fn login(
        pds_url: &str,
        identifier: &str,
        password: &str,
        user_agent: &str,
    ) -> Result<Self, BlueskyError> {
        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let pds_url = pds_url.trim_end_matches('/').to_string();

        let response = http
            .post(xrpc_url(&pds_url, "com.atproto.server.createSession"))
            .json(&CreateSessionRequest {
                identifier,
                password,
            })
            .send()
            .await?;
        let session: Session = decode(response).await?;

        info!(did = %session.did, handle = %session.handle, "Logged in to Bluesky");

        Ok(Self {
            http,
            pds_url,
            session,
        })
    }

    pub fn did(&self) -> &str {
        &self.session.did
    }

    pub fn handle(&self) -> &str {
        &self.session.handle
    }

    /// Upload raw image bytes to the account's blob store.
    pub async fn upload_blob(&self, bytes: Vec<u8>, mime_type: &str) -> Result<BlobRef, BlueskyError> {
        if bytes.len() > MAX_IMAGE_BLOB_SIZE {
            return Err(BlueskyError::BlobTooLarge { size: bytes.len() });
        }

        let response = self
            .http
            .post(xrpc_url(&self.pds_url, "com.atproto.repo.uploadBlob"))
            .bearer_auth(&self.session.access_jwt)
            .header(CONTENT_TYPE, mime_type)
            .body(bytes)
            .send()
            .await?;

        let uploaded: UploadBlobResponse = decode(response).await?;
        Ok(uploaded.blob)
    }

    /// Submit a record via `com.atproto.repo.createRecord`.
    pub async fn create_record(
        &self,
        request: &CreateRecordRequest,
    ) -> Result<CreateRecordResponse, BlueskyError> {
        let response = self
            .http
            .post(xrpc_url(&self.pds_url, "com.atproto.repo.createRecord"))
            .bearer_auth(&self.session.access_jwt)
            .json(request)
            .send()
            .await?;

        decode(response).await
    }
}

#[async_trait]
impl MediaUploader for BlueskyClient {
    async fn upload(&self, candidate: ImageCandidate) -> Option<BlobRef> {
        match self.upload_blob(candidate.bytes, JPEG_CONTENT_TYPE).await {
            Ok(blob) => Some(blob),
            Err(e) => {
                warn!(webcam = %candidate.webcam_id, error = %e, "Media upload failed");
                None
            }
        }
    }
}

fn xrpc_url(pds_url: &str, method: &str) -> String {
    format!("{pds_url}/xrpc/{method}")
}

/// Decode a successful XRPC response, or turn the error body into `Api`.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, BlueskyError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let body: XrpcError = response.json().await.unwrap_or_default();
    Err(BlueskyError::Api {
        status,
        error: body.error,
        message: body.message,
    })
}
