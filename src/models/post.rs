//! AT Protocol wire types for sessions, blobs and `app.bsky.feed.post` records.

use serde::{Deserialize, Serialize};

use crate::models::image::AspectRatio;

pub const POST_COLLECTION: &str = "app.bsky.feed.post";
pub const IMAGES_EMBED_TYPE: &str = "app.bsky.embed.images";

/// Content link inside a blob reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CidLink {
    #[serde(rename = "$link")]
    pub link: String,
}

/// Opaque handle returned by `com.atproto.repo.uploadBlob`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlobRef {
    #[serde(rename = "$type")]
    pub kind: String,
    #[serde(rename = "ref")]
    pub reference: CidLink,
    pub mime_type: String,
    pub size: u64,
}

impl BlobRef {
    /// The content id of the uploaded media.
    pub fn media_id(&self) -> &str {
        &self.reference.link
    }
}

#[derive(Debug, Deserialize)]
pub struct UploadBlobResponse {
    pub blob: BlobRef,
}

#[derive(Debug, Serialize)]
pub struct CreateSessionRequest<'a> {
    pub identifier: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub did: String,
    pub handle: String,
    pub access_jwt: String,
}

/// Error body of a failed XRPC call.
#[derive(Debug, Default, Deserialize)]
pub struct XrpcError {
    pub error: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbeddedImage {
    pub alt: String,
    pub image: BlobRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<AspectRatio>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImagesEmbed {
    #[serde(rename = "$type")]
    pub kind: &'static str,
    pub images: Vec<EmbeddedImage>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostRecord {
    #[serde(rename = "$type")]
    pub kind: &'static str,
    pub text: String,
    pub langs: Vec<String>,
    pub created_at: String,
    pub embed: ImagesEmbed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateRecordRequest {
    pub repo: String,
    pub collection: &'static str,
    pub record: PostRecord,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecordResponse {
    pub uri: String,
    pub cid: String,
    #[serde(default)]
    pub validation_status: Option<String>,
}
