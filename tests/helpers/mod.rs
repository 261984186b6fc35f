//! Fake collaborators for driving the acquisition loop without a network

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use dwd_webcam_bot::config::Resolution;
use dwd_webcam_bot::models::image::ImageCandidate;
use dwd_webcam_bot::models::post::{BlobRef, CidLink};
use dwd_webcam_bot::services::acquisition::MediaUploader;
use dwd_webcam_bot::services::webcam::WebcamSource;

/// A call made against `FakeSource`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceCall {
    Timestamp(String),
    Fetch(String, Resolution),
}

/// Webcam source answering from fixed tables. Unknown ids fail.
#[derive(Default)]
pub struct FakeSource {
    timestamps: HashMap<&'static str, i64>,
    images: HashMap<&'static str, Vec<u8>>,
    calls: Mutex<Vec<SourceCall>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Timestamp lookup for `id` returns `timestamp`.
    pub fn with_timestamp(mut self, id: &'static str, timestamp: i64) -> Self {
        self.timestamps.insert(id, timestamp);
        self
    }

    /// Image download for `id` returns `bytes`.
    pub fn with_image(mut self, id: &'static str, bytes: Vec<u8>) -> Self {
        self.images.insert(id, bytes);
        self
    }

    /// Timestamp and image both succeed for `id`.
    pub fn with_fresh(self, id: &'static str, timestamp: i64, bytes: Vec<u8>) -> Self {
        self.with_timestamp(id, timestamp).with_image(id, bytes)
    }

    pub fn calls(&self) -> Vec<SourceCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn checked(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SourceCall::Timestamp(id) => Some(id),
                SourceCall::Fetch(..) => None,
            })
            .collect()
    }

    pub fn fetched(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SourceCall::Fetch(id, _) => Some(id),
                SourceCall::Timestamp(_) => None,
            })
            .collect()
    }
}

#[async_trait]
impl WebcamSource for FakeSource {
    async fn latest_timestamp(&self, webcam_id: &str) -> Option<i64> {
        self.calls
            .lock()
            .unwrap()
            .push(SourceCall::Timestamp(webcam_id.to_string()));
        self.timestamps.get(webcam_id).copied()
    }

    async fn fetch_image(&self, webcam_id: &str, resolution: Resolution) -> Option<Vec<u8>> {
        self.calls
            .lock()
            .unwrap()
            .push(SourceCall::Fetch(webcam_id.to_string(), resolution));
        self.images.get(webcam_id).cloned()
    }
}

/// Media uploader that hands out `bafk-<id>` blobs, except for ids marked failing.
#[derive(Default)]
pub struct FakeUploader {
    failing: HashSet<&'static str>,
    uploads: Mutex<Vec<(String, i64)>>,
}

impl FakeUploader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_for(mut self, id: &'static str) -> Self {
        self.failing.insert(id);
        self
    }

    /// Every upload attempt as (webcam id, timestamp), failed ones included.
    pub fn uploads(&self) -> Vec<(String, i64)> {
        self.uploads.lock().unwrap().clone()
    }
}

pub fn blob_for(webcam_id: &str) -> BlobRef {
    BlobRef {
        kind: "blob".to_string(),
        reference: CidLink {
            link: format!("bafk-{webcam_id}"),
        },
        mime_type: "image/jpeg".to_string(),
        size: 2048,
    }
}

#[async_trait]
impl MediaUploader for FakeUploader {
    async fn upload(&self, candidate: ImageCandidate) -> Option<BlobRef> {
        self.uploads
            .lock()
            .unwrap()
            .push((candidate.webcam_id.to_string(), candidate.timestamp));

        if self.failing.contains(candidate.webcam_id) {
            return None;
        }
        Some(blob_for(candidate.webcam_id))
    }
}
