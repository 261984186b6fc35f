use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Per-webcam high-water mark: the timestamp (Unix seconds) of the last
/// image that was published for that webcam.
///
/// Serializes as a flat JSON object `{"Hamburg-SO": 1700000000, ...}`.
/// Keys that are no longer in the catalog are kept as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LastUpdated(BTreeMap<String, i64>);

impl LastUpdated {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last published timestamp, 0 when the webcam was never published.
    pub fn last_seen(&self, webcam_id: &str) -> i64 {
        self.0.get(webcam_id).copied().unwrap_or(0)
    }

    /// True when `timestamp` is strictly newer than the recorded one.
    pub fn is_newer(&self, webcam_id: &str, timestamp: i64) -> bool {
        timestamp > self.last_seen(webcam_id)
    }

    /// Raise the mark for `webcam_id` to `timestamp`. Never moves it
    /// backwards; returns whether the record changed.
    pub fn advance(&mut self, webcam_id: &str, timestamp: i64) -> bool {
        if !self.is_newer(webcam_id, timestamp) {
            return false;
        }
        self.0.insert(webcam_id.to_string(), timestamp);
        true
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, i64)> for LastUpdated {
    fn from_iter<I: IntoIterator<Item = (String, i64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
