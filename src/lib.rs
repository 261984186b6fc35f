//! DWD Webcam Bot
//!
//! Picks random webcams of the Deutscher Wetterdienst, checks whether a newer
//! image was published since the last run, and posts the fresh images with a
//! caption to Bluesky. Meant to be run periodically (cron, systemd timer).

pub mod bot;
pub mod config;
pub mod models;
pub mod services;

#[cfg(test)]
pub(crate) mod test_helpers;
