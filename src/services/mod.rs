pub mod acquisition;
pub mod bluesky;
pub mod caption;
pub mod pool;
pub mod publisher;
pub mod state;
pub mod webcam;
