pub mod image;
pub mod last_updated;
pub mod post;
pub mod webcam;
