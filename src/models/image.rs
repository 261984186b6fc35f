use std::io::Cursor;

use image::ImageReader;
use serde::{Deserialize, Serialize};

use crate::models::post::BlobRef;

/// A freshly downloaded webcam image that passed the freshness check.
#[derive(Debug, Clone)]
pub struct ImageCandidate {
    pub webcam_id: &'static str,
    pub timestamp: i64,
    pub bytes: Vec<u8>,
}

/// Pixel dimensions of an embedded image, used by clients for layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectRatio {
    pub width: u32,
    pub height: u32,
}

impl AspectRatio {
    /// Read the dimensions from the image header without decoding pixels.
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        let (width, height) = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .ok()?
            .into_dimensions()
            .ok()?;

        if width == 0 || height == 0 {
            return None;
        }

        Some(Self { width, height })
    }
}

/// An image that was uploaded to the platform and is ready to be embedded.
#[derive(Debug, Clone, PartialEq)]
pub struct PublishedImage {
    pub caption: String,
    pub image: BlobRef,
    pub aspect_ratio: Option<AspectRatio>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, RgbImage};

    #[test]
    fn test_detect_jpeg_dimensions() {
        let mut bytes = Vec::new();
        RgbImage::new(16, 9)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)
            .unwrap();

        assert_eq!(
            AspectRatio::detect(&bytes),
            Some(AspectRatio { width: 16, height: 9 })
        );
    }

    #[test]
    fn test_detect_garbage() {
        assert_eq!(AspectRatio::detect(b"not an image"), None);
        assert_eq!(AspectRatio::detect(&[]), None);
    }
}
