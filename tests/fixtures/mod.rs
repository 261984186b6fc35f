//! Test fixtures: a small webcam catalog and a real JPEG payload

use std::io::Cursor;

use dwd_webcam_bot::models::webcam::Webcam;
use image::{ImageFormat, RgbImage};

pub const ALPHA: Webcam = Webcam {
    id: "Alpha-N",
    display_name: "Station Alpha - Blick nach Norden",
};

pub const BRAVO: Webcam = Webcam {
    id: "Bravo-O",
    display_name: "Station Bravo - Blick nach Osten",
};

pub const CHARLIE: Webcam = Webcam {
    id: "Charlie-S",
    display_name: "Station Charlie - Blick nach Süden",
};

/// Three-webcam catalog; with a zero `StepRng` the pool draws in this order.
pub const TEST_CATALOG: &[Webcam] = &[ALPHA, BRAVO, CHARLIE];

/// 2023-11-14 22:13:20 UTC
pub const TS_NOV_2023: i64 = 1_700_000_000;

/// A small valid JPEG (32x18).
pub fn sample_jpeg() -> Vec<u8> {
    let mut bytes = Vec::new();
    RgbImage::new(32, 18)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Jpeg)
        .expect("encode test jpeg");
    bytes
}
