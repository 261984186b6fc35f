use chrono::{DateTime, TimeZone, Utc};
use chrono_tz::Europe::Berlin;

use crate::models::webcam::Webcam;

const TIME_FORMAT: &str = "%d.%m.%Y, %H:%M";

/// Build the alt text for a webcam image taken at `timestamp` (Unix seconds):
/// `"<name> (<dd.mm.yyyy, HH:MM> UTC/<dd.mm.yyyy, HH:MM> local)"`, where local
/// is Europe/Berlin. Returns `None` for timestamps chrono cannot represent.
pub fn describe(webcam: &Webcam, timestamp: i64) -> Option<String> {
    let utc = DateTime::<Utc>::from_timestamp(timestamp, 0)?;
    let local = Berlin.from_utc_datetime(&utc.naive_utc());

    Some(format!(
        "{} ({} UTC/{} local)",
        webcam.display_name,
        utc.format(TIME_FORMAT),
        local.format(TIME_FORMAT)
    ))
}
