//! Timecode parsing
//!
//! Converts subtitle-style timecodes into the integer milliseconds the
//! engine works with.
//!
//! Accepted shapes:
//! - `HH:MM:SS,mmm` (SRT)
//! - `HH:MM:SS.mmm` (WebVTT)
//!
//! Parsing never fails: a malformed timecode yields `0` so that a single
//! corrupt line cannot stop playback of the rest of the track.
//!
//! # Legacy shapes
//!
//! Two inputs keep the behaviour existing vocabulary files were written
//! against:
//! - [`parse_to_millis`] on `HH:MM:SS` without a fractional part returns
//!   `(HH*3600 + MM*60) * 1000`; the seconds field is dropped.
//! - [`parse_to_seconds`] on a two-field `HH:MM` returns `HH*3600 + MM*60`,
//!   and reads only the first three fields of a longer one.

/// Parse a timecode into milliseconds, returning `0` when malformed.
///
/// The millisecond field is taken literally: `00:00:01,500` is `1500` and
/// `00:00:01.5` is `1005`.
pub fn parse_to_millis(text: &str) -> i64 {
    match try_parse_millis(text) {
        Some(ms) => ms,
        None => {
            tracing::debug!("Malformed timecode {:?}, using 0", text);
            0
        }
    }
}

/// Same as [`parse_to_millis`], but `None` when malformed
pub fn try_parse_millis(text: &str) -> Option<i64> {
    let parts: Vec<&str> = text.split(':').collect();
    if parts.len() != 3 {
        return None;
    }

    let hours: i64 = parts[0].parse().ok()?;
    let minutes: i64 = parts[1].parse().ok()?;
    let base = hours.checked_mul(3600)?.checked_add(minutes.checked_mul(60)?)?;

    let separator = if parts[2].contains(',') { ',' } else { '.' };
    let fields: Vec<&str> = parts[2].split(separator).collect();
    if fields.len() != 2 {
        // No fractional part: hours and minutes only
        return base.checked_mul(1000);
    }

    let seconds: i64 = fields[0].parse().ok()?;
    let millis: i64 = fields[1].parse().ok()?;

    base.checked_add(seconds)?
        .checked_mul(1000)?
        .checked_add(millis)
}

/// Parse a timecode into fractional seconds, returning `0.0` when malformed.
///
/// An empty string is `0.0`. A comma before the fraction is read as a
/// decimal point.
pub fn parse_to_seconds(text: &str) -> f64 {
    if text.is_empty() {
        return 0.0;
    }

    match try_parse_seconds(text) {
        Some(seconds) => seconds,
        None => {
            tracing::debug!("Malformed timecode {:?}, using 0.0", text);
            0.0
        }
    }
}

fn try_parse_seconds(text: &str) -> Option<f64> {
    let parts: Vec<&str> = text.split(':').collect();
    if parts.len() < 2 {
        return None;
    }

    let hours: i64 = parts[0].parse().ok()?;
    let minutes: i64 = parts[1].parse().ok()?;
    let base = hours.checked_mul(3600)?.checked_add(minutes.checked_mul(60)?)? as f64;

    if parts.len() == 2 {
        return Some(base);
    }

    let seconds: f64 = parts[2].replace(',', ".").parse().ok()?;
    let total = base + seconds;
    total.is_finite().then_some(total)
}

/// Render milliseconds as an SRT timecode (`HH:MM:SS,mmm`).
///
/// Negative values are clamped to zero.
pub fn format_millis(ms: i64) -> String {
    let ms = ms.max(0);
    let hours = ms / 3_600_000;
    let minutes = (ms / 60_000) % 60;
    let seconds = (ms / 1000) % 60;
    let millis = ms % 1000;
    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
}
