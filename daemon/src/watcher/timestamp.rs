//! Timestamp normalization.
//!
//! Log timestamps carry no zone. They are pinned to the reader's current
//! local UTC offset at the moment of parsing. That is right for a log being
//! written on the same host right now, and off by the difference for old
//! lines written before a daylight-saving change. This is a known
//! approximation of the log format, not something to correct here.

use chrono::{DateTime, FixedOffset, Local, NaiveDateTime, Offset};
use tracing::warn;

/// strftime form of `Sat Jan 02 20:44:08 2021`.
pub const LOG_TIME_FORMAT: &str = "%a %b %d %H:%M:%S %Y";

/// Result of normalizing one timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Normalized {
    pub instant: DateTime<FixedOffset>,
    /// True when parsing failed and `instant` is the wall clock instead.
    pub fallback: bool,
}

/// Normalize against the current local offset.
pub fn normalize(timestamp: &str) -> Normalized {
    let offset = Local::now().offset().fix();
    normalize_with_offset(timestamp, offset)
}

/// Normalize against an explicit offset.
///
/// Never fails: an unparseable timestamp becomes "now" with `fallback` set.
pub fn normalize_with_offset(timestamp: &str, offset: FixedOffset) -> Normalized {
    let parsed = NaiveDateTime::parse_from_str(timestamp, LOG_TIME_FORMAT)
        .ok()
        .and_then(|naive| naive.and_local_timezone(offset).single());

    match parsed {
        Some(instant) => Normalized {
            instant,
            fallback: false,
        },
        None => {
            warn!(timestamp, "Unparseable log timestamp, using current time");
            Normalized {
                instant: Local::now().with_timezone(&offset),
                fallback: true,
            }
        }
    }
}
