//! Classified log events.

use chrono::{DateTime, FixedOffset};
use serde::Serialize;

use super::channel::{self, Channel};
use super::line;
use super::timestamp;

/// One recognized chat log line.
///
/// Built once per matched line and never modified afterwards; fields are
/// read through accessors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogEvent {
    timestamp: DateTime<FixedOffset>,
    message: String,
    channel: Channel,
    source: String,
}

impl LogEvent {
    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    /// Payload text, channel phrase included, without a trailing `\r`.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Outcome of running one complete line through the grammar, the
/// timestamp normalizer and the classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    Event {
        event: LogEvent,
        /// The timestamp did not parse and the wall clock was used.
        timestamp_fallback: bool,
    },
    /// Not a `[timestamp] payload` line.
    Noise,
}

/// Parse one complete line.
pub fn parse_line(raw: &str) -> Parsed {
    let Some(matched) = line::match_line(raw) else {
        return Parsed::Noise;
    };

    let normalized = timestamp::normalize(matched.timestamp);
    let event = LogEvent {
        timestamp: normalized.instant,
        message: matched.payload.to_string(),
        channel: channel::classify(matched.payload),
        source: channel::source(matched.payload).to_string(),
    };

    Parsed::Event {
        event,
        timestamp_fallback: normalized.fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event_of(raw: &str) -> LogEvent {
        match parse_line(raw) {
            Parsed::Event { event, .. } => event,
            Parsed::Noise => panic!("expected an event for {raw:?}"),
        }
    }

    #[test]
    fn test_full_line() {
        let event = event_of("[Sat Jan 02 20:44:08 2021] Destrod tells the guild, 'takings bids...'\r\n");

        assert_eq!(
            event.timestamp().naive_local().to_string(),
            "2021-01-02 20:44:08"
        );
        assert_eq!(event.message(), "Destrod tells the guild, 'takings bids...'");
        assert_eq!(event.channel(), Channel::Guild);
        assert_eq!(event.source(), "Destrod");
    }

    #[test]
    fn test_noise_line() {
        assert_eq!(parse_line("Hit for 12 points\n"), Parsed::Noise);
    }

    #[test]
    fn test_bad_timestamp_still_emits() {
        match parse_line("[Sat Jan 32 20:44:08 2021] Bunzz says, 'Hail, Charybdis'") {
            Parsed::Event {
                event,
                timestamp_fallback,
            } => {
                assert!(timestamp_fallback);
                assert_eq!(event.channel(), Channel::Say);
                assert_eq!(event.source(), "Bunzz");
            }
            Parsed::Noise => panic!("expected an event"),
        }
    }

    #[test]
    fn test_every_event_has_a_source() {
        for raw in [
            "[Sat Jan 02 20:44:08 2021] Patchouli winces.",
            "[Sat Jan 02 20:44:08 2021]  leading space",
            "[Sat Jan 02 20:44:08 2021] x",
        ] {
            assert!(!event_of(raw).source().is_empty());
        }
    }

    #[test]
    fn test_serializes_as_json() {
        let event = event_of("[Sat Jan 02 20:44:08 2021] Scylla auctions, 'Complete HEAL'");
        let value = serde_json::to_value(&event).unwrap();

        assert_eq!(value["channel"], "auction");
        assert_eq!(value["source"], "Scylla");
        assert_eq!(value["message"], "Scylla auctions, 'Complete HEAL'");
        assert!(value["timestamp"]
            .as_str()
            .unwrap()
            .starts_with("2021-01-02T20:44:08"));
    }
}
