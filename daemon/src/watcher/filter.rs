//! Consumer-side channel filter.

use std::collections::HashSet;

use super::channel::Channel;
use super::event::LogEvent;

/// Accepts events whose channel is in the set. An empty set accepts all.
#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    channels: HashSet<Channel>,
}

impl EventFilter {
    pub fn new(channels: impl IntoIterator<Item = Channel>) -> Self {
        Self {
            channels: channels.into_iter().collect(),
        }
    }

    pub fn accepts(&self, event: &LogEvent) -> bool {
        self.channels.is_empty() || self.channels.contains(&event.channel())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::watcher::event::{parse_line, Parsed};

    fn event(raw: &str) -> LogEvent {
        match parse_line(raw) {
            Parsed::Event { event, .. } => event,
            Parsed::Noise => panic!("expected an event"),
        }
    }

    #[test]
    fn test_empty_filter_accepts_everything() {
        let filter = EventFilter::default();
        assert!(filter.accepts(&event("[Sat Jan 02 20:44:08 2021] Patchouli winces.")));
    }

    #[test]
    fn test_filter_by_channel() {
        let filter = EventFilter::new([Channel::Guild, Channel::Tell]);
        assert!(filter.accepts(&event(
            "[Sat Jan 02 20:44:08 2021] Zobac tells the guild, 'Gratz Banis and Guzz!!'"
        )));
        assert!(!filter.accepts(&event("[Sat Jan 02 20:44:08 2021] Bunzz says, 'Hail, Charybdis'")));
    }
}
