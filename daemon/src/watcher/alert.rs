//! Regex alerts over classified events.

use regex::Regex;
use serde::Deserialize;

use super::channel::Channel;
use super::event::LogEvent;
use crate::error::Error;

/// Alert as written in the config file.
///
/// ```toml
/// [[alerts]]
/// name = "bids"
/// pattern = "(?i)taking bids"
/// channels = ["guild", "raid"]
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AlertConfig {
    pub name: String,
    pub pattern: String,
    #[serde(default)]
    pub channels: Vec<Channel>,
}

/// A compiled alert rule.
#[derive(Debug, Clone)]
pub struct AlertRule {
    name: String,
    pattern: Regex,
    channels: Vec<Channel>,
}

impl AlertRule {
    pub fn new(name: impl Into<String>, pattern: &str, channels: Vec<Channel>) -> Result<Self, Error> {
        let name = name.into();
        let pattern = Regex::new(pattern).map_err(|source| Error::InvalidPattern {
            name: name.clone(),
            source,
        })?;
        Ok(Self {
            name,
            pattern,
            channels,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// True when the event is on a watched channel (any, if none are
    /// listed) and its message matches the pattern.
    pub fn matches(&self, event: &LogEvent) -> bool {
        if !self.channels.is_empty() && !self.channels.contains(&event.channel()) {
            return false;
        }
        self.pattern.is_match(event.message())
    }
}

impl TryFrom<&AlertConfig> for AlertRule {
    type Error = Error;

    fn try_from(config: &AlertConfig) -> Result<Self, Self::Error> {
        AlertRule::new(&config.name, &config.pattern, config.channels.clone())
    }
}

/// Alert rules evaluated in declaration order.
#[derive(Debug, Clone, Default)]
pub struct AlertSet {
    rules: Vec<AlertRule>,
}

impl AlertSet {
    pub fn from_config(configs: &[AlertConfig]) -> Result<Self, Error> {
        let rules = configs
            .iter()
            .map(AlertRule::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Names of the rules that fire for this event.
    pub fn check<'a>(&'a self, event: &LogEvent) -> Vec<&'a str> {
        self.rules
            .iter()
            .filter(|rule| rule.matches(event))
            .map(AlertRule::name)
            .collect()
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
    fn test_rule_matches_message() {
        let rule = AlertRule::new("heal", "(?i)complete heal", vec![]).unwrap();
        assert!(rule.matches(&event("[Sat Jan 02 20:44:08 2021] Scylla auctions, 'Complete HEAL'")));
        assert!(!rule.matches(&event("[Sat Jan 02 20:44:08 2021] Patchouli winces.")));
    }

    #[test]
    fn test_rule_respects_channels() {
        let rule = AlertRule::new("bids", "bids", vec![Channel::Guild]).unwrap();
        assert!(rule.matches(&event(
            "[Sat Jan 02 20:44:08 2021] Destrod tells the guild, 'takings bids...'"
        )));
        assert!(!rule.matches(&event(
            "[Sat Jan 02 20:44:08 2021] Destrod tells the raid, 'takings bids...'"
        )));
    }

    #[test]
    fn test_invalid_pattern_names_the_rule() {
        let err = AlertRule::new("broken", "(unclosed", vec![]).unwrap_err();
        match err {
            Error::InvalidPattern { name, .. } => assert_eq!(name, "broken"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_set_reports_in_order() {
        let configs = vec![
            AlertConfig {
                name: "any-tell".into(),
                pattern: ".".into(),
                channels: vec![Channel::Tell],
            },
            AlertConfig {
                name: "no-idea".into(),
                pattern: "no idea".into(),
                channels: vec![],
            },
            AlertConfig {
                name: "never".into(),
                pattern: "xyzzy".into(),
                channels: vec![],
            },
        ];
        let set = AlertSet::from_config(&configs).unwrap();
        assert_eq!(set.len(), 3);

        let fired = set.check(&event("[Sat Jan 02 20:44:08 2021] Zortax tells you, 'no idea...'"));
        assert_eq!(fired, vec!["any-tell", "no-idea"]);
    }

    #[test]
    fn test_parse_from_toml() {
        #[derive(Deserialize)]
        struct Wrapper {
            alerts: Vec<AlertConfig>,
        }
        let parsed: Wrapper = toml::from_str(
            r#"
            [[alerts]]
            name = "bids"
            pattern = "bids"
            channels = ["guild", "raid"]
            "#,
        )
        .unwrap();
        assert_eq!(parsed.alerts[0].channels, vec![Channel::Guild, Channel::Raid]);
    }
}
