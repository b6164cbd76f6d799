//! Chat channel classification.
//!
//! Chat lines are free text with a handful of fixed phrases: `tells the
//! guild,`, `tells the group,`, `tells the raid,`, `tells you,`, `says,`,
//! `auctions,`. The classifier is a lexical scan over space-separated
//! tokens. Rules are checked in order and the first match wins; anything
//! unrecognized is `System`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Communication channel of a chat line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Guild,
    Group,
    Raid,
    Tell,
    Auction,
    Say,
    System,
}

impl Channel {
    pub const ALL: [Channel; 7] = [
        Channel::Guild,
        Channel::Group,
        Channel::Raid,
        Channel::Tell,
        Channel::Auction,
        Channel::Say,
        Channel::System,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Channel::Guild => "guild",
            Channel::Group => "group",
            Channel::Raid => "raid",
            Channel::Tell => "tell",
            Channel::Auction => "auction",
            Channel::Say => "say",
            Channel::System => "system",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Channel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Channel::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown channel '{}'", s))
    }
}

/// Classify a payload into a channel.
pub fn classify(payload: &str) -> Channel {
    let tokens: Vec<&str> = payload.split(' ').collect();

    if tokens.len() > 4 {
        for (marker, channel) in [
            ("guild,", Channel::Guild),
            ("group,", Channel::Group),
            ("raid,", Channel::Raid),
        ] {
            if tokens[3] == marker || tokens[4] == marker {
                return channel;
            }
        }
        if tokens[1] == "tells" && tokens[2] == "you," {
            return Channel::Tell;
        }
        // "Ravnor tells Von_parses:5, '...'" is a tell to a custom channel.
        if tokens[1] == "tells" && is_custom_channel(tokens[2]) {
            return Channel::Tell;
        }
        return Channel::System;
    }

    if tokens.len() > 1 {
        match tokens[1] {
            "tells" => return Channel::Tell,
            "auctions," => return Channel::Auction,
            "says," => return Channel::Say,
            _ => {}
        }
    }

    Channel::System
}

/// `Name:7,` as written for numbered custom chat channels.
fn is_custom_channel(token: &str) -> bool {
    let Some(token) = token.strip_suffix(',') else {
        return false;
    };
    match token.rsplit_once(':') {
        Some((name, number)) => {
            !name.is_empty() && !number.is_empty() && number.bytes().all(|b| b.is_ascii_digit())
        }
        None => false,
    }
}

/// The acting entity: first whitespace-delimited token of the payload.
///
/// This is only a heuristic. For lines such as `You have entered ...` it is
/// simply `You`.
pub fn source(payload: &str) -> &str {
    payload.split_whitespace().next().unwrap_or(payload)
}
