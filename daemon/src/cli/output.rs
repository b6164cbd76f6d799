//! Rendering events for stdout.

use clap::ValueEnum;
use serde::Serialize;

use crate::error::Error;
use crate::watcher::LogEvent;

/// Output format for events.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// `2021-01-02 20:44:08 [guild] Destrod tells the guild, '...'`
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

#[derive(Serialize)]
struct JsonLine<'a> {
    #[serde(flatten)]
    event: &'a LogEvent,
    #[serde(skip_serializing_if = "no_alerts")]
    alerts: &'a [&'a str],
}

fn no_alerts(alerts: &&[&str]) -> bool {
    alerts.is_empty()
}

/// Render one event with the names of any alerts it fired.
pub fn render(event: &LogEvent, alerts: &[&str], format: Format) -> Result<String, Error> {
    match format {
        Format::Json => Ok(serde_json::to_string(&JsonLine { event, alerts })?),
        Format::Text => {
            let mut line = format!(
                "{} [{}] {}",
                event.timestamp().format("%Y-%m-%d %H:%M:%S"),
                event.channel(),
                event.message()
            );
            if !alerts.is_empty() {
                line = format!("! {} (alerts: {})", line, alerts.join(", "));
            }
            Ok(line)
        }
    }
}
