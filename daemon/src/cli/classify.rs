//! Classify a single line from the command line.

use crate::cli::output::{self, Format};
use crate::config::Config;
use crate::error::Error;
use crate::watcher::{parse_line, AlertSet, Parsed};

/// Print the event for `line`. Returns false if the line is not a chat
/// log line.
pub fn run(line: &str, format: Format, config: &Config) -> Result<bool, Error> {
    let alerts = AlertSet::from_config(&config.alerts)?;

    match parse_line(line) {
        Parsed::Event {
            event,
            timestamp_fallback,
        } => {
            if timestamp_fallback {
                eprintln!("warning: timestamp did not parse, using current time");
            }
            let fired = alerts.check(&event);
            println!("{}", output::render(&event, &fired, format)?);
            Ok(true)
        }
        Parsed::Noise => {
            eprintln!("Not a log line: expected '[Ddd Mmm DD HH:MM:SS YYYY] text'");
            Ok(false)
        }
    }
}
