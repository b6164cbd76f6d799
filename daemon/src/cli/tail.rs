//! Follow a log and print classified events.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use tracing::{info, warn};

use crate::cli::output::{self, Format};
use crate::config::Config;
use crate::error::Error;
use crate::watcher::{AlertSet, Channel, EventFilter, LogEvent, Tailer};

/// Arguments for `eqtail tail`.
#[derive(Args, Debug, Default)]
pub struct TailArgs {
    /// Log file to follow
    #[arg(long, short, conflicts_with_all = ["player", "server", "base_path"])]
    pub path: Option<PathBuf>,

    /// Character name, used with --server and --base-path
    #[arg(long)]
    pub player: Option<String>,

    /// Server name
    #[arg(long)]
    pub server: Option<String>,

    /// EverQuest install directory (the one containing Logs/)
    #[arg(long)]
    pub base_path: Option<PathBuf>,

    /// Read the whole file instead of only new lines
    #[arg(long)]
    pub from_start: bool,

    /// Wait between checks when no new data is available
    #[arg(long, value_name = "MS")]
    pub poll_interval_ms: Option<u64>,

    /// Wait after a line that is not a chat log line
    #[arg(long, value_name = "MS")]
    pub noise_backoff_ms: Option<u64>,

    /// Only print these channels (can be repeated)
    #[arg(long = "channel", short, value_name = "CHANNEL")]
    pub channels: Vec<Channel>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,
}

/// Run the tail command until ctrl-c or the tailer stops.
pub async fn run(args: TailArgs, mut config: Config) -> Result<(), Error> {
    apply_overrides(&args, &mut config)?;
    let path = resolve_path(&args, &config)?;
    let alerts = AlertSet::from_config(&config.alerts)?;
    let filter = EventFilter::new(args.channels.iter().copied());

    let tailer = Tailer::open(&path, config.tail_options()).await?;
    info!(
        path = %path.display(),
        offset = tailer.offset(),
        alerts = alerts.len(),
        "Tailing log"
    );
    let mut handle = tailer.spawn(config.channel_capacity);

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        let next = tokio::select! {
            event = handle.events.recv() => event,
            _ = &mut ctrl_c => {
                info!("Interrupted, stopping");
                None
            }
        };
        let Some(event) = next else {
            break;
        };

        if let Err(e) = print_event(&event, &alerts, &filter, args.format) {
            warn!(error = %e, "Cannot write to stdout, stopping");
            break;
        }
    }

    let stats = handle.shutdown().await?;
    eprintln!(
        "{} lines read, {} events, {} skipped, {} overlong, {} timestamp fallbacks",
        stats.lines_read,
        stats.events_emitted,
        stats.noise_lines,
        stats.oversized_lines,
        stats.timestamp_fallbacks
    );
    Ok(())
}

fn print_event(
    event: &LogEvent,
    alerts: &AlertSet,
    filter: &EventFilter,
    format: Format,
) -> Result<(), Error> {
    if !filter.accepts(event) {
        return Ok(());
    }

    let fired = alerts.check(event);
    for name in &fired {
        info!(alert = *name, source = event.source(), channel = %event.channel(), "Alert fired");
    }

    let line = output::render(event, &fired, format)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", line)?;
    stdout.flush()?;
    Ok(())
}

/// Command-line flags win over the config file.
fn apply_overrides(args: &TailArgs, config: &mut Config) -> Result<(), Error> {
    config.from_start |= args.from_start;
    if let Some(ms) = args.poll_interval_ms {
        config.poll_interval_ms = ms;
    }
    if let Some(ms) = args.noise_backoff_ms {
        config.noise_backoff_ms = ms;
    }
    if args.player.is_some() {
        config.player = args.player.clone();
    }
    if args.server.is_some() {
        config.server = args.server.clone();
    }
    if args.base_path.is_some() {
        config.base_path = args.base_path.clone();
    }
    config.validate()
}

fn resolve_path(args: &TailArgs, config: &Config) -> Result<PathBuf, Error> {
    if let Some(path) = &args.path {
        return Ok(path.clone());
    }
    config.log_path().ok_or(Error::MissingLogPath)
}
