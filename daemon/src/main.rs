//! eqtail - follow an EverQuest log and classify chat lines by channel.
//!
//! Polls the log for appended lines, tags each chat line as guild, group,
//! raid, tell, auction, say or system, and prints it.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod cli;
mod config;
mod error;
mod watcher;

pub use config::Config;
pub use error::Error;

#[derive(Parser)]
#[command(name = "eqtail")]
#[command(about = "eqtail - follow an EverQuest log and classify chat lines by channel")]
#[command(version)]
struct Cli {
    /// Config file (default: ~/.eqtail/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Follow a log file and print each chat line as it is written
    Tail(cli::tail::TailArgs),

    /// Print the log file path for a character
    Path {
        #[arg(long)]
        player: String,

        #[arg(long)]
        server: String,

        /// EverQuest install directory
        #[arg(long)]
        base_path: PathBuf,
    },

    /// Classify one raw log line
    Classify {
        /// A full line, e.g. "[Sat Jan 02 20:44:08 2021] Bunzz says, 'Hail'"
        line: String,

        #[arg(long, value_enum, default_value_t = cli::output::Format::Text)]
        format: cli::output::Format,
    },
}

fn main() -> Result<(), Error> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries events
    let directive = if cli.verbose { "eqtail=debug" } else { "eqtail=info" };
    let filter = EnvFilter::from_default_env().add_directive(
        directive
            .parse()
            .map_err(|e| Error::InvalidConfig(format!("log filter: {}", e)))?,
    );
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    match cli.command {
        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
        Some(Commands::Tail(args)) => {
            let config = Config::load(cli.config.as_deref())?;
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(cli::tail::run(args, config))?;
        }
        Some(Commands::Path {
            player,
            server,
            base_path,
        }) => {
            println!(
                "{}",
                watcher::log_path(&player, &server, &base_path).display()
            );
        }
        Some(Commands::Classify { line, format }) => {
            let config = Config::load(cli.config.as_deref())?;
            if !cli::classify::run(&line, format, &config)? {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
