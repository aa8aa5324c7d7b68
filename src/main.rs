//! Bagview CLI
//!
//! Command-line interface over JSON-lines bags:
//! - Show bag and channel summaries
//! - Count records in a log-time interval
//! - Fetch the record nearest a timestamp or at a position

use anyhow::Context;
use bagview::{BagManager, BagReader, ChannelSelect, JsonlBag, Payload};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "bagview")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Indexed time-based queries over recorded message logs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct BagArgs {
    /// Path to the JSONL bag file
    bag: PathBuf,

    /// Path to an external summary JSON (declared bounds taken as-is)
    #[arg(long)]
    summary: Option<PathBuf>,
}

impl BagArgs {
    fn open(&self) -> anyhow::Result<BagManager<JsonlBag>> {
        let bag = match &self.summary {
            Some(summary) => JsonlBag::open_with_summary(&self.bag, summary),
            None => JsonlBag::open(&self.bag),
        }
        .with_context(|| format!("opening bag {}", self.bag.display()))?;
        Ok(BagManager::new(bag))
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Show the bag summary and per-channel metadata
    Info {
        #[command(flatten)]
        bag: BagArgs,
        /// Also list per-record times for this channel
        #[arg(long)]
        channel: Option<String>,
        /// Include payload-times (requires a full decode of the channel)
        #[arg(long)]
        payload_times: bool,
    },

    /// Count records in a log-time interval
    Count {
        #[command(flatten)]
        bag: BagArgs,
        /// Channels to count (empty = all channels)
        #[arg(short, long)]
        channels: Vec<String>,
        /// Interval start in seconds (default: declared file start)
        #[arg(long)]
        start: Option<f64>,
        /// Interval end in seconds (default: declared file end)
        #[arg(long)]
        end: Option<f64>,
    },

    /// Fetch the record nearest a timestamp
    Nearest {
        #[command(flatten)]
        bag: BagArgs,
        /// Channel name
        channel: String,
        /// Target time in seconds
        time: f64,
        /// Search the payload-time axis instead of log-time
        #[arg(long)]
        by_payload_time: bool,
    },

    /// Fetch the record at a position within a channel
    At {
        #[command(flatten)]
        bag: BagArgs,
        /// Channel name
        channel: String,
        /// Zero-based position in log order
        index: i64,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "bagview=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match Cli::parse().command {
        Commands::Info {
            bag,
            channel,
            payload_times,
        } => {
            let manager = bag.open()?;
            println!("{manager}");
            match channel {
                Some(name) => {
                    let info = manager.get_channel_info(&name, payload_times)?;
                    println!(
                        "{}  type={}  count={}  rate={}",
                        info.name,
                        info.payload_type,
                        info.message_count,
                        info.frequency
                            .map(|f| format!("{f:.2} Hz"))
                            .unwrap_or_else(|| "n/a".into()),
                    );
                    for (i, t) in info.log_times.iter().enumerate() {
                        let stamp = info
                            .payload_times
                            .as_ref()
                            .map(|s| format!("  stamp={}", s[i]))
                            .unwrap_or_default();
                        println!("  [{i}] log_time={t}{stamp}");
                    }
                }
                None => {
                    for meta in &manager.reader().summary().channels {
                        println!(
                            "{}  type={}  count={}",
                            meta.name, meta.payload_type, meta.message_count
                        );
                    }
                }
            }
        }

        Commands::Count {
            bag,
            channels,
            start,
            end,
        } => {
            let manager = bag.open()?;
            let select = if channels.is_empty() {
                ChannelSelect::All
            } else {
                ChannelSelect::Many(channels)
            };
            let count = manager.count_in_interval(select, start, end)?;
            println!("{count}");
        }

        Commands::Nearest {
            bag,
            channel,
            time,
            by_payload_time,
        } => {
            let manager = bag.open()?;
            let payload = if by_payload_time {
                manager.nearest_by_payload_time(&channel, time)?
            } else {
                manager.nearest_by_log_time(&channel, time)?
            };
            print_payload(&payload);
        }

        Commands::At {
            bag,
            channel,
            index,
        } => {
            let manager = bag.open()?;
            let payload = manager.by_position(&channel, index)?;
            print_payload(&payload);
        }
    }

    Ok(())
}

fn print_payload(payload: &Payload) {
    let stamp = payload
        .stamp
        .map(|s| s.to_string())
        .unwrap_or_else(|| "n/a".into());
    println!(
        "type={}  stamp={}  bytes={}",
        payload.type_name,
        stamp,
        payload.data.len()
    );
}
