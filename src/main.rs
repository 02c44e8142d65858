//! Cueline CLI
//!
//! Command-line interface for the caption synchronization engine:
//! - Resolve the active entry at given times
//! - Simulate a polled playback clock
//! - Aggregate danmaku word maps
//! - Generate a default config file

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use cueline::config::{generate_default_config, Config, LoggingConfig};
use cueline::timecode::{format_millis, try_parse_millis};
use cueline::engine::{load_entries, load_words};
use cueline::{build_danmaku_map, CaptionTrack, DanmakuTimeline, Entry, WordOccurrences};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cueline")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Time-indexed caption synchronization")]
#[command(long_about = "Cueline resolves which subtitle line is showing at a playback time.\nEntry files are JSON arrays of {\"start\", \"end\", \"payload\"} in milliseconds.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: search standard locations)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the active entry at each time, in order
    Query {
        /// Entries JSON file
        entries: PathBuf,
        /// Times in milliseconds or as HH:MM:SS,mmm
        #[arg(required = true)]
        times: Vec<String>,
        /// Treat every time as an explicit seek
        #[arg(long)]
        seek: bool,
    },

    /// Simulate a polled playback clock and print line changes
    Play {
        /// Entries JSON file
        entries: PathBuf,
        /// Start time (ms or timecode)
        #[arg(long, default_value = "0")]
        from: String,
        /// End time (default: end of the last entry)
        #[arg(long)]
        to: Option<String>,
        /// Poll interval in milliseconds (default: from config)
        #[arg(short, long)]
        interval: Option<u64>,
        /// Word occurrences JSON file to trigger alongside the captions
        #[arg(long)]
        words: Option<PathBuf>,
    },

    /// Print the second-keyed danmaku map of a word file
    Danmaku {
        /// Word occurrences JSON file
        words: PathBuf,
        /// Only print this second
        #[arg(short, long)]
        second: Option<i64>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };
    init_logging(&config.logging);

    match cli.command {
        Commands::Query {
            entries,
            times,
            seek,
        } => {
            let mut track = CaptionTrack::with_config(config.track.clone());
            track.set_entries(read_entries(&entries)?);

            let mut results = Vec::new();
            for text in &times {
                let time_ms = parse_time(text)?;
                let found = if seek {
                    track.seek_to(time_ms)
                } else {
                    track.advance_indexed(time_ms, None)
                };
                let entry = found.and_then(|index| track.get(index));

                if cli.json {
                    results.push(serde_json::json!({
                        "time": time_ms,
                        "index": found,
                        "entry": entry,
                    }));
                } else {
                    match entry {
                        Some(entry) => println!(
                            "{}  #{:<4} {}",
                            format_millis(time_ms),
                            found.unwrap_or_default(),
                            entry.payload
                        ),
                        None => println!("{}  -", format_millis(time_ms)),
                    }
                }
            }

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&results)?);
            }
            tracing::info!("Cursor stats: {}", track.stats());
        }

        Commands::Play {
            entries,
            from,
            to,
            interval,
            words,
        } => {
            let mut track = CaptionTrack::with_config(config.track.clone());
            track.set_entries(read_entries(&entries)?);

            let mut danmaku = DanmakuTimeline::with_config(&config.danmaku);
            if let Some(path) = &words {
                danmaku.load_occurrences(&read_words(path)?);
            }

            let from = parse_time(&from)?;
            let to = match to {
                Some(text) => parse_time(&text)?,
                None => track.entries().iter().map(|e| e.end).max().unwrap_or(from),
            };
            let interval = interval.unwrap_or(config.track.poll_interval_ms).max(1);
            let step = i64::try_from(interval).context("Poll interval too large")?;
            if to < from {
                bail!("End time {} is before start time {}", to, from);
            }

            tracing::info!(
                "Playing {} entries from {} to {} every {}ms",
                track.len(),
                format_millis(from),
                format_millis(to),
                step
            );

            let mut shown: Option<usize> = None;
            let mut time_ms = from;
            while time_ms <= to {
                let active = track.advance(time_ms).is_some();
                let index = track.current_index().filter(|_| active);

                if index != shown {
                    match index.and_then(|i| track.get(i)) {
                        Some(entry) => println!("{}  {}", format_millis(time_ms), entry.payload),
                        None => println!("{}  -", format_millis(time_ms)),
                    }
                    shown = index;
                }

                for item in danmaku.update(time_ms) {
                    println!("{}  * {}", format_millis(time_ms), item.word);
                }

                time_ms = match time_ms.checked_add(step) {
                    Some(next) => next,
                    None => break,
                };
            }

            tracing::info!("Cursor stats: {}", track.stats());
            if words.is_some() {
                tracing::info!("Danmaku fired: {}/{}", danmaku.processed(), danmaku.total());
            }
        }

        Commands::Danmaku { words, second } => {
            let occurrences = read_words(&words)?;
            let map = build_danmaku_map(&occurrences);

            if cli.json {
                match second {
                    Some(second) => {
                        println!("{}", serde_json::to_string_pretty(map.at_second(second))?)
                    }
                    None => println!("{}", serde_json::to_string_pretty(&map)?),
                }
            } else {
                let seconds: Vec<i64> = match second {
                    Some(second) => vec![second],
                    None => map.seconds().collect(),
                };
                for second in seconds {
                    let items = map.at_second(second);
                    let words: Vec<&str> = items.iter().map(|item| item.word.as_str()).collect();
                    println!("{:>6}s  {}", second, words.join(", "));
                }
            }

            tracing::info!(
                "{} words, {} items across {} seconds",
                occurrences.len(),
                map.item_count(),
                map.len()
            );
        }

        Commands::Config { output } => {
            let config = generate_default_config();

            match output {
                Some(path) => {
                    // Create parent directory if needed
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)
                        .with_context(|| format!("Failed to write {:?}", path))?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

fn init_logging(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| format!("cueline={}", logging.level)),
    );

    let registry = tracing_subscriber::registry().with(filter);
    match logging.format.as_str() {
        "json" => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        _ => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}

/// Milliseconds, or a `HH:MM:SS,mmm` timecode
fn parse_time(text: &str) -> anyhow::Result<i64> {
    let text = text.trim();
    if let Ok(ms) = text.parse::<i64>() {
        return Ok(ms);
    }
    match try_parse_millis(text) {
        Some(ms) => Ok(ms),
        None => bail!("Invalid time {:?}: expected milliseconds or HH:MM:SS,mmm", text),
    }
}

fn read_entries(path: &Path) -> anyhow::Result<Vec<Entry<String>>> {
    load_entries(path).with_context(|| format!("Failed to load entries from {:?}", path))
}

fn read_words(path: &Path) -> anyhow::Result<Vec<WordOccurrences<String>>> {
    load_words(path).with_context(|| format!("Failed to load words from {:?}", path))
}
