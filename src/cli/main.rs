//! Command-line front end for the broadcast geometry library.
//!
//! Checks broadcast circles against a jurisdiction config and prints the
//! pub/sub topics for a location.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use geocast::config::Config;
use geocast::topics::{neighboring_topics, topic_change, topic_for, TopicChange};
use geocast::{ContainmentMode, Coordinate};

#[derive(Parser, Debug)]
#[command(name = "geocast")]
#[command(about = "Broadcast radius and location topic tools")]
struct Args {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print JSON instead of plain text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check whether a broadcast circle lies inside the configured jurisdiction
    Check {
        /// TOML file with sampler settings and jurisdiction markers
        #[arg(short, long)]
        config: PathBuf,

        /// Latitude of the broadcast center
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude of the broadcast center
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,

        /// Broadcast radius in meters
        #[arg(short, long)]
        radius: f64,

        /// Containment test
        #[arg(long, value_enum, default_value_t = Mode::Sampled)]
        mode: Mode,

        /// Evaluate sample rings in parallel
        #[arg(long)]
        parallel: bool,
    },

    /// Print the topic of a location and its neighbouring topics
    Topics {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },

    /// Print the subscription change for a move between two locations
    Moved {
        /// Previous latitude (omit for a first fix)
        #[arg(long, allow_hyphen_values = true, requires = "from_lon")]
        from_lat: Option<f64>,

        /// Previous longitude (omit for a first fix)
        #[arg(long, allow_hyphen_values = true, requires = "from_lat")]
        from_lon: Option<f64>,

        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Mode {
    Sampled,
    Nested,
}

impl From<Mode> for ContainmentMode {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Sampled => ContainmentMode::Sampled,
            Mode::Nested => ContainmentMode::Nested,
        }
    }
}

#[derive(Serialize)]
struct CheckOutput {
    within: bool,
    mode: ContainmentMode,
    samples: Option<u64>,
}

#[derive(Serialize)]
struct TopicsOutput {
    topic: String,
    neighbors: Vec<String>,
}

fn render_check(output: &CheckOutput, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(output)?);
    }
    Ok(if output.within { "within" } else { "outside" }.to_string())
}

fn render_topics(output: &TopicsOutput, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(output)?);
    }
    let mut lines = vec![output.topic.clone()];
    lines.extend(output.neighbors.iter().map(|t| format!("  {}", t)));
    Ok(lines.join("\n"))
}

fn render_change(change: Option<&TopicChange>, json: bool) -> Result<String> {
    if json {
        return Ok(serde_json::to_string_pretty(&change)?);
    }
    Ok(match change {
        None => "unchanged".to_string(),
        Some(change) => change
            .unsubscribe
            .iter()
            .map(|t| format!("- {}", t))
            .chain(change.subscribe.iter().map(|t| format!("+ {}", t)))
            .collect::<Vec<_>>()
            .join("\n"),
    })
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr, results to stdout; RUST_LOG overrides --verbose
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if args.verbose { "debug" } else { "info" }));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let rendered = match args.command {
        Command::Check {
            config,
            lat,
            lon,
            radius,
            mode,
            parallel,
        } => {
            let config = Config::load_from_file(&config)
                .with_context(|| format!("Could not load {}", config.display()))?;
            let center = Coordinate::new(lat, lon)?;
            let checker = config.checker()?.with_mode(mode.into());
            let index = config.index();

            let within = if parallel {
                checker.check_parallel(&index, center, radius)?
            } else {
                checker.check(&index, center, radius)?
            };

            let samples = match checker.mode() {
                ContainmentMode::Sampled => Some(checker.sampler(center, radius)?.sample_count()),
                ContainmentMode::Nested => None,
            };
            info!(
                "Checked {}m around {} against {} markers",
                radius,
                center,
                index.len()
            );

            let output = CheckOutput {
                within,
                mode: checker.mode(),
                samples,
            };
            render_check(&output, args.json)?
        }

        Command::Topics { lat, lon } => {
            let location = Coordinate::new(lat, lon)?;
            let output = TopicsOutput {
                topic: topic_for(&location),
                neighbors: neighboring_topics(&location),
            };
            render_topics(&output, args.json)?
        }

        Command::Moved {
            from_lat,
            from_lon,
            lat,
            lon,
        } => {
            let previous = match (from_lat, from_lon) {
                (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)?),
                _ => None,
            };
            let current = Coordinate::new(lat, lon)?;
            let change = topic_change(previous.as_ref(), &current);
            render_change(change.as_ref(), args.json)?
        }
    };

    println!("{}", rendered);
    Ok(())
}
