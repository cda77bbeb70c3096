//! CLI argument parsing for tail-sampler

use crate::config::DeciderConfig;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for decisions and summaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON lines for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "tail-sampler")]
#[command(version)]
#[command(
    about = "Replay span latencies through a tail-based sampler and print the spans worth keeping",
    long_about = None
)]
pub struct Cli {
    /// Observation file, one `<operation> <duration_ms>` per line (default: stdin)
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// TOML configuration file (band_width, warmup_count)
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Band half-width in standard deviations (overrides config file)
    #[arg(short = 'k', long = "band-width", value_name = "SIGMA")]
    pub band_width: Option<f64>,

    /// Observations retained unconditionally per operation before the band applies
    #[arg(long = "warmup", value_name = "COUNT")]
    pub warmup: Option<u64>,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Print every decision, not only retained spans
    #[arg(short = 'a', long = "all")]
    pub all: bool,

    /// Print per-operation statistics and totals at the end
    #[arg(short = 's', long = "summary")]
    pub summary: bool,

    /// Enable debug tracing output on stderr
    #[arg(long = "debug")]
    pub debug: bool,
}

impl Cli {
    /// Apply command-line overrides on top of a base configuration
    pub fn apply_overrides(&self, mut config: DeciderConfig) -> DeciderConfig {
        if let Some(band_width) = self.band_width {
            config.band_width = band_width;
        }
        if let Some(warmup) = self.warmup {
            config.warmup_count = warmup;
        }
        config
    }
}
