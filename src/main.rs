use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::ops::ControlFlow;
use tail_sampler::cli::{Cli, OutputFormat};
use tail_sampler::config::DeciderConfig;
use tail_sampler::decider::{OperationStats, TailDecider};
use tail_sampler::replay::{self, Outcome, ReplayReport};
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Merge defaults, config file and CLI overrides, then validate
fn load_config(cli: &Cli) -> Result<DeciderConfig> {
    let base = match &cli.config {
        Some(path) => DeciderConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => DeciderConfig::default(),
    };

    let config = cli.apply_overrides(base);
    config.validate().context("Invalid sampler configuration")?;
    Ok(config)
}

fn open_input(cli: &Cli) -> Result<Box<dyn BufRead>> {
    match &cli.input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open input {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(BufReader::new(io::stdin()))),
    }
}

fn write_outcome(out: &mut impl Write, format: OutputFormat, outcome: &Outcome) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer(&mut *out, outcome)?;
            writeln!(out)?;
        }
        OutputFormat::Text => {
            let decision = &outcome.decision;
            writeln!(
                out,
                "{:<6} {} {:.3} ms ({}, mean {:.3}, stddev {:.3}, n={})",
                if decision.retain { "RETAIN" } else { "DROP" },
                outcome.observation.operation,
                outcome.observation.duration_ms,
                decision.reason.as_str(),
                decision.snapshot.mean,
                decision.snapshot.std_dev(),
                decision.snapshot.count,
            )?;
        }
    }
    Ok(())
}

fn write_summary(
    out: &mut impl Write,
    format: OutputFormat,
    stats: &[(String, OperationStats)],
    report: &ReplayReport,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let operations: Vec<serde_json::Value> = stats
                .iter()
                .map(|(operation, s)| {
                    serde_json::json!({
                        "operation": operation,
                        "count": s.count,
                        "mean": s.mean,
                        "variance": s.variance,
                        "stddev": s.std_dev(),
                    })
                })
                .collect();
            let summary = serde_json::json!({
                "summary": report,
                "operations": operations,
            });
            serde_json::to_writer(&mut *out, &summary)?;
            writeln!(out)?;
        }
        OutputFormat::Text => {
            writeln!(out)?;
            writeln!(
                out,
                "{:>10} {:>14} {:>14} {:>14}  operation",
                "count", "mean", "variance", "stddev"
            )?;
            writeln!(
                out,
                "---------- -------------- -------------- --------------  ----------------"
            )?;
            for (operation, s) in stats {
                writeln!(
                    out,
                    "{:>10} {:>14.3} {:>14.3} {:>14.3}  {}",
                    s.count,
                    s.mean,
                    s.variance,
                    s.std_dev(),
                    operation
                )?;
            }
            writeln!(
                out,
                "---------- -------------- -------------- --------------  ----------------"
            )?;
            writeln!(
                out,
                "{} observations: {} retained ({:.1}%), {} dropped, {} skipped",
                report.total,
                report.retained,
                report.retention_rate() * 100.0,
                report.dropped,
                report.skipped
            )?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let config = load_config(&cli)?;
    tracing::debug!(
        band_width = config.band_width,
        warmup_count = config.warmup_count,
        "Starting replay"
    );

    let decider = TailDecider::with_config(config)?;
    let input = open_input(&cli)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut write_error = None;

    let report = replay::replay(&decider, input, |outcome| {
        if !(cli.all || outcome.decision.retain) {
            return ControlFlow::Continue(());
        }
        match write_outcome(&mut out, cli.format, outcome) {
            Ok(()) => ControlFlow::Continue(()),
            Err(e) => {
                write_error = Some(e);
                ControlFlow::Break(())
            }
        }
    })
    .context("Failed to read observations")?;

    if let Some(e) = write_error {
        return Err(e.context("Failed to write decision"));
    }

    if cli.summary {
        write_summary(&mut out, cli.format, &decider.snapshot_all(), &report)?;
    }

    out.flush()?;
    Ok(())
}
