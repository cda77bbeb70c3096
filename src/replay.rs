//! Replay a text stream of observations through a [`TailDecider`]
//!
//! Input is line oriented, one observation per line:
//!
//! ```text
//! # operation        duration_ms
//! GET /users         12.5
//! POST /orders       48
//! ```
//!
//! The duration is the last whitespace-separated field; everything before it
//! is the operation, inner whitespace preserved. Blank lines and `#` comments
//! are ignored. Malformed lines, including lines that are not valid UTF-8,
//! are logged and counted, never fatal.

use crate::decider::TailDecider;
use crate::decision::Decision;
use crate::error::{Error, Result};
use serde::Serialize;
use std::io::BufRead;
use std::ops::ControlFlow;
use std::str::FromStr;
use tracing::warn;

/// One (operation, duration) pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    pub operation: String,
    pub duration_ms: f64,
}

impl FromStr for Observation {
    type Err = String;

    /// Parse `<operation> <duration_ms>`
    ///
    /// The duration is the last whitespace-separated field; everything before
    /// it, with inner whitespace kept as written, is the operation.
    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Err("empty line".to_string());
        }

        let (operation, duration_field) = trimmed
            .rsplit_once(char::is_whitespace)
            .ok_or_else(|| "expected `<operation> <duration_ms>`".to_string())?;
        let operation = operation.trim_end();

        let duration_ms: f64 = duration_field
            .parse()
            .map_err(|_| format!("invalid duration `{}`", duration_field))?;
        if !duration_ms.is_finite() {
            return Err(format!("duration must be finite, got `{}`", duration_field));
        }

        Ok(Self {
            operation: operation.to_string(),
            duration_ms,
        })
    }
}

/// Totals for one replay run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReplayReport {
    /// Observations fed to the decider
    pub total: u64,
    pub retained: u64,
    pub dropped: u64,
    /// Malformed lines that were skipped
    pub skipped: u64,
}

impl ReplayReport {
    /// Fraction of observations retained (0 when nothing was observed)
    pub fn retention_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.retained as f64 / self.total as f64
        }
    }
}

/// A decided observation, reported to the replay callback
#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    /// 1-based input line number
    pub line: usize,
    #[serde(flatten)]
    pub observation: Observation,
    #[serde(flatten)]
    pub decision: Decision,
}

/// Parse a single input line
///
/// Returns `Ok(None)` for blank lines and comments.
pub fn parse_line(line_no: usize, line: &str) -> Result<Option<Observation>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    trimmed
        .parse::<Observation>()
        .map(Some)
        .map_err(|reason| Error::MalformedObservation {
            line: line_no,
            reason,
        })
}

/// Feed every observation in `reader` through `decider`
///
/// `on_outcome` is called once per decided observation, in input order;
/// returning [`ControlFlow::Break`] stops the replay after that observation.
/// Only I/O errors abort the replay with an error.
pub fn replay<R, F>(
    decider: &TailDecider,
    mut reader: R,
    mut on_outcome: F,
) -> Result<ReplayReport>
where
    R: BufRead,
    F: FnMut(&Outcome) -> ControlFlow<()>,
{
    let mut report = ReplayReport::default();
    let mut buf = Vec::new();
    let mut line_no = 0;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_no += 1;

        let parsed = match std::str::from_utf8(&buf) {
            Ok(line) => parse_line(line_no, line),
            Err(e) => Err(Error::MalformedObservation {
                line: line_no,
                reason: format!("invalid UTF-8: {}", e),
            }),
        };

        let observation = match parsed {
            Ok(Some(observation)) => observation,
            Ok(None) => continue,
            Err(e) => {
                warn!("Skipping input: {}", e);
                report.skipped += 1;
                continue;
            }
        };

        let decision = decider.evaluate(&observation.operation, observation.duration_ms);

        report.total += 1;
        if decision.retain {
            report.retained += 1;
        } else {
            report.dropped += 1;
        }

        let flow = on_outcome(&Outcome {
            line: line_no,
            observation,
            decision,
        });
        if flow.is_break() {
            break;
        }
    }

    Ok(report)
}
