//! Retain/drop classification against an operation's latency band

use crate::running_stat::StatSnapshot;
use serde::Serialize;

/// Inclusive acceptance band `[mean - k·σ, mean + k·σ]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Band {
    /// Lower bound (inclusive)
    pub lower: f64,
    /// Upper bound (inclusive)
    pub upper: f64,
}

impl Band {
    /// Build the band `k` standard deviations either side of the mean
    pub fn around(snapshot: &StatSnapshot, k: f64) -> Self {
        let half_width = k * snapshot.std_dev();
        Self {
            lower: snapshot.mean - half_width,
            upper: snapshot.mean + half_width,
        }
    }

    /// Check if a value falls within the band, bounds included
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }

    /// Check if a value is an outlier (below the lower bound or above the upper bound)
    pub fn excludes(&self, value: f64) -> bool {
        value < self.lower || value > self.upper
    }

    /// Width of the band
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Why an observation was retained or dropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionReason {
    /// Not enough history for the operation yet; retained unconditionally
    WarmUp,
    /// Outside the band; retained
    Outlier,
    /// Inside the band (bounds included); dropped
    WithinBand,
}

impl DecisionReason {
    /// Short label used in text output
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionReason::WarmUp => "warm-up",
            DecisionReason::Outlier => "outlier",
            DecisionReason::WithinBand => "within-band",
        }
    }
}

/// Full record of one decision
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Decision {
    /// Whether the span should be forwarded
    pub retain: bool,
    pub reason: DecisionReason,
    /// Statistics right after this observation was pushed
    pub snapshot: StatSnapshot,
    /// Band the observation was tested against (absent during warm-up)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub band: Option<Band>,
}

impl Decision {
    /// Classify `duration` against a post-push snapshot
    ///
    /// Observations are retained while `snapshot.count < warmup_count`. After
    /// that an observation is retained only when it lies strictly outside the
    /// `band_width`-sigma band.
    pub fn classify(
        duration: f64,
        snapshot: StatSnapshot,
        band_width: f64,
        warmup_count: u64,
    ) -> Self {
        if snapshot.count < warmup_count {
            return Self {
                retain: true,
                reason: DecisionReason::WarmUp,
                snapshot,
                band: None,
            };
        }

        let band = Band::around(&snapshot, band_width);
        let (retain, reason) = if band.excludes(duration) {
            (true, DecisionReason::Outlier)
        } else {
            (false, DecisionReason::WithinBand)
        };

        Self {
            retain,
            reason,
            snapshot,
            band: Some(band),
        }
    }

    /// Distance from the mean in standard deviations
    ///
    /// Returns 0 when the standard deviation is 0.
    pub fn z_score(&self, duration: f64) -> f64 {
        let std_dev = self.snapshot.std_dev();
        if std_dev == 0.0 {
            0.0
        } else {
            (duration - self.snapshot.mean) / std_dev
        }
    }
}
