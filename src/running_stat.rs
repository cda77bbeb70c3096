//! Per-operation running statistics
//!
//! Welford's single-pass algorithm for count, mean and sample variance.
//! Memory is O(1) regardless of how many observations are pushed, and the
//! update avoids the cancellation error of accumulating raw sums and
//! sums of squares.

use serde::Serialize;

/// Point-in-time copy of a [`RunningStat`]
///
/// Returned by [`RunningStat::push`] so the caller classifies against exactly
/// the state produced by its own push.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct StatSnapshot {
    /// Observations pushed so far (including the one that produced this snapshot)
    pub count: u64,
    /// Running mean (0 when `count == 0`)
    pub mean: f64,
    /// Sample variance, divisor `count - 1` (0 when `count < 2`)
    pub variance: f64,
}

impl StatSnapshot {
    /// Sample standard deviation
    pub fn std_dev(&self) -> f64 {
        self.variance.sqrt()
    }
}

/// Online mean/variance accumulator for one operation
///
/// # Example
///
/// ```
/// use tail_sampler::running_stat::RunningStat;
///
/// let mut stat = RunningStat::new();
/// for x in [1.0, 2.0, 3.0, 4.0, 5.0] {
///     stat.push(x);
/// }
///
/// assert_eq!(stat.count(), 5);
/// assert!((stat.mean() - 3.0).abs() < 1e-12);
/// assert!((stat.variance() - 2.5).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RunningStat {
    /// Number of values pushed
    count: u64,
    /// Running mean
    mean: f64,
    /// Sum of squared differences from the mean (M2)
    sum_sq_diff: f64,
}

impl RunningStat {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one observation and return the updated statistics
    ///
    /// Any value is accepted, including zero and negative durations.
    pub fn push(&mut self, x: f64) -> StatSnapshot {
        self.count += 1;

        if self.count == 1 {
            self.mean = x;
            self.sum_sq_diff = 0.0;
        } else {
            let new_mean = self.mean + (x - self.mean) / self.count as f64;
            let new_sum_sq_diff = self.sum_sq_diff + (x - self.mean) * (x - new_mean);

            self.mean = new_mean;
            self.sum_sq_diff = new_sum_sq_diff;
        }

        self.snapshot()
    }

    /// Number of observations pushed
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Running mean, or 0 before the first push
    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.mean
        }
    }

    /// Sample variance (Bessel's correction), or 0 with fewer than two values
    pub fn variance(&self) -> f64 {
        if self.count < 2 {
            0.0
        } else {
            self.sum_sq_diff / (self.count - 1) as f64
        }
    }

    /// Sample standard deviation
    pub fn std_dev(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Copy of the current statistics
    pub fn snapshot(&self) -> StatSnapshot {
        StatSnapshot {
            count: self.count,
            mean: self.mean(),
            variance: self.variance(),
        }
    }
}
