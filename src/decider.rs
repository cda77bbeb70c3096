//! Tail-based sampling decisions over per-operation latency statistics
//!
//! A [`TailDecider`] owns one [`RunningStat`] per operation identifier. Each
//! observation updates its operation's statistics and is then tested against
//! the band `mean ± k·σ` computed from the updated state: values outside the
//! band are retained, values inside are dropped.
//!
//! # Concurrency
//!
//! The registry is a sharded [`DashMap`]. Get-or-create goes through
//! `entry().or_insert_with()`, which holds the shard's write lock, so two
//! first observations of the same operation always end up sharing a single
//! entry. Entries are `Arc<Mutex<RunningStat>>`; the shard guard is released
//! before the entry lock is taken, and the push and the snapshot used for
//! classification happen under that one entry lock.

use crate::config::DeciderConfig;
use crate::decision::Decision;
use crate::error::Result;
use crate::running_stat::{RunningStat, StatSnapshot};
use dashmap::DashMap;
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

/// Shared handle to one operation's statistics
type StatHandle = Arc<Mutex<RunningStat>>;

/// Read-only statistics for one operation
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct OperationStats {
    pub mean: f64,
    pub variance: f64,
    pub count: u64,
}

impl OperationStats {
    /// Sample standard deviation
    pub fn std_dev(&self) -> f64 {
        self.variance.sqrt()
    }
}

impl From<StatSnapshot> for OperationStats {
    fn from(snapshot: StatSnapshot) -> Self {
        Self {
            mean: snapshot.mean,
            variance: snapshot.variance,
            count: snapshot.count,
        }
    }
}

/// Per-operation tail sampling decision engine
///
/// # Example
///
/// ```
/// use tail_sampler::decider::TailDecider;
///
/// let decider = TailDecider::new();
///
/// // First observation of an operation is always retained
/// assert!(decider.observe("GET /users", 10.0));
///
/// for _ in 0..20 {
///     decider.observe("GET /users", 10.0);
/// }
///
/// // Routine latency is dropped, a spike is retained
/// assert!(!decider.observe("GET /users", 10.0));
/// assert!(decider.observe("GET /users", 1000.0));
/// ```
#[derive(Debug, Default)]
pub struct TailDecider {
    /// Operation identifier -> statistics
    registry: DashMap<String, StatHandle>,
    config: DeciderConfig,
}

impl TailDecider {
    /// Create a decider with the default 2σ band and warm-up of 2
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a decider with a custom configuration
    ///
    /// Fails with [`Error::InvalidConfig`](crate::error::Error::InvalidConfig)
    /// if the configuration does not pass [`DeciderConfig::validate`].
    pub fn with_config(config: DeciderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            registry: DashMap::new(),
            config,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &DeciderConfig {
        &self.config
    }

    /// Record a duration and decide whether to retain the span
    ///
    /// Returns `true` to retain. Durations are expected in a consistent unit
    /// per operation (milliseconds by convention).
    pub fn observe(&self, operation: &str, duration: f64) -> bool {
        self.evaluate(operation, duration).retain
    }

    /// Record a [`Duration`] (normalized to fractional milliseconds) and decide
    pub fn observe_duration(&self, operation: &str, duration: Duration) -> bool {
        self.observe(operation, duration.as_secs_f64() * 1000.0)
    }

    /// Record a duration and return the full decision record
    pub fn evaluate(&self, operation: &str, duration: f64) -> Decision {
        let handle = self.get_or_create(operation);
        let snapshot = handle.lock().push(duration);

        let decision = Decision::classify(
            duration,
            snapshot,
            self.config.band_width,
            self.config.warmup_count,
        );

        trace!(
            operation,
            duration,
            count = snapshot.count,
            mean = snapshot.mean,
            std_dev = snapshot.std_dev(),
            reason = decision.reason.as_str(),
            retain = decision.retain,
            "Tail sampling decision"
        );

        decision
    }

    /// Statistics for an operation, or all zeros if it was never observed
    ///
    /// Never creates a registry entry.
    pub fn stats(&self, operation: &str) -> OperationStats {
        self.lookup(operation)
            .map(|handle| OperationStats::from(handle.lock().snapshot()))
            .unwrap_or_default()
    }

    /// Check if an operation has been observed
    pub fn contains(&self, operation: &str) -> bool {
        self.registry.contains_key(operation)
    }

    /// Number of distinct operations observed
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// Check if no operation has been observed
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Statistics for every observed operation, sorted by operation name
    ///
    /// Each entry is read under its own lock; the result is not a single
    /// atomic cut across operations.
    pub fn snapshot_all(&self) -> Vec<(String, OperationStats)> {
        let handles: Vec<(String, StatHandle)> = self
            .registry
            .iter()
            .map(|entry| (entry.key().clone(), Arc::clone(entry.value())))
            .collect();

        let mut stats: Vec<(String, OperationStats)> = handles
            .into_iter()
            .map(|(operation, handle)| {
                let snapshot = handle.lock().snapshot();
                (operation, OperationStats::from(snapshot))
            })
            .collect();

        stats.sort_by(|a, b| a.0.cmp(&b.0));
        stats
    }

    fn lookup(&self, operation: &str) -> Option<StatHandle> {
        self.registry
            .get(operation)
            .map(|entry| Arc::clone(entry.value()))
    }

    fn get_or_create(&self, operation: &str) -> StatHandle {
        // Read-only fast path for operations that already exist
        if let Some(handle) = self.lookup(operation) {
            return handle;
        }

        let entry = self
            .registry
            .entry(operation.to_string())
            .or_insert_with(|| {
                debug!(operation, "Registering new operation");
                Arc::new(Mutex::new(RunningStat::new()))
            });
        Arc::clone(entry.value())
    }
}
