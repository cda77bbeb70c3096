//! tail-sampler - tail-based sampling decisions for distributed-tracing spans
//!
//! Keeps per-operation running latency statistics (Welford's algorithm) and
//! retains a completed span only when its duration falls outside its
//! operation's `mean ± k·σ` band, so routine spans can be dropped while
//! latency outliers are exported.
//!
//! ```
//! use tail_sampler::TailDecider;
//!
//! let decider = TailDecider::new();
//! for _ in 0..20 {
//!     decider.observe("op", 10.0);
//! }
//! assert!(decider.observe("op", 1000.0));
//!
//! let stats = decider.stats("op");
//! assert_eq!(stats.count, 21);
//! ```

pub mod cli;
pub mod config;
pub mod decider;
pub mod decision;
pub mod error;
pub mod replay;
pub mod running_stat;

pub use config::DeciderConfig;
pub use decider::{OperationStats, TailDecider};
pub use decision::{Band, Decision, DecisionReason};
pub use error::{Error, Result};
pub use running_stat::{RunningStat, StatSnapshot};
