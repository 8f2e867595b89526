//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Gateway and service handlers produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every log line of a request
//! - Metrics are cheap when no recorder is installed

pub mod logging;
pub mod metrics;
