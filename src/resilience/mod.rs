//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to remote function:
//!     → timeouts.rs (connect deadline, whole-request deadline)
//!     → On failure: 500 to the caller, single attempt
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - No retries and no circuit breaking: one attempt per request

pub mod timeouts;

pub use timeouts::build_client;
