//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     RouteConfig[]
//!     → table.rs (parse local method, build ForwardTarget)
//!     → Register on Axum router (path + method filter)
//!     → Freeze as immutable Router
//!
//! Incoming Request (path, method)
//!     → Axum router match
//!     → forwarding handler for that route
//!     → 404 / 405 from Axum when nothing matches
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Static 1:1 mapping: one local route, one remote target

pub mod table;

pub use table::{FunctionRoute, RouteError, RouteTable};
