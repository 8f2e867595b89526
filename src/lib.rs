//! Employee gateway library.
//!
//! Two HTTP surfaces share this crate:
//! - the forwarding gateway, relaying a static table of local routes to
//!   remote function endpoints
//! - the direct employee CRUD service over a document store

pub mod config;
pub mod employees;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod resilience;
pub mod routing;

pub use config::schema::Config;
pub use http::{GatewayServer, ServiceServer};
pub use lifecycle::Shutdown;
