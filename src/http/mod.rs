//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID)
//!     → [route table picks the forwarding handler]
//!     → forward.rs (outbound call, relay)
//!     → response.rs (error envelope on failure)
//!     → Send to client
//! ```

pub mod forward;
pub mod openapi;
pub mod request;
pub mod response;
pub mod server;

pub use forward::{ForwardError, ForwardTarget, Forwarder};
pub use openapi::OpenApiSpec;
pub use request::{MakeRequestUuidV4, X_REQUEST_ID};
pub use response::ApiError;
pub use server::{GatewayServer, ServerError, ServiceServer};
