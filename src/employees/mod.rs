//! Direct employee CRUD service.
//!
//! # Data Flow
//! ```text
//! HTTP request
//!     → handlers.rs (path/body decoding, validation)
//!     → store.rs (one document-store operation)
//!     → JSON response, or ApiError envelope
//! ```

pub mod handlers;
pub mod model;
pub mod store;

use axum::routing::get;
use axum::{middleware, Router};

pub use handlers::ServiceState;
pub use model::Employee;
pub use store::{EmployeeStore, MemoryStore, SearchField, StoreError};

use self::handlers::*;

/// Routes of the CRUD service.
pub fn router(state: ServiceState) -> Router {
    Router::new()
        .route("/employees", get(list_employees).post(create_employee))
        .route(
            "/employees/{id}",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
        .route("/employees/search/{field}/{value}", get(search_employees))
        .route_layer(middleware::from_fn(track_request))
        .route("/health", get(health))
        .with_state(state)
}
