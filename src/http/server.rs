//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the gateway router from the function route table
//! - Create the employee service router
//! - Wire up middleware (tracing, request ID, limits)
//! - Serve each surface's OpenAPI document under `/swagger/`
//! - Serve on a listener until shutdown is signalled

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use url::Url;

use crate::config::Config;
use crate::employees::{self, EmployeeStore, ServiceState};
use crate::http::forward::Forwarder;
use crate::http::openapi::{self, OpenApiSpec};
use crate::http::request::with_request_id;
use crate::lifecycle::shutdown;
use crate::resilience::build_client;
use crate::routing::{RouteError, RouteTable};

/// Failure to assemble the gateway.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to build outbound client: {0}")]
    Client(#[from] reqwest::Error),

    #[error(transparent)]
    Route(#[from] RouteError),
}

/// Forwarding gateway server.
pub struct GatewayServer {
    router: Router,
    route_count: usize,
}

impl GatewayServer {
    /// Create the gateway: one shared outbound client, one handler per route.
    pub fn new(config: &Config) -> Result<Self, ServerError> {
        let client = build_client(&config.timeouts)?;
        let table = RouteTable::from_config(&config.effective_routes())?;

        for route in table.routes() {
            if let Err(e) = Url::parse(&route.target.url) {
                tracing::warn!(
                    route = %route.target.name,
                    target = %route.target.url,
                    error = %e,
                    "Route target does not parse; requests on it will fail"
                );
            }
        }

        let route_count = table.len();
        let docs = openapi::gateway_document(&table);
        let router = Self::build_router(table, Forwarder::new(client), docs);
        Ok(Self {
            router,
            route_count,
        })
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// No request timeout layer here: the outbound client owns the deadline
    /// and reports expiry as a forwarding failure.
    fn build_router(table: RouteTable, forwarder: Forwarder, docs: OpenApiSpec) -> Router {
        let router = table
            .into_router(forwarder)
            .merge(openapi::docs_router(docs))
            .layer(TraceLayer::new_for_http());
        with_request_id(router)
    }

    /// The assembled router, for embedding or in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            routes = self.route_count,
            "Gateway starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown_rx))
            .await?;

        tracing::info!("Gateway stopped");
        Ok(())
    }
}

/// Direct CRUD service server.
pub struct ServiceServer {
    router: Router,
}

impl ServiceServer {
    pub fn new(config: &Config, store: Arc<dyn EmployeeStore>) -> Self {
        #[allow(deprecated)]
        let timeout = TimeoutLayer::new(config.service.request_timeout());

        let router = employees::router(ServiceState::new(store))
            .merge(openapi::docs_router(openapi::service_document()))
            .layer(RequestBodyLimitLayer::new(config.service.max_body_bytes))
            .layer(timeout)
            .layer(TraceLayer::new_for_http());

        Self {
            router: with_request_id(router),
        }
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    pub async fn run(
        self,
        listener: TcpListener,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Employee service starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown::wait(shutdown_rx))
            .await?;

        tracing::info!("Employee service stopped");
        Ok(())
    }
}
