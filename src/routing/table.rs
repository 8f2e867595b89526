//! Static function route table.
//!
//! # Responsibilities
//! - Compile `RouteConfig` entries into forwarding routes
//! - Register each route on an Axum router under its local path and method
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - One handler per route, each owning its target and a clone of the
//!   shared forwarder
//! - Path captures (e.g. `{id}`) are matched but not substituted into the
//!   target

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::routing::{on, MethodFilter};
use axum::Router;
use thiserror::Error;

use crate::config::validation::{captures_conflict, parse_local_method, path_error};
use crate::config::RouteConfig;
use crate::http::forward::{ForwardTarget, Forwarder};

/// A route that cannot be registered.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("route {route:?}: unsupported method {method:?}")]
    UnsupportedMethod { route: String, method: String },

    #[error("route {route:?}: path {path:?} {reason}")]
    InvalidPath {
        route: String,
        path: String,
        reason: &'static str,
    },

    #[error("route {route:?}: path {path:?} conflicts with {other:?}")]
    Conflict {
        route: String,
        path: String,
        other: String,
    },
}

/// One local path + method forwarded to one remote target.
#[derive(Debug, Clone)]
pub struct FunctionRoute {
    pub path: String,
    pub method: Method,
    pub filter: MethodFilter,
    pub target: Arc<ForwardTarget>,
}

impl FunctionRoute {
    pub fn from_config(config: &RouteConfig) -> Result<Self, RouteError> {
        let unsupported = || RouteError::UnsupportedMethod {
            route: config.name.clone(),
            method: config.method.clone(),
        };
        if let Some(reason) = path_error(&config.path) {
            return Err(RouteError::InvalidPath {
                route: config.name.clone(),
                path: config.path.clone(),
                reason,
            });
        }
        let method = parse_local_method(&config.method).ok_or_else(unsupported)?;
        let filter = MethodFilter::try_from(method.clone()).map_err(|_| unsupported())?;

        Ok(Self {
            path: config.path.clone(),
            method,
            filter,
            target: Arc::new(ForwardTarget {
                name: config.name.clone(),
                url: config.target.clone(),
                method: config.forward_method(),
            }),
        })
    }
}

/// The compiled route table.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<FunctionRoute>,
}

impl RouteTable {
    /// Compile every route, refusing any table the router could not hold.
    pub fn from_config(routes: &[RouteConfig]) -> Result<Self, RouteError> {
        let mut compiled: Vec<FunctionRoute> = Vec::with_capacity(routes.len());
        for config in routes {
            let route = FunctionRoute::from_config(config)?;
            let clash = compiled.iter().find(|other| {
                captures_conflict(&other.path, &route.path)
                    || (other.path == route.path && other.method == route.method)
            });
            if let Some(other) = clash {
                return Err(RouteError::Conflict {
                    route: config.name.clone(),
                    path: route.path,
                    other: format!("{} {}", other.method, other.path),
                });
            }
            compiled.push(route);
        }
        Ok(Self { routes: compiled })
    }

    pub fn routes(&self) -> &[FunctionRoute] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Register every route on a fresh router.
    pub fn into_router(self, forwarder: Forwarder) -> Router {
        let mut router = Router::new();
        for route in self.routes {
            tracing::info!(
                route = %route.target.name,
                method = %route.method,
                path = %route.path,
                target = %route.target.url,
                target_method = %route.target.method,
                "Registering function route"
            );

            let forwarder = forwarder.clone();
            let target = route.target;
            let handler = move |request: Request<Body>| {
                let forwarder = forwarder.clone();
                let target = Arc::clone(&target);
                async move { forwarder.forward(&target, request).await }
            };
            router = router.route(&route.path, on(route.filter, handler));
        }
        router
    }
}
