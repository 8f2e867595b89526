//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Detect routes the router could not register
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Route targets are not checked here; a malformed target is a
//!   per-request failure, reported to the caller

use std::collections::HashSet;
use std::net::SocketAddr;

use axum::http::Method;
use axum::routing::MethodFilter;
use thiserror::Error;

use crate::config::schema::Config;

/// A single semantic problem in a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field} must be greater than zero")]
    ZeroValue { field: &'static str },

    #[error("route {route:?}: path {path:?} {reason}")]
    InvalidPath {
        route: String,
        path: String,
        reason: &'static str,
    },

    #[error("route {route:?}: path {path:?} names its captures differently from {other:?}")]
    ConflictingCaptures {
        route: String,
        path: String,
        other: String,
    },

    #[error("route {route:?}: unsupported method {method:?}")]
    UnsupportedMethod { route: String, method: String },

    #[error("route {route:?}: duplicate {method} {path}")]
    DuplicateRoute {
        route: String,
        method: String,
        path: String,
    },

    #[error("route at index {index} has an empty name")]
    EmptyRouteName { index: usize },
}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    check_address(&mut errors, "service.bind_address", &config.service.bind_address);
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
        check_address(
            &mut errors,
            "service.metrics_address",
            &config.service.metrics_address,
        );
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::ZeroValue { field: "timeouts.connect_secs" });
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroValue { field: "timeouts.request_secs" });
    }
    if config.service.request_timeout_secs == 0 {
        errors.push(ValidationError::ZeroValue { field: "service.request_timeout_secs" });
    }
    if config.service.max_body_bytes == 0 {
        errors.push(ValidationError::ZeroValue { field: "service.max_body_bytes" });
    }

    let routes = config.effective_routes();
    let mut seen = HashSet::new();
    let mut registered: Vec<&str> = Vec::new();
    for (index, route) in routes.iter().enumerate() {
        if route.name.trim().is_empty() {
            errors.push(ValidationError::EmptyRouteName { index });
        }
        if let Some(reason) = path_error(&route.path) {
            errors.push(ValidationError::InvalidPath {
                route: route.name.clone(),
                path: route.path.clone(),
                reason,
            });
        } else if let Some(other) = registered
            .iter()
            .find(|other| captures_conflict(other, &route.path))
        {
            errors.push(ValidationError::ConflictingCaptures {
                route: route.name.clone(),
                path: route.path.clone(),
                other: other.to_string(),
            });
        } else {
            registered.push(route.path.as_str());
        }

        match parse_local_method(&route.method) {
            Some(method) => {
                if !seen.insert((route.path.clone(), method.clone())) {
                    errors.push(ValidationError::DuplicateRoute {
                        route: route.name.clone(),
                        method: method.to_string(),
                        path: route.path.clone(),
                    });
                }
            }
            None => errors.push(ValidationError::UnsupportedMethod {
                route: route.name.clone(),
                method: route.method.clone(),
            }),
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Parse a local route method, accepting only methods the router can filter on.
pub fn parse_local_method(value: &str) -> Option<Method> {
    let method = Method::from_bytes(value.trim().to_ascii_uppercase().as_bytes()).ok()?;
    MethodFilter::try_from(method.clone()).ok()?;
    Some(method)
}

/// Why the router would refuse `path`, if it would.
///
/// Captures are whole segments: `{name}`, or `{*name}` as the last segment.
/// `/swagger` is reserved for the API documentation.
pub fn path_error(path: &str) -> Option<&'static str> {
    if !path.starts_with('/') {
        return Some("must start with '/'");
    }
    if path == "/swagger" || path.starts_with("/swagger/") {
        return Some("is reserved for API documentation");
    }

    let segments: Vec<&str> = path[1..].split('/').collect();
    for (i, segment) in segments.iter().enumerate() {
        if segment.starts_with(':') {
            return Some("uses a ':' capture; write {name}");
        }
        if segment.starts_with('*') {
            return Some("uses a '*' wildcard; write {*name}");
        }
        if !segment.contains(['{', '}']) {
            continue;
        }
        match capture_name(segment) {
            Some(name) if name.starts_with('*') && i + 1 != segments.len() => {
                return Some("has a catch-all capture before the last segment");
            }
            Some(_) => {}
            None => return Some("has a malformed capture"),
        }
    }
    None
}

/// The capture name of a `{name}` or `{*name}` segment (`*` included).
pub fn capture_name(segment: &str) -> Option<&str> {
    let name = segment.strip_prefix('{')?.strip_suffix('}')?;
    let bare = name.strip_prefix('*').unwrap_or(name);
    if bare.is_empty() || bare.contains(['{', '}', '*', ':']) {
        return None;
    }
    Some(name)
}

/// True when both paths reach the same capture position through identical
/// segments but name it differently, which the router cannot hold at once.
pub fn captures_conflict(a: &str, b: &str) -> bool {
    for (x, y) in a.split('/').zip(b.split('/')) {
        match (capture_name(x), capture_name(y)) {
            (Some(p), Some(q)) if p != q => return true,
            (Some(_), Some(_)) => {}
            (None, None) if x == y => {}
            _ => return false,
        }
    }
    false
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}
