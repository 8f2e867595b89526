//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway
//! and the employee service. All types derive Serde traits for
//! deserialization from config files.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration shared by the gateway and the employee service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Config {
    /// Gateway listener configuration.
    pub listener: ListenerConfig,

    /// Outbound transport timeouts.
    pub timeouts: TimeoutConfig,

    /// Remote function settings used to build the default route table.
    pub functions: FunctionsConfig,

    /// Route definitions mapping local paths to remote functions.
    ///
    /// When empty, the default function table derived from
    /// `functions.base_url` is used.
    pub routes: Vec<RouteConfig>,

    /// Direct CRUD service settings.
    pub service: ServiceConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Config {
    /// The routes the gateway should serve.
    pub fn effective_routes(&self) -> Vec<RouteConfig> {
        if self.routes.is_empty() {
            self.functions.default_routes()
        } else {
            self.routes.clone()
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8085").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8085".to_string(),
        }
    }
}

/// Timeout configuration for outbound calls.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Total time for the outbound request, body included, in seconds.
    pub request_secs: u64,

    /// How long idle pooled connections are kept, in seconds.
    pub pool_idle_secs: u64,
}

impl TimeoutConfig {
    pub fn connect(&self) -> Duration {
        Duration::from_secs(self.connect_secs)
    }

    pub fn request(&self) -> Duration {
        Duration::from_secs(self.request_secs)
    }

    pub fn pool_idle(&self) -> Duration {
        Duration::from_secs(self.pool_idle_secs)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 5,
            request_secs: 30,
            pool_idle_secs: 90,
        }
    }
}

/// Remote function deployment settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FunctionsConfig {
    /// Base URL the default function routes point at.
    pub base_url: String,
}

impl FunctionsConfig {
    /// The static function table: five CRUD functions, one route each.
    pub fn default_routes(&self) -> Vec<RouteConfig> {
        let base = self.base_url.trim_end_matches('/');
        [
            ("function-1", "/function-1", "GET"),
            ("function-2", "/function-2/{id}", "GET"),
            ("function-3", "/function-3", "POST"),
            ("function-4", "/function-4/{id}", "PUT"),
            ("function-5", "/function-5/{id}", "DELETE"),
        ]
        .into_iter()
        .map(|(name, path, method)| RouteConfig {
            name: name.to_string(),
            path: path.to_string(),
            method: method.to_string(),
            target: format!("{}/{}", base, name),
            target_method: None,
        })
        .collect()
    }
}

impl Default for FunctionsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://us-central1-task3gcp.cloudfunctions.net".to_string(),
        }
    }
}

/// Route configuration mapping one local path and method to a remote target.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct RouteConfig {
    /// Route identifier for logging/metrics.
    pub name: String,

    /// Local path, in router syntax (e.g. "/function-2/{id}").
    pub path: String,

    /// Local method the router accepts.
    pub method: String,

    /// Remote URL every request on this route is sent to.
    pub target: String,

    /// Method used for the outbound call (defaults to `method`).
    #[serde(default)]
    pub target_method: Option<String>,
}

impl RouteConfig {
    /// The method used for the outbound call.
    ///
    /// An explicit `target_method` is sent as written (trimmed); otherwise
    /// the local method is used in its canonical upper-case form.
    pub fn forward_method(&self) -> String {
        match &self.target_method {
            Some(explicit) => explicit.trim().to_string(),
            None => self.method.trim().to_ascii_uppercase(),
        }
    }
}

/// Direct CRUD service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Bind address for the employee service.
    pub bind_address: String,

    /// Name of the employee collection.
    pub collection: String,

    /// Maximum accepted request body in bytes.
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Metrics endpoint bind address for the service process.
    pub metrics_address: String,

    /// Optional JSON file with employees loaded at startup.
    pub seed_path: Option<PathBuf>,
}

impl ServiceConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            collection: "employees".to_string(),
            max_body_bytes: 64 * 1024,
            request_timeout_secs: 30,
            metrics_address: "0.0.0.0:9091".to_string(),
            seed_path: None,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
