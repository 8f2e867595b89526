//! Timeout enforcement for outbound calls.
//!
//! # Responsibilities
//! - Build the shared outbound client with connect and request deadlines
//! - Keep pooled connections bounded in idle time
//!
//! # Design Decisions
//! - The request deadline covers the whole exchange, body relay included
//! - A timed-out call is a transport failure like any other (500, no retry)

use crate::config::TimeoutConfig;

/// Build the shared, pooling outbound client.
pub fn build_client(config: &TimeoutConfig) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .connect_timeout(config.connect())
        .timeout(config.request())
        .pool_idle_timeout(config.pool_idle())
        .no_proxy()
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn builds_with_defaults() {
        assert!(build_client(&TimeoutConfig::default()).is_ok());
    }
}
