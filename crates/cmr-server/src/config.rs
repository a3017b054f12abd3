//! Environment-driven service configuration
//!
//! Read once at startup into an immutable struct; nothing here changes at
//! runtime.

use cmr_render::{FontStrategy, RenderConfig};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub render: RenderConfig,
}

impl ServerConfig {
    /// Build configuration from the environment
    ///
    /// * `HOST` / `PORT` - listen address (default 0.0.0.0:3000)
    /// * `CMR_TEMPLATE_URL` - background template PDF location
    /// * `CMR_FONT_URL` - when set, switches to the embedded-font strategy
    /// * `CMR_FETCH_TIMEOUT_SECS` - bound on each outbound asset fetch
    /// * `CMR_MAX_GOODS_ROWS` - goods rows accepted per request
    pub fn from_env() -> Self {
        let defaults = RenderConfig::default();

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let template_url =
            std::env::var("CMR_TEMPLATE_URL").unwrap_or(defaults.template_url);

        let font_strategy = match std::env::var("CMR_FONT_URL") {
            Ok(url) if !url.is_empty() => FontStrategy::Embedded { url },
            _ => FontStrategy::Standard,
        };

        let fetch_timeout = std::env::var("CMR_FETCH_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.fetch_timeout);

        let max_goods_rows = std::env::var("CMR_MAX_GOODS_ROWS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.max_goods_rows);

        Self {
            host,
            port,
            render: RenderConfig {
                template_url,
                font_strategy,
                fetch_timeout,
                max_goods_rows,
            },
        }
    }
}
