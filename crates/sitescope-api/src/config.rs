use std::env;

pub const ENV_PORT: &str = "SITESCOPE_PORT";
pub const ENV_CORS_ORIGIN: &str = "SITESCOPE_CORS_ORIGIN";
pub const ENV_PREVIEW_ROWS: &str = "SITESCOPE_PREVIEW_ROWS";

/// API server configuration loaded from environment variables
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub port: u16,
    pub cors_origin: String,
    /// Enriched rows echoed back by `/api/v1/analyze`
    pub preview_rows: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self { port: 3001, cors_origin: "http://localhost:3000".to_string(), preview_rows: 50 }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let port = env::var(ENV_PORT).ok().and_then(|p| p.parse().ok()).unwrap_or(defaults.port);

        let cors_origin = env::var(ENV_CORS_ORIGIN).unwrap_or(defaults.cors_origin);

        let preview_rows = env::var(ENV_PREVIEW_ROWS)
            .ok()
            .and_then(|n| n.parse().ok())
            .unwrap_or(defaults.preview_rows);

        Self { port, cors_origin, preview_rows }
    }

    /// Get the server bind address
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
