use sitescope_core::config::LayeredConfig;

/// Read-only server state shared by every request
#[derive(Debug, Clone)]
pub struct AppState {
    /// Analysis defaults for parameters a request leaves out
    pub defaults: LayeredConfig,
    pub preview_rows: usize,
}

impl AppState {
    pub fn new(defaults: LayeredConfig, preview_rows: usize) -> Self {
        Self { defaults, preview_rows }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(LayeredConfig::with_defaults(), 50)
    }
}
