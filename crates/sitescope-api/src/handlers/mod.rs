mod analyze;
mod download;
mod health;
mod upload;

pub use analyze::handle_analyze;
pub use download::handle_download;
pub use health::health_check;
