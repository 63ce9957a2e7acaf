mod request;
mod response;

pub use request::AnalyzeQuery;
pub use response::{AnalysisResponse, HealthResponse, DOWNLOAD_URL};
