pub mod classification;
pub mod params;
pub mod site;
pub mod table;

pub use classification::{AreaClass, AreaSummary, ClassificationMode, ThresholdOverrides, Thresholds};
pub use params::PipelineParams;
pub use site::{EnrichedSite, Site};
pub use table::{EnrichedTable, RawTable, SiteTable};
