//! SiteScope Analysis - Density, co-location and area classification
//!
//! Each stage is a pure function over a validated site table; [`pipeline`]
//! chains them and collects the messages a caller needs to see.

pub mod classifier;
pub mod colocation;
pub mod density;
pub mod pipeline;

pub use classifier::{classify, classify_quantile, classify_threshold, quantile, QuantileCuts};
pub use colocation::{find_groups, group_id_for, CoLocationGroups, ProximityGraph, UnionFind};
pub use density::compute_density;
pub use pipeline::{process, PipelineOutput, SitePipeline};
