//! SiteScope Core - Domain models, validation, table I/O and configuration
//!
//! This crate contains the shared domain types consumed by the spatial index,
//! the analytics pipeline and the service/CLI adapters.

pub mod config;
pub mod error;
pub mod models;
pub mod table_io;
pub mod validation;

pub use error::{Result, SiteError};
