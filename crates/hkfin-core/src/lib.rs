//! hkfin Core Library
//!
//! Adapters over Hong Kong financial open data:
//! - HKMA public API (HIBOR, mortgages, credit cards, bank locators, tenders)
//! - IRD open data CSV files (business registrations, stamp duty)
//! - AOF historical banking statistics
//! - Layered source configuration
//! - Shared range, text and pagination filters

pub mod config;
pub mod datasets;
pub mod error;
pub mod filters;
pub mod models;
pub mod source;

/// Test utilities including a canned data source and mock upstream server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use config::Config;
pub use error::{Error, Result};
pub use models::{Coerced, Language};
pub use source::{DataSource, HttpSource, Record, SourceRequest, Upstream};
