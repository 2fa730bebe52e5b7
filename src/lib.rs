//! poi-enrich - Multi-provider enrichment of points of interest
//!
//! This library crate exposes the core functionality for integration testing.

pub mod config;
pub mod enrichment;
pub mod location;
pub mod report;
