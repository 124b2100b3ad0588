//! Command implementations for the CLI
//!
//! - start: Start the marketplace server
//! - test: Test configuration validity
//! - config: Configuration display
//! - estimate: One-off battery price estimate

pub mod config;
pub mod estimate;
pub mod start;
