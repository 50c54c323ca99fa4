//! ARBLEDGER — multi-leg bet settlement and aggregation engine
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod format;
pub mod engine;
pub mod report;
pub mod storage;
