//! Library module for the datascout binary.
//!
//! Exposes file enumeration, scan orchestration, and report output so
//! integration tests can drive them directly. The argument parsing and
//! process wiring live in main.rs.

pub mod output;
pub mod provider;
pub mod scan;
