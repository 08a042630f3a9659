//! Command-line front-end for the shelfcopy pipeline.
//!
//! Runs the extraction pipeline against saved catalog pages and manages the
//! per-site settings that shape the copied row.

pub mod cli;
pub mod config;
