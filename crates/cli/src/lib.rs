//! Larum CLI Library
//!
//! This crate provides the command-line runner for Larum boot images.

pub mod args;
pub mod runner;

/// CLI version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
