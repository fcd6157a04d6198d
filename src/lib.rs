// ABOUTME: Library root for imgprobe - exposes public types for testing.
// ABOUTME: The main binary is in main.rs.

pub mod config;
pub mod diagnostics;
pub mod dockerfile;
pub mod error;
pub mod output;
pub mod probe;
pub mod runtime;
pub mod types;
