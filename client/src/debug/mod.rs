//! # Logging and Task Tracing
//!
//! Structured logging for the sync layer and instrumented task spawning.
//!
//! ## Configuration
//!
//! Environment variables:
//! - `RUST_LOG`: Log level filter (default `cosmos_sync=info,warn`)
//! - `COSMOS_LOG_DIR`: Directory for the rotating log file (default `logs`)
//! - `COSMOS_LOG_FILE`: Write the rotating log file (1=on, 0=off, default on)

pub mod config;
pub mod logger;
pub mod task_tracker;

pub use config::LogConfig;
pub use logger::init as init_logger;
pub use task_tracker::{active_task_count, spawn_tracked};
