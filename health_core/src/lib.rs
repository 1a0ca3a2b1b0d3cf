#![forbid(unsafe_code)]

//! Core logic for the health tracker.
//!
//! This crate provides:
//! - Entry recording with date/value validation
//! - Moving averages and trailing-week summaries
//! - CSV export and read-back
//! - Configuration and logging setup shared by the CLI

pub mod error;
pub mod entry;
pub mod stats;
pub mod export;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub use error::{Error, Result};
pub use entry::{add_entry, normalize_metric, parse_date, Entry, MetricValue};
pub use stats::{moving_average, summarize_week, summarize_window, WeekSummary, DEFAULT_WINDOW};
pub use export::{export_csv, load_csv};
pub use config::Config;
