//! Output module for crawl results
//!
//! This module handles:
//! - Writing the collected book records as a JSON document
//! - Recording crawl statistics

mod json;
pub mod stats;

pub use json::{save_books, write_books};
pub use stats::CrawlStats;

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize book records: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
