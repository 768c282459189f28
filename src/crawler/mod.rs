//! Crawler module for catalog walking and book downloading
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with reconnect-on-failure
//! - HTML parsing of catalog and book pages
//! - Downloading book texts and cover images
//! - Overall crawl coordination

mod coordinator;
mod downloader;
mod fetcher;
mod parser;
mod retry;

pub use coordinator::{run_crawl, Coordinator};
pub use downloader::{
    download_image, download_text, sanitize_filename, text_file_name, DownloadError,
};
pub use fetcher::{build_http_client, FetchError, HttpClient};
pub use parser::{parse_book_page, parse_catalog_page, ParseError};
pub use retry::RetryPolicy;

use crate::args::ConsoleArgs;
use crate::config::Config;
use crate::ScraperError;
use std::path::PathBuf;

/// Runs a complete crawl operation
///
/// Walks catalog pages `args.first..=args.last`, saves the book assets under
/// `args.dest_folder`, and writes the records to the JSON file.
///
/// # Returns
///
/// * `Ok(PathBuf)` - Path of the written JSON file
/// * `Err(ScraperError)` - The run was aborted
pub async fn crawl(config: Config, args: ConsoleArgs) -> Result<PathBuf, ScraperError> {
    run_crawl(config, args).await
}
