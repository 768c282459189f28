//! Asset downloader
//!
//! Fetches book texts and cover images through the [`HttpClient`] and writes
//! them to disk. Fetch failures are passed back untouched so the coordinator
//! can decide whether the book survives; write failures are reported
//! separately because they abort the run.

use crate::crawler::fetcher::{FetchError, HttpClient};
use crate::url::file_name_from_url;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

/// Characters that are not allowed in file names on common platforms
const RESERVED_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Longest sanitized title kept in a file name, in bytes
const MAX_TITLE_BYTES: usize = 200;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("cannot derive a file name from {url}")]
    NoFileName { url: String },

    #[error("failed to write {path}: {source}")]
    Filesystem {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Downloads a book text to `<dir>/<book_id>. <title>.txt`
///
/// # Returns
///
/// The path the text was written to.
pub async fn download_text(
    client: &HttpClient,
    book_id: u64,
    title: &str,
    url: &Url,
    dir: &Path,
) -> Result<PathBuf, DownloadError> {
    let content = client.get_bytes(url).await?;
    let path = dir.join(text_file_name(book_id, title));

    write_file(&path, &content).await?;
    Ok(path)
}

/// Downloads a cover image to `<dir>/<last segment of url>`
pub async fn download_image(
    client: &HttpClient,
    url: &Url,
    dir: &Path,
) -> Result<PathBuf, DownloadError> {
    let file_name = file_name_from_url(url).ok_or_else(|| DownloadError::NoFileName {
        url: url.to_string(),
    })?;

    let content = client.get_bytes(url).await?;
    let path = dir.join(file_name);

    write_file(&path, &content).await?;
    Ok(path)
}

/// File name for a downloaded book text
pub fn text_file_name(book_id: u64, title: &str) -> String {
    format!("{}. {}.txt", book_id, sanitize_filename(title))
}

/// Makes a string safe to use as a file name
///
/// Removes reserved and control characters, trims surrounding whitespace and
/// trailing dots, and caps the length. An empty result becomes `_`.
///
/// # Examples
///
/// ```
/// use tululu_scraper::crawler::sanitize_filename;
///
/// assert_eq!(sanitize_filename("What? Why: <Now>"), "What Why Now");
/// assert_eq!(sanitize_filename("???"), "_");
/// ```
pub fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !RESERVED_CHARS.contains(c) && !c.is_control())
        .collect();

    let mut cleaned = truncate_at_char_boundary(cleaned.trim(), MAX_TITLE_BYTES)
        .trim_end_matches(|c: char| c == '.' || c.is_whitespace())
        .to_string();

    if cleaned.is_empty() {
        cleaned.push('_');
    }

    cleaned
}

fn truncate_at_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }

    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

async fn write_file(path: &Path, content: &[u8]) -> Result<(), DownloadError> {
    tokio::fs::write(path, content)
        .await
        .map_err(|source| DownloadError::Filesystem {
            path: path.to_path_buf(),
            source,
        })
}
