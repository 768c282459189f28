//! Book records collected during a crawl

use serde::Serialize;
use std::path::PathBuf;

/// Metadata and local asset paths for one book
///
/// Created by the page parser; the coordinator fills in `book_path` and
/// `img_src` as downloads succeed. The JSON keys match the files consumed by
/// the site renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BookRecord {
    pub title: String,

    pub author: String,

    /// Absolute URL of the cover image
    pub image_url: String,

    /// Reader comments; `None` when the page has none
    pub comments: Option<Vec<String>>,

    /// Genre tags; only collected when comments are present (see `parse_book_page`)
    pub genres: Option<Vec<String>>,

    /// Absolute URL of the plain-text download
    pub book_link: String,

    /// Where the text was saved, once downloaded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub book_path: Option<PathBuf>,

    /// Where the cover was saved, once downloaded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub img_src: Option<PathBuf>,
}
