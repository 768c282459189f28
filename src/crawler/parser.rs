//! HTML parser for catalog listings and book pages
//!
//! This module handles parsing HTML content to extract:
//! - Book page links from a catalog listing page
//! - Title, author, cover, comments, genres and the text download link
//!   from a single book page

use crate::record::BookRecord;
use crate::url::resolve_against_origin;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use url::Url;

/// Separator between title and author in a book page heading
const TITLE_SEPARATOR: &str = "::";

/// Why a book page could not be turned into a record
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("malformed book page {url}: {reason}")]
    MalformedPage { url: String, reason: String },

    #[error("no text download link on {url}")]
    LinkNotFound { url: String },
}

/// Parses a book page into a [`BookRecord`]
///
/// # Extraction Rules
///
/// | Field | Selector |
/// |-------|----------|
/// | title / author | first `h1`, split on `::` |
/// | cover | `.bookimage img[src]` |
/// | download link | `.d_book a` whose text equals `download_link_text` |
/// | comments | `.texts .black` |
/// | genres | `span.d_book a` |
///
/// Cover and download links are resolved against the site root of
/// `page_url`. Genres are only recorded when the page also has comments;
/// a page without comments yields `None` for both.
///
/// # Errors
///
/// * `MalformedPage` - no heading, no separator in it, or no cover image
/// * `LinkNotFound` - no "download as text" link
///
/// # Example
///
/// ```
/// use tululu_scraper::crawler::parse_book_page;
/// use url::Url;
///
/// let html = r#"<h1>Dune :: Herbert, Frank</h1>
///     <div class="bookimage"><img src="/shots/1.jpg"></div>
///     <table class="d_book"><tr><td><a href="/txt.php?id=1">скачать txt</a></td></tr></table>"#;
/// let page = Url::parse("https://tululu.org/b1/").unwrap();
/// let book = parse_book_page(html, &page, "скачать txt").unwrap();
/// assert_eq!(book.title, "Dune");
/// assert_eq!(book.author, "Herbert, Frank");
/// ```
pub fn parse_book_page(
    html: &str,
    page_url: &Url,
    download_link_text: &str,
) -> Result<BookRecord, ParseError> {
    let document = Html::parse_document(html);
    let malformed = |reason: &str| ParseError::MalformedPage {
        url: page_url.to_string(),
        reason: reason.to_string(),
    };

    let heading = select_all(&document, "h1")
        .into_iter()
        .next()
        .map(element_text)
        .ok_or_else(|| malformed("no h1 heading"))?;

    let (title, author) = heading
        .split_once(TITLE_SEPARATOR)
        .ok_or_else(|| malformed("heading has no title/author separator"))?;

    let image_src = select_all(&document, ".bookimage img")
        .into_iter()
        .find_map(|img| img.value().attr("src"))
        .ok_or_else(|| malformed("no cover image"))?;
    let image_url = resolve_against_origin(page_url, image_src)
        .map_err(|e| malformed(&format!("bad cover URL '{}': {}", image_src, e)))?;

    let book_link = extract_download_link(&document, page_url, download_link_text)?;

    let comments = collect_texts(&document, ".texts .black");

    // Genre tags are only kept for books that have comments
    let genres = match comments {
        Some(_) => Some(
            select_all(&document, "span.d_book a")
                .into_iter()
                .map(element_text)
                .collect(),
        ),
        None => None,
    };

    Ok(BookRecord {
        title: title.trim().to_string(),
        author: author.trim().to_string(),
        image_url: image_url.to_string(),
        comments,
        genres,
        book_link: book_link.to_string(),
        book_path: None,
        img_src: None,
    })
}

/// Extracts the book page links from one catalog listing page
///
/// Each book on a listing sits in a `.d_book` block; its first link points
/// at the book page. Links are resolved against `base_url`, the site root.
pub fn parse_catalog_page(html: &str, base_url: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);

    let Ok(link_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    select_all(&document, ".d_book")
        .into_iter()
        .filter_map(|book| book.select(&link_selector).next())
        .filter_map(|link| link.value().attr("href"))
        .filter_map(|href| match base_url.join(href.trim()) {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::debug!("Skipping unresolvable book link '{}': {}", href, e);
                None
            }
        })
        .collect()
}

fn extract_download_link(
    document: &Html,
    page_url: &Url,
    download_link_text: &str,
) -> Result<Url, ParseError> {
    let href = select_all(document, ".d_book a")
        .into_iter()
        .filter(|link| element_text(*link) == download_link_text.trim())
        .find_map(|link| link.value().attr("href"))
        .ok_or_else(|| ParseError::LinkNotFound {
            url: page_url.to_string(),
        })?;

    resolve_against_origin(page_url, href).map_err(|e| ParseError::MalformedPage {
        url: page_url.to_string(),
        reason: format!("bad download URL '{}': {}", href, e),
    })
}

/// Texts of all elements matching `css`, or `None` when nothing matches
fn collect_texts(document: &Html, css: &str) -> Option<Vec<String>> {
    let texts: Vec<String> = select_all(document, css)
        .into_iter()
        .map(element_text)
        .collect();

    if texts.is_empty() {
        None
    } else {
        Some(texts)
    }
}

fn select_all<'a>(document: &'a Html, css: &str) -> Vec<ElementRef<'a>> {
    match Selector::parse(css) {
        Ok(selector) => document.select(&selector).collect(),
        Err(_) => Vec::new(),
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}
