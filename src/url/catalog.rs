//! Catalog addressing
//!
//! Listing pages are numbered under the category path, and each book page
//! carries its numeric id in the path (`/b<id>/`).

use url::Url;

/// Builds the URL of one catalog listing page
///
/// Listing pages live at `<base>/<category>/<n>`; the category path is given
/// a trailing slash if it lacks one so that joining appends the page number
/// instead of replacing the category.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use tululu_scraper::url::catalog_page_url;
///
/// let base = Url::parse("https://tululu.org/").unwrap();
/// let url = catalog_page_url(&base, "l55", 3).unwrap();
/// assert_eq!(url.as_str(), "https://tululu.org/l55/3");
/// ```
pub fn catalog_page_url(base: &Url, category_path: &str, page: u32) -> Result<Url, url::ParseError> {
    let category_path = if category_path.ends_with('/') {
        category_path.to_string()
    } else {
        format!("{}/", category_path)
    };

    base.join(&category_path)?.join(&page.to_string())
}

/// Extracts the numeric book id from a book page URL of the form `/b<id>/`
pub fn book_id_from_url(url: &Url) -> Option<u64> {
    url.path()
        .trim_matches('/')
        .strip_prefix('b')?
        .parse()
        .ok()
}
