//! Site-root helpers
//!
//! Links on book pages are site-absolute, so they resolve against the origin
//! of the page rather than the page URL itself.

use url::Url;

/// Returns the root of the site a page belongs to
///
/// Cover images and download links on book pages are resolved against the
/// site root rather than the page itself.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use tululu_scraper::url::site_origin;
///
/// let page = Url::parse("https://tululu.org/b239/?from=l55").unwrap();
/// assert_eq!(site_origin(&page).as_str(), "https://tululu.org/");
/// ```
pub fn site_origin(url: &Url) -> Url {
    let mut origin = url.clone();
    origin.set_path("/");
    origin.set_query(None);
    origin.set_fragment(None);
    origin
}

/// Resolves an href found on `page` against the page's site root
pub fn resolve_against_origin(page: &Url, href: &str) -> Result<Url, url::ParseError> {
    site_origin(page).join(href.trim())
}

/// Takes the last path segment of a URL as a file name
///
/// Returns `None` when the path ends with a slash or has no segments.
pub fn file_name_from_url(url: &Url) -> Option<String> {
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}
