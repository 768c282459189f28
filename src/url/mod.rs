//! URL handling module for Tululu-Scraper
//!
//! This module builds catalog listing URLs, resolves links found on book
//! pages against the site root, and derives book ids and file names from URLs.

mod catalog;
mod origin;

// Re-export main functions
pub use catalog::{book_id_from_url, catalog_page_url};
pub use origin::{file_name_from_url, resolve_against_origin, site_origin};
