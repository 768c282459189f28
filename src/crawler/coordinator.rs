//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that walks the configured catalog
//! pages one after another, including:
//! - Fetching each listing page and collecting its book links
//! - Fetching and parsing every book page
//! - Downloading the text and cover of each book unless told to skip them
//! - Writing the collected records to the JSON file
//!
//! Every request is awaited in order; nothing runs in parallel.
//!
//! # Failure Handling
//!
//! | Failure | Action |
//! |---------|--------|
//! | Catalog page fetch | Skip the whole page |
//! | Book page fetch / parse | Skip the book |
//! | Text download | Skip the book |
//! | Image download | Keep the book without `img_src` |
//! | Writing to disk | Abort the run |

use crate::args::ConsoleArgs;
use crate::config::Config;
use crate::crawler::downloader::{download_image, download_text, DownloadError};
use crate::crawler::fetcher::HttpClient;
use crate::crawler::parser::{parse_book_page, parse_catalog_page};
use crate::output::{save_books, CrawlStats};
use crate::record::BookRecord;
use crate::url::{book_id_from_url, catalog_page_url};
use crate::ScraperError;
use std::path::{Path, PathBuf};
use url::Url;

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Config,
    args: ConsoleArgs,
    client: HttpClient,
    base_url: Url,
    stats: CrawlStats,
}

impl Coordinator {
    /// Creates a coordinator with an HTTP client built from the configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(ScraperError)` - Invalid page range, base URL, or client setup
    pub fn new(config: Config, args: ConsoleArgs) -> Result<Self, ScraperError> {
        let client = HttpClient::from_config(&config)?;
        Self::with_client(config, args, client)
    }

    /// Creates a coordinator that uses the given client for every request
    pub fn with_client(
        config: Config,
        args: ConsoleArgs,
        client: HttpClient,
    ) -> Result<Self, ScraperError> {
        args.validate()?;
        let base_url = Url::parse(&config.site.base_url)?;

        Ok(Self {
            config,
            args,
            client,
            base_url,
            stats: CrawlStats::default(),
        })
    }

    /// Counters for the pages and books handled so far
    pub fn stats(&self) -> &CrawlStats {
        &self.stats
    }

    /// Runs the crawl over all configured catalog pages
    ///
    /// Creates the `books` and `images` directories, then returns the records
    /// of every book that made it through in crawl order.
    pub async fn run(&mut self) -> Result<Vec<BookRecord>, ScraperError> {
        create_dir(&self.args.books_dir()).await?;
        create_dir(&self.args.images_dir()).await?;

        tracing::info!(
            "Crawling catalog pages {}..={} of {}",
            self.args.first,
            self.args.last,
            self.base_url.join(&self.config.site.category_path)?
        );

        let mut books = Vec::new();
        for page in self.args.pages() {
            self.crawl_catalog_page(page, &mut books).await?;
        }

        Ok(books)
    }

    /// Processes every book linked from one catalog page
    async fn crawl_catalog_page(
        &mut self,
        page: u32,
        books: &mut Vec<BookRecord>,
    ) -> Result<(), ScraperError> {
        let page_url = catalog_page_url(&self.base_url, &self.config.site.category_path, page)?;
        tracing::info!("Catalog page {}: {}", page, page_url);

        let listing = match self.client.get_text(&page_url).await {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!("Could not get book links from catalog page {}: {}", page, e);
                self.stats.pages_skipped += 1;
                return Ok(());
            }
        };
        self.stats.pages_fetched += 1;

        let book_urls = parse_catalog_page(&listing, &self.base_url);
        tracing::debug!("Found {} books on catalog page {}", book_urls.len(), page);

        for book_url in &book_urls {
            match self.process_book(book_url).await? {
                Some(book) => {
                    self.stats.books_saved += 1;
                    books.push(book);
                }
                None => self.stats.books_skipped += 1,
            }
        }

        Ok(())
    }

    /// Fetches, parses and downloads one book
    ///
    /// # Returns
    ///
    /// * `Ok(Some(record))` - The book is kept
    /// * `Ok(None)` - The book was skipped; the reason has been logged
    /// * `Err(ScraperError)` - A file could not be written
    async fn process_book(&mut self, book_url: &Url) -> Result<Option<BookRecord>, ScraperError> {
        let Some(book_id) = book_id_from_url(book_url) else {
            tracing::warn!("No book id in {}. Moving on to the next book", book_url);
            return Ok(None);
        };

        let html = match self.client.get_text(book_url).await {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!("No book at {} ({}). Moving on to the next book", book_url, e);
                return Ok(None);
            }
        };

        let mut book =
            match parse_book_page(&html, book_url, &self.config.site.download_link_text) {
                Ok(book) => book,
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", book_url, e);
                    return Ok(None);
                }
            };
        tracing::info!("Collected book info from {}", book_url);

        if !self.args.skip_txt {
            let text_url = Url::parse(&book.book_link)?;
            let books_dir = self.args.books_dir();

            let downloaded =
                download_text(&self.client, book_id, &book.title, &text_url, &books_dir).await;
            match downloaded {
                Ok(path) => {
                    tracing::info!("Book text saved to {}", path.display());
                    self.stats.texts_downloaded += 1;
                    book.book_path = Some(path);
                }
                Err(DownloadError::Filesystem { path, source }) => {
                    return Err(ScraperError::Filesystem { path, source });
                }
                Err(e) => {
                    tracing::warn!("Text of {} not downloaded: {}", book_url, e);
                    self.stats.texts_failed += 1;
                    return Ok(None);
                }
            }
        }

        if !self.args.skip_imgs {
            let image_url = Url::parse(&book.image_url)?;
            let images_dir = self.args.images_dir();

            let downloaded = download_image(&self.client, &image_url, &images_dir).await;
            match downloaded {
                Ok(path) => {
                    tracing::info!("Cover saved to {}", path.display());
                    self.stats.images_downloaded += 1;
                    book.img_src = Some(path);
                }
                Err(DownloadError::Filesystem { path, source }) => {
                    return Err(ScraperError::Filesystem { path, source });
                }
                Err(e) => {
                    tracing::warn!("Cover of {} not downloaded: {}", book_url, e);
                    self.stats.images_failed += 1;
                }
            }
        }

        Ok(Some(book))
    }
}

/// Runs a complete crawl and writes the JSON document
///
/// This is the main entry point for a crawl. It will:
/// 1. Build the HTTP client for this run
/// 2. Walk the catalog pages and collect book records
/// 3. Write all records to the JSON file
/// 4. Log the crawl statistics
///
/// # Returns
///
/// The path of the written JSON file.
pub async fn run_crawl(config: Config, args: ConsoleArgs) -> Result<PathBuf, ScraperError> {
    let json_path = args.resolve_json_path(&config.site.category_name);

    let mut coordinator = Coordinator::new(config, args)?;
    let books = coordinator.run().await?;

    save_books(&books, &json_path)?;
    tracing::info!("Book records written to {}", json_path.display());
    coordinator.stats().log_summary();

    Ok(json_path)
}

async fn create_dir(path: &Path) -> Result<(), ScraperError> {
    tokio::fs::create_dir_all(path)
        .await
        .map_err(|source| ScraperError::Filesystem {
            path: path.to_path_buf(),
            source,
        })
}
