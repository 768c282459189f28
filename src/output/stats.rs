//! Crawl statistics
//!
//! Counters kept by the coordinator while it walks the catalog, reported
//! once at the end of a run.

use std::fmt;

/// Counts of what happened during one crawl
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStats {
    /// Catalog pages whose listing was fetched
    pub pages_fetched: u64,

    /// Catalog pages skipped because the listing could not be fetched
    pub pages_skipped: u64,

    /// Books that ended up in the output
    pub books_saved: u64,

    /// Books dropped (missing page, parse failure, text download failure)
    pub books_skipped: u64,

    pub texts_downloaded: u64,

    /// Texts that failed to download; the book was dropped
    pub texts_failed: u64,

    pub images_downloaded: u64,

    /// Covers that failed to download; the book itself was kept
    pub images_failed: u64,
}

impl CrawlStats {
    /// Total books seen on the fetched catalog pages
    pub fn books_seen(&self) -> u64 {
        self.books_saved + self.books_skipped
    }

    /// Share of seen books that were saved, as a percentage
    pub fn success_rate(&self) -> f64 {
        let seen = self.books_seen();
        if seen == 0 {
            return 0.0;
        }
        (self.books_saved as f64 / seen as f64) * 100.0
    }

    /// Writes the statistics to the log
    pub fn log_summary(&self) {
        tracing::info!("{}", self);
    }
}

impl fmt::Display for CrawlStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Crawl finished: {} catalog pages ({} skipped), {} of {} books saved ({:.1}%), \
             {} texts ({} failed), {} covers ({} failed)",
            self.pages_fetched,
            self.pages_skipped,
            self.books_saved,
            self.books_seen(),
            self.success_rate(),
            self.texts_downloaded,
            self.texts_failed,
            self.images_downloaded,
            self.images_failed
        )
    }
}
