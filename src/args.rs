//! Per-run console arguments
//!
//! `ConsoleArgs` is the immutable snapshot of what the user asked for on the
//! command line: which catalog pages to walk, where to put the results and
//! which assets to skip. It is built once by clap and only read afterwards.

use crate::ConfigError;
use clap::Args;
use std::path::{Path, PathBuf};

/// Name of the directory under the destination folder holding book texts
pub const BOOKS_DIR: &str = "books";

/// Name of the directory under the destination folder holding cover images
pub const IMAGES_DIR: &str = "images";

/// Crawl range and output options
#[derive(Debug, Clone, Args)]
pub struct ConsoleArgs {
    /// Number of the first catalog page to crawl
    #[arg(long, default_value_t = 1)]
    pub first: u32,

    /// Number of the last catalog page to crawl (inclusive)
    #[arg(long, default_value_t = 1000)]
    pub last: u32,

    /// Folder for the results: books, images and the JSON file
    #[arg(long, value_name = "DIR", default_value = "dest_folder")]
    pub dest_folder: PathBuf,

    /// Do not download cover images
    #[arg(long)]
    pub skip_imgs: bool,

    /// Do not download book texts
    #[arg(long)]
    pub skip_txt: bool,

    /// Custom path for the JSON file with the results
    #[arg(long, value_name = "FILE")]
    pub json_path: Option<PathBuf>,
}

impl ConsoleArgs {
    /// Checks the page range
    ///
    /// Catalog pages are numbered from 1. A range with `first > last` is
    /// accepted and simply crawls nothing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.first == 0 {
            return Err(ConfigError::Validation(
                "first page must be >= 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Iterates over the configured catalog page numbers
    ///
    /// Both ends are included; the iterator is empty when `first > last`.
    pub fn pages(&self) -> std::ops::RangeInclusive<u32> {
        self.first..=self.last
    }

    pub fn books_dir(&self) -> PathBuf {
        self.dest_folder.join(BOOKS_DIR)
    }

    pub fn images_dir(&self) -> PathBuf {
        self.dest_folder.join(IMAGES_DIR)
    }

    /// Resolves where the JSON document goes
    ///
    /// A custom `--json-path` wins; otherwise the file is named after the
    /// crawled category and placed in the destination folder.
    pub fn resolve_json_path(&self, category_name: &str) -> PathBuf {
        match &self.json_path {
            Some(path) => path.clone(),
            None => Path::new(&self.dest_folder).join(format!("{}.json", category_name)),
        }
    }
}
