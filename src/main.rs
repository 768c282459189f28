//! Tululu-Scraper main entry point
//!
//! This is the command-line interface for the Tululu-Scraper book crawler.

use anyhow::Context as _;
use clap::Parser;
use std::path::PathBuf;
use tululu_scraper::config::{load_config_with_hash, Config};
use tululu_scraper::crawler::crawl;
use tululu_scraper::url::catalog_page_url;
use tululu_scraper::{logging, ConsoleArgs};
use url::Url;

/// Tululu-Scraper: downloads books from an online library
///
/// Walks the catalog pages of one category, saves each book's text and
/// cover, and writes the collected metadata to a JSON file.
#[derive(Parser, Debug)]
#[command(name = "tululu-scraper")]
#[command(version)]
#[command(about = "Downloads books and covers from tululu.org", long_about = None)]
struct Cli {
    #[command(flatten)]
    args: ConsoleArgs,

    /// Path to an optional TOML configuration file
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Give up on a request after this many connection failures
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    max_retries: Option<u32>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show the resolved settings and catalog URLs without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (mut config, config_hash) = match &cli.config {
        Some(path) => {
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("load configuration from {}", path.display()))?;
            (config, Some(hash))
        }
        None => (Config::default(), None),
    };

    if let Some(max_retries) = cli.max_retries {
        config.retry.max_attempts = Some(max_retries);
    }

    logging::init(cli.verbose, cli.quiet, &config.output.log_path)
        .context("initialize logging")?;

    if let (Some(path), Some(hash)) = (&cli.config, &config_hash) {
        tracing::info!(
            "Configuration loaded from {} (hash: {})",
            path.display(),
            hash
        );
    }

    cli.args.validate().context("invalid page range")?;

    if cli.dry_run {
        return handle_dry_run(&config, &cli.args);
    }

    let json_path = crawl(config, cli.args).await.context("crawl failed")?;
    tracing::info!("Done. Results in {}", json_path.display());

    Ok(())
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config, args: &ConsoleArgs) -> anyhow::Result<()> {
    let base_url = Url::parse(&config.site.base_url).context("parse base URL")?;

    println!("=== Tululu-Scraper Dry Run ===\n");

    println!("Site:");
    println!("  Base URL: {}", config.site.base_url);
    println!("  Category: {} ({})", config.site.category_name, config.site.category_path);
    println!("  Download link text: {}", config.site.download_link_text);

    println!("\nUser Agent: {}", config.user_agent.header_value());

    let policy = config.retry.to_policy();
    println!("\nReconnect:");
    println!("  Initial delay: {:?}", policy.initial_delay);
    match policy.max_delay {
        Some(max) => println!("  Max delay: {:?}", max),
        None => println!("  Max delay: unlimited"),
    }
    match policy.max_attempts {
        Some(n) => println!("  Max attempts: {}", n),
        None => println!("  Max attempts: unlimited"),
    }

    println!("\nOutput:");
    println!("  Books: {}", args.books_dir().display());
    if args.skip_txt {
        println!("    (skipped)");
    }
    println!("  Images: {}", args.images_dir().display());
    if args.skip_imgs {
        println!("    (skipped)");
    }
    println!(
        "  JSON: {}",
        args.resolve_json_path(&config.site.category_name).display()
    );
    println!("  Log: {}", config.output.log_path.display());

    let first = catalog_page_url(&base_url, &config.site.category_path, args.first)?;
    let last = catalog_page_url(&base_url, &config.site.category_path, args.last)?;
    println!(
        "\n✓ Would crawl {} catalog pages: {} .. {}",
        args.pages().count(),
        first,
        last
    );

    Ok(())
}
