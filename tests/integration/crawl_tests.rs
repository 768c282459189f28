//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for the library site and run the
//! full catalog → book page → downloads → JSON cycle end-to-end.

use std::path::Path;
use std::time::Duration;
use tempfile::TempDir;
use tululu_scraper::config::Config;
use tululu_scraper::crawler::{crawl, Coordinator, HttpClient, RetryPolicy};
use tululu_scraper::{ConsoleArgs, ScraperError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str) -> Config {
    let mut config = Config::default();
    config.site.base_url = format!("{}/", base_url);
    config.site.category_name = "Test Category".to_string();
    config.retry.initial_delay_ms = 1;
    config.retry.max_attempts = Some(2);
    config
}

fn create_test_args(dest: &Path, first: u32, last: u32) -> ConsoleArgs {
    ConsoleArgs {
        first,
        last,
        dest_folder: dest.to_path_buf(),
        skip_imgs: false,
        skip_txt: false,
        json_path: None,
    }
}

fn catalog_html(book_ids: &[u64]) -> String {
    let entries: String = book_ids
        .iter()
        .map(|id| {
            format!(
                r#"<table class="d_book"><tr><td><a href="/b{id}/"><img src="/shots/{id}.jpg"></a></td></tr>
                <tr><td><a href="/b{id}/">Book {id}</a></td></tr></table>"#
            )
        })
        .collect();
    format!("<html><body><div id=\"content\">{}</div></body></html>", entries)
}

fn book_html(id: u64, title: &str, author: &str, comments: &[&str]) -> String {
    let comments: String = comments
        .iter()
        .map(|c| format!(r#"<div class="texts"><b>Reader</b><span class="black">{}</span></div>"#, c))
        .collect();

    format!(
        r#"<html><body><div id="content">
        <h1>{title} &nbsp;::&nbsp; {author}</h1>
        <div class="bookimage"><a href="/b{id}/"><img src="/shots/{id}.jpg"></a></div>
        <table class="d_book"><tr><td><a href="/txt.php?id={id}">скачать txt</a></td></tr></table>
        <span class="d_book"><b>Жанр книги:</b> <a href="/l55/">Научная фантастика</a></span>
        {comments}
        </div></body></html>"#
    )
}

async fn mount_catalog(server: &MockServer, page: u32, book_ids: &[u64]) {
    Mock::given(method("GET"))
        .and(path(format!("/l55/{}", page)))
        .respond_with(ResponseTemplate::new(200).set_body_string(catalog_html(book_ids)))
        .mount(server)
        .await;
}

async fn mount_book_page(server: &MockServer, id: u64, title: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/b{}/", id)))
        .respond_with(ResponseTemplate::new(200).set_body_string(book_html(
            id,
            title,
            "Author",
            &["Nice"],
        )))
        .mount(server)
        .await;
}

async fn mount_text(server: &MockServer, id: u64, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path("/txt.php"))
        .and(query_param("id", id.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!("text of book {}", id)))
        .expect(expected_calls)
        .mount(server)
        .await;
}

async fn mount_image(server: &MockServer, id: u64, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/shots/{}.jpg", id)))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xFF, 0xD8, id as u8]))
        .expect(expected_calls)
        .mount(server)
        .await;
}

/// Mounts a fully working book: page, text and cover
async fn mount_book(server: &MockServer, id: u64, title: &str) {
    mount_book_page(server, id, title).await;
    mount_text(server, id, 1).await;
    mount_image(server, id, 1).await;
}

fn read_json(path: &Path) -> Vec<serde_json::Value> {
    let content = std::fs::read_to_string(path).expect("JSON file missing");
    serde_json::from_str(&content).expect("Invalid JSON")
}

fn titles(books: &[serde_json::Value]) -> Vec<String> {
    books
        .iter()
        .map(|b| b["title"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_full_crawl_collects_books_and_assets() {
    let mock_server = MockServer::start().await;
    mount_catalog(&mock_server, 1, &[1, 2]).await;
    mount_book(&mock_server, 1, "Dune").await;
    mount_book(&mock_server, 2, "Solaris").await;

    let dest = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri());
    let args = create_test_args(dest.path(), 1, 1);

    let json_path = crawl(config, args).await.expect("Crawl failed");
    assert_eq!(json_path, dest.path().join("Test Category.json"));

    let books = read_json(&json_path);
    assert_eq!(titles(&books), vec!["Dune", "Solaris"]);

    let dune = &books[0];
    assert_eq!(dune["author"], "Author");
    assert_eq!(dune["image_url"], format!("{}/shots/1.jpg", mock_server.uri()));
    assert_eq!(dune["book_link"], format!("{}/txt.php?id=1", mock_server.uri()));
    assert_eq!(dune["comments"], serde_json::json!(["Nice"]));
    assert_eq!(dune["genres"], serde_json::json!(["Научная фантастика"]));

    let text_path = dest.path().join("books").join("1. Dune.txt");
    assert_eq!(dune["book_path"], text_path.to_str().unwrap());
    assert_eq!(std::fs::read_to_string(&text_path).unwrap(), "text of book 1");

    let image_path = dest.path().join("images").join("1.jpg");
    assert_eq!(dune["img_src"], image_path.to_str().unwrap());
    assert_eq!(std::fs::read(&image_path).unwrap(), vec![0xFF, 0xD8, 1]);
}

#[tokio::test]
async fn test_empty_catalog_writes_empty_array() {
    let mock_server = MockServer::start().await;
    mount_catalog(&mock_server, 1, &[]).await;
    mount_catalog(&mock_server, 2, &[]).await;

    let dest = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri());
    let args = create_test_args(dest.path(), 1, 2);

    let json_path = crawl(config, args).await.expect("Crawl failed");

    assert_eq!(std::fs::read_to_string(&json_path).unwrap(), "[]");
    assert!(dest.path().join("books").is_dir());
    assert!(dest.path().join("images").is_dir());
}

#[tokio::test]
async fn test_missing_book_page_is_skipped() {
    let mock_server = MockServer::start().await;
    mount_catalog(&mock_server, 1, &[1, 2]).await;

    Mock::given(method("GET"))
        .and(path("/b1/"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_text(&mock_server, 1, 0).await;
    mount_book(&mock_server, 2, "Solaris").await;

    let dest = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri());
    let mut coordinator =
        Coordinator::new(config, create_test_args(dest.path(), 1, 1)).expect("Coordinator setup");

    let books = coordinator.run().await.expect("Crawl failed");

    assert_eq!(books.len(), 1);
    assert_eq!(books[0].title, "Solaris");
    assert_eq!(coordinator.stats().books_saved, 1);
    assert_eq!(coordinator.stats().books_skipped, 1);
}

#[tokio::test]
async fn test_redirected_book_page_is_skipped() {
    let mock_server = MockServer::start().await;
    mount_catalog(&mock_server, 1, &[1, 2]).await;

    // The site sends unknown books back to its home page
    Mock::given(method("GET"))
        .and(path("/b1/"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/"))
        .mount(&mock_server)
        .await;
    mount_book(&mock_server, 2, "Solaris").await;

    let dest = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri());
    let mut coordinator =
        Coordinator::new(config, create_test_args(dest.path(), 1, 1)).expect("Coordinator setup");

    let books = coordinator.run().await.expect("Crawl failed");
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].title, "Solaris");
}

#[tokio::test]
async fn test_book_without_download_link_is_skipped() {
    let mock_server = MockServer::start().await;
    mount_catalog(&mock_server, 1, &[1, 2]).await;

    Mock::given(method("GET"))
        .and(path("/b1/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<h1>No Text :: Nobody</h1><div class="bookimage"><img src="/shots/1.jpg"></div>"#,
        ))
        .mount(&mock_server)
        .await;
    mount_image(&mock_server, 1, 0).await;
    mount_book(&mock_server, 2, "Solaris").await;

    let dest = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri());
    let json_path = crawl(config, create_test_args(dest.path(), 1, 1))
        .await
        .expect("Crawl failed");

    assert_eq!(titles(&read_json(&json_path)), vec!["Solaris"]);
}

#[tokio::test]
async fn test_failed_catalog_page_is_skipped() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/l55/1"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_catalog(&mock_server, 2, &[3]).await;
    mount_book(&mock_server, 3, "Roadside Picnic").await;

    let dest = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri());
    let mut coordinator =
        Coordinator::new(config, create_test_args(dest.path(), 1, 2)).expect("Coordinator setup");

    let books = coordinator.run().await.expect("Crawl failed");

    assert_eq!(books.len(), 1);
    assert_eq!(books[0].title, "Roadside Picnic");
    assert_eq!(coordinator.stats().pages_skipped, 1);
    assert_eq!(coordinator.stats().pages_fetched, 1);
}

#[tokio::test]
async fn test_text_download_failure_discards_book() {
    let mock_server = MockServer::start().await;
    mount_catalog(&mock_server, 1, &[1, 2]).await;

    mount_book_page(&mock_server, 1, "Lost Text").await;
    Mock::given(method("GET"))
        .and(path("/txt.php"))
        .and(query_param("id", "1"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", "/"))
        .mount(&mock_server)
        .await;
    mount_image(&mock_server, 1, 0).await;
    mount_book(&mock_server, 2, "Solaris").await;

    let dest = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri());
    let mut coordinator = Coordinator::new(config, create_test_args(dest.path(), 1, 1))
        .expect("Coordinator setup");
    let books = coordinator.run().await.expect("Crawl failed");

    let saved: Vec<&str> = books.iter().map(|b| b.title.as_str()).collect();
    assert_eq!(saved, vec!["Solaris"]);

    let stats = coordinator.stats();
    assert_eq!(stats.texts_failed, 1);
    assert_eq!(stats.texts_downloaded, 1);
    assert_eq!(stats.books_skipped, 1);
}

#[tokio::test]
async fn test_image_download_failure_keeps_book() {
    let mock_server = MockServer::start().await;
    mount_catalog(&mock_server, 1, &[1]).await;

    mount_book_page(&mock_server, 1, "No Cover").await;
    mount_text(&mock_server, 1, 1).await;
    Mock::given(method("GET"))
        .and(path("/shots/1.jpg"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let dest = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri());
    let mut coordinator =
        Coordinator::new(config, create_test_args(dest.path(), 1, 1)).expect("Coordinator setup");

    let books = coordinator.run().await.expect("Crawl failed");

    assert_eq!(books.len(), 1);
    assert_eq!(books[0].img_src, None);
    assert_eq!(
        books[0].book_path,
        Some(dest.path().join("books").join("1. No Cover.txt"))
    );
    assert_eq!(coordinator.stats().images_failed, 1);
}

#[tokio::test]
async fn test_skip_imgs_leaves_text_paths_unchanged() {
    let mock_server = MockServer::start().await;
    mount_catalog(&mock_server, 1, &[1]).await;
    mount_book_page(&mock_server, 1, "Dune").await;
    mount_text(&mock_server, 1, 2).await;
    mount_image(&mock_server, 1, 1).await;

    let dest = TempDir::new().unwrap();

    let with_images = Coordinator::new(
        create_test_config(&mock_server.uri()),
        create_test_args(dest.path(), 1, 1),
    )
    .expect("Coordinator setup")
    .run()
    .await
    .expect("Crawl failed");

    let mut args = create_test_args(dest.path(), 1, 1);
    args.skip_imgs = true;
    let without_images = Coordinator::new(create_test_config(&mock_server.uri()), args)
        .expect("Coordinator setup")
        .run()
        .await
        .expect("Crawl failed");

    assert!(with_images[0].img_src.is_some());
    assert_eq!(without_images[0].img_src, None);
    assert_eq!(without_images[0].book_path, with_images[0].book_path);
}

#[tokio::test]
async fn test_skip_txt_downloads_only_covers() {
    let mock_server = MockServer::start().await;
    mount_catalog(&mock_server, 1, &[1]).await;
    mount_book_page(&mock_server, 1, "Dune").await;
    mount_text(&mock_server, 1, 0).await;
    mount_image(&mock_server, 1, 1).await;

    let dest = TempDir::new().unwrap();
    let mut args = create_test_args(dest.path(), 1, 1);
    args.skip_txt = true;

    let json_path = crawl(create_test_config(&mock_server.uri()), args)
        .await
        .expect("Crawl failed");

    let books = read_json(&json_path);
    assert_eq!(books.len(), 1);
    assert!(books[0].get("book_path").is_none());
    assert!(books[0].get("img_src").is_some());
}

#[tokio::test]
async fn test_custom_json_path() {
    let mock_server = MockServer::start().await;
    mount_catalog(&mock_server, 1, &[]).await;

    let dest = TempDir::new().unwrap();
    let custom = dest.path().join("exports").join("scifi.json");
    let mut args = create_test_args(dest.path(), 1, 1);
    args.json_path = Some(custom.clone());

    let json_path = crawl(create_test_config(&mock_server.uri()), args)
        .await
        .expect("Crawl failed");

    assert_eq!(json_path, custom);
    assert!(custom.exists());
    assert!(!dest.path().join("Test Category.json").exists());
}

#[tokio::test]
async fn test_unreachable_site_does_not_abort_crawl() {
    // Bind then drop to get a port nothing listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let dest = TempDir::new().unwrap();
    let config = create_test_config(&format!("http://127.0.0.1:{}", port));
    let client = HttpClient::new(
        reqwest::Client::new(),
        RetryPolicy {
            initial_delay: Duration::from_millis(1),
            max_delay: None,
            max_attempts: Some(2),
        },
    );

    let mut coordinator =
        Coordinator::with_client(config, create_test_args(dest.path(), 1, 2), client)
            .expect("Coordinator setup");
    let books = coordinator.run().await.expect("Crawl failed");

    assert!(books.is_empty());
    assert_eq!(coordinator.stats().pages_skipped, 2);
}

#[tokio::test]
async fn test_empty_page_range_writes_empty_array() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let dest = TempDir::new().unwrap();
    let config = create_test_config(&mock_server.uri());
    let json_path = crawl(config, create_test_args(dest.path(), 5, 2))
        .await
        .expect("Crawl failed");

    assert!(read_json(&json_path).is_empty());
    assert_eq!(std::fs::read_to_string(&json_path).unwrap(), "[]");
}

#[tokio::test]
async fn test_page_zero_is_rejected() {
    let dest = TempDir::new().unwrap();
    let result = Coordinator::new(
        create_test_config("http://127.0.0.1:1"),
        create_test_args(dest.path(), 0, 2),
    );
    assert!(result.is_err());
}

#[tokio::test]
async fn test_filesystem_error_aborts_crawl() {
    let mock_server = MockServer::start().await;
    mount_catalog(&mock_server, 1, &[1, 2]).await;
    mount_book_page(&mock_server, 1, "Dune").await;
    mount_text(&mock_server, 1, 1).await;
    mount_image(&mock_server, 1, 0).await;
    Mock::given(method("GET"))
        .and(path("/b2/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    // A directory where the text file should go makes the write fail
    let dest = TempDir::new().unwrap();
    std::fs::create_dir_all(dest.path().join("books").join("1. Dune.txt")).unwrap();

    let config = create_test_config(&mock_server.uri());
    let json_path = create_test_args(dest.path(), 1, 1).resolve_json_path("Test Category");
    let result = crawl(config, create_test_args(dest.path(), 1, 1)).await;

    assert!(matches!(result, Err(ScraperError::Filesystem { .. })));
    assert!(!json_path.exists());
}
