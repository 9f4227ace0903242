//! `gallery-cli` -- infinite-scroll image gallery in the terminal.
//!
//! Reads search text and commands from stdin, pages results through the
//! shared query cache and prints each newly loaded batch.
//!
//! # Environment variables
//!
//! | Variable                      | Required | Default                    | Description                        |
//! |-------------------------------|----------|----------------------------|------------------------------------|
//! | `GALLERY_API_URL`             | no       | `https://pixabay.com/api`  | Image search endpoint              |
//! | `GALLERY_API_KEY`             | no       | --                         | Sent as the `key` query parameter  |
//! | `GALLERY_API_TOKEN`           | no       | --                         | Bearer token for non-Pixabay hosts |
//! | `GALLERY_DETAIL_ENDPOINT`     | no       | `query`                    | `query` (`?id=`) or `path`         |
//! | `GALLERY_REQUEST_TIMEOUT_SECS`| no       | `10`                       | Per-request deadline               |
//! | `GALLERY_PAGE_SIZE`           | no       | `20`                       | Items per page, clamped to 10..=50 |

use std::sync::Arc;

use gallery_cache::config::CacheConfig;
use gallery_cache::detail_cache::DetailCache;
use gallery_cache::feed::Feed;
use gallery_cache::query_cache::QueryCache;
use gallery_cache::snapshot::Snapshot;
use gallery_cli::command::{parse_line, Command};
use gallery_cli::debounce::{debounce, SEARCH_DEBOUNCE};
use gallery_cli::render;
use gallery_client::config::ApiConfig;
use gallery_client::fetcher::PageFetcher;
use gallery_core::query::{SearchQuery, DEFAULT_PAGE_SIZE};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Buffered lines between the stdin reader and the main loop.
const INPUT_CAPACITY: usize = 32;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gallery_cli=info,gallery_client=info,gallery_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = ApiConfig::from_env().unwrap_or_else(|e| {
        tracing::error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    });

    let page_size: u32 = std::env::var("GALLERY_PAGE_SIZE")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_PAGE_SIZE);

    tracing::info!(
        base_url = %config.base_url,
        page_size,
        timeout_secs = config.request_timeout.as_secs(),
        "Starting gallery-cli",
    );

    let fetcher = PageFetcher::from_config(config).unwrap_or_else(|e| {
        tracing::error!(error = %e, "Failed to build HTTP client");
        std::process::exit(1);
    });
    let source = Arc::new(fetcher);
    let cache_config = CacheConfig::default();
    let queries = Arc::new(QueryCache::new(Arc::clone(&source), cache_config.clone()));
    let details = DetailCache::new(source, cache_config);
    let mut feed = Feed::new(queries);

    let (search_tx, search_rx) = mpsc::channel(INPUT_CAPACITY);
    let (command_tx, mut command_rx) = mpsc::channel(INPUT_CAPACITY);
    let mut searches = debounce(search_rx, SEARCH_DEBOUNCE);

    tokio::spawn(read_input(search_tx, command_tx));

    // Popular images until the first search arrives.
    let mut shown = show(feed.set_query(SearchQuery::new("", page_size)).await, 0);

    loop {
        tokio::select! {
            Some(text) = searches.recv() => {
                let snapshot = feed.set_query(SearchQuery::new(&text, page_size)).await;
                shown = show(snapshot, 0);
            }
            command = command_rx.recv() => match command {
                Some(Command::More) => {
                    let snapshot = feed.on_sentinel(true).await;
                    shown = show(snapshot, shown);
                }
                Some(Command::Retry) => {
                    let snapshot = feed.retry().await;
                    shown = show(snapshot, shown);
                }
                Some(Command::Show(id)) => match details.get(id).await {
                    Ok(image) => print!("{}", render::render_detail(&image)),
                    Err(e) => {
                        report_failure(&e);
                        println!("Could not load image #{id}: {e}");
                    }
                },
                // Searches never reach this channel.
                Some(Command::Search(_)) => {}
                Some(Command::Quit) | None => break,
            },
        }
    }

    tracing::info!("Shutting down");
}

/// Print what changed and return how many items are now on screen.
fn show(snapshot: &Snapshot, shown: usize) -> usize {
    print!("{}", render::render_feed(snapshot, shown));
    if let Some(error) = &snapshot.error {
        report_failure(error);
    }
    snapshot.items.len()
}

fn report_failure(error: &gallery_core::error::FetchFailure) {
    if error.is_unauthorized() {
        tracing::warn!("API rejected credentials, re-authentication required");
    }
}

/// Forward stdin lines: search text to the debouncer, everything else to
/// the command channel. Closing stdin ends the session.
async fn read_input(search_tx: mpsc::Sender<String>, command_tx: mpsc::Sender<Command>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::error!(error = %e, "Failed to read stdin");
                break;
            }
        };

        let sent = match parse_line(&line) {
            Ok(Command::Search(text)) => search_tx.send(text).await.is_ok(),
            Ok(command) => command_tx.send(command).await.is_ok(),
            Err(e) => {
                println!("{e}");
                true
            }
        };
        if !sent {
            break;
        }
    }
    let _ = command_tx.send(Command::Quit).await;
}
