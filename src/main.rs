use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::fs::{self, OpenOptions};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use newsdeck::sources::{MediastackSource, NewsApiSource};
use newsdeck::viewer::{self, BrowserApp};
use newsdeck::{ArticleFeed, BookmarkStore, Category, Config, LoadOutcome, SearchHistory, Summarizer};

#[derive(Parser)]
#[command(name = "newsdeck")]
#[command(about = "Browse top headlines in your terminal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive browser (default)
    Browse {
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        query: Option<String>,
    },
    /// Print headlines without the interactive browser
    Headlines {
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        query: Option<String>,
        #[arg(short, long, default_value_t = 1)]
        pages: u32,
        #[arg(long)]
        json: bool,
    },
    Bookmarks {
        #[command(subcommand)]
        action: BookmarkAction,
    },
    History {
        #[command(subcommand)]
        action: HistoryAction,
    },
    /// Summarize a bookmarked article
    Summarize { url: String },
}

#[derive(Subcommand)]
enum BookmarkAction {
    List {
        #[arg(long)]
        json: bool,
    },
    Remove { url: String },
}

#[derive(Subcommand)]
enum HistoryAction {
    List,
    Remove { term: String },
}

fn parse_category(value: Option<&str>) -> Result<Category> {
    match value {
        None => Ok(Category::All),
        Some(v) => Category::parse(v).ok_or_else(|| {
            let known: Vec<_> = Category::ALL.iter().map(|c| c.label().to_lowercase()).collect();
            anyhow!("unknown category '{}', expected one of: {}", v, known.join(", "))
        }),
    }
}

fn build_feed(config: &Config) -> Result<ArticleFeed> {
    let primary = NewsApiSource::new(config).context("Failed to create primary news source")?;
    let secondary =
        MediastackSource::new(config).context("Failed to create fallback news source")?;
    Ok(ArticleFeed::new(
        Arc::new(primary),
        Arc::new(secondary),
        config.page_size,
    ))
}

/// Logs go to a file while the browser owns the terminal, stderr otherwise.
fn init_logging(config: &Config, to_file: bool) -> Result<()> {
    let filter = EnvFilter::try_from_env("NEWSDECK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    if to_file {
        fs::create_dir_all(&config.data_dir)
            .with_context(|| format!("Failed to create data directory {}", config.data_dir.display()))?;
        let log_file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(config.log_file())
            .context("Failed to open log file")?;
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Arc::new(log_file))
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env();
    let command = cli.command.unwrap_or(Commands::Browse {
        category: None,
        query: None,
    });

    init_logging(&config, matches!(command, Commands::Browse { .. }))?;

    match command {
        Commands::Browse { category, query } => {
            let category = parse_category(category.as_deref())?;
            let feed = build_feed(&config)?;
            let summarizer = Summarizer::new(&config).context("Failed to create summarizer")?;
            let mut app = BrowserApp::new(
                feed,
                BookmarkStore::open(&config.data_dir),
                SearchHistory::open(&config.data_dir),
                Arc::new(summarizer),
                tokio::runtime::Handle::current(),
            );
            app.apply_query(category, query.as_deref().unwrap_or(""));

            // The browser blocks on terminal input, so keep it off the async workers.
            tokio::task::spawn_blocking(move || viewer::run_browser(app))
                .await
                .context("Browser thread panicked")??;
        }
        Commands::Headlines {
            category,
            query,
            pages,
            json,
        } => {
            let category = parse_category(category.as_deref())?;
            let mut feed = build_feed(&config)?;
            feed.reset_epoch(category.wire_value(), query.as_deref().unwrap_or("").trim());

            for _ in 0..pages.max(1) {
                if let LoadOutcome::Loaded { is_end: true, .. } = feed.load_next_page().await {
                    break;
                }
                if !feed.advance_page() {
                    break;
                }
            }

            if json {
                println!("{}", serde_json::to_string_pretty(feed.articles())?);
            } else if feed.articles().is_empty() {
                println!("No results.");
            } else {
                for (i, article) in feed.articles().iter().enumerate() {
                    println!("{:>3}. {}", i + 1, article.title);
                    println!("     {} · {}", article.display_source(), article.display_date());
                    println!("     {}", article.url);
                }
                if feed.is_end() {
                    println!("You've seen all the news.");
                }
            }
        }
        Commands::Bookmarks { action } => {
            let mut bookmarks = BookmarkStore::open(&config.data_dir);
            match action {
                BookmarkAction::List { json } => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(bookmarks.list())?);
                    } else if bookmarks.is_empty() {
                        println!("No bookmarked news yet.");
                    } else {
                        for article in bookmarks.list() {
                            println!("★ {}", article.title);
                            println!("  {}", article.url);
                        }
                    }
                }
                BookmarkAction::Remove { url } => {
                    if bookmarks.remove(&url) {
                        println!("Removed {}", url);
                    } else {
                        eprintln!("Not bookmarked: {}", url);
                    }
                }
            }
        }
        Commands::History { action } => {
            let mut history = SearchHistory::open(&config.data_dir);
            match action {
                HistoryAction::List => {
                    for (i, term) in history.entries().iter().enumerate() {
                        println!("{:>2}. {}", i + 1, term);
                    }
                }
                HistoryAction::Remove { term } => {
                    if history.remove(&term) {
                        println!("Removed '{}'", term);
                    } else {
                        eprintln!("Not in history: {}", term);
                    }
                }
            }
        }
        Commands::Summarize { url } => {
            let bookmarks = BookmarkStore::open(&config.data_dir);
            let article = bookmarks
                .get(&url)
                .ok_or_else(|| anyhow!("Article not bookmarked: {}. Bookmark it in the browser first.", url))?;
            let summarizer = Summarizer::new(&config).context("Failed to create summarizer")?;

            match summarizer.summarize(article).await {
                Some(summary) => println!("{}", summary),
                None => eprintln!("No summary available."),
            }
        }
    }

    Ok(())
}
