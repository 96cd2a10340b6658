use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use serde::Deserialize;
use tokio::sync::mpsc::UnboundedReceiver;

use blog_feed::blog::BlogViewState;
use blog_feed::config::{Config, ControllerConfig};
use blog_feed::controller::BlogController;
use blog_feed::logging::init_tracing;
use blog_feed::model::BlogPost;
use blog_feed::preferences::FilePreferences;
use blog_feed::query::InMemoryQuerySource;
use blog_feed::session::{AuthToken, SessionManager};

#[derive(Parser)]
#[command(name = "blog-feed")]
#[command(about = "Drive the blog list controller and print every snapshot", long_about = None)]
struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(long)]
    config: Option<PathBuf>,

    /// TOML file with `[[posts]]` entries; a generated sample is used otherwise
    #[arg(long)]
    fixture: Option<PathBuf>,

    /// Search text; without it the initial unfiltered list is loaded
    #[arg(short, long)]
    query: Option<String>,

    /// How many additional pages to load after the first
    #[arg(short, long, default_value_t = 1)]
    pages: u32,

    /// Session token handed to the query source
    #[arg(long, default_value = "demo-token")]
    token: String,

    /// Run without a session token
    #[arg(long)]
    anonymous: bool,

    /// Simulated query latency in milliseconds
    #[arg(long, default_value_t = 0)]
    latency_ms: u64,
}

#[derive(Deserialize)]
struct Fixture {
    posts: Vec<BlogPost>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let config = Config::load_from(&config_path)
        .with_context(|| format!("loading config from {}", config_path.display()))?;
    let preferences = FilePreferences::load_from(&config.preferences_path(&config_path))?;

    let posts = match &cli.fixture {
        Some(path) => load_fixture(path)?,
        None => sample_posts(23),
    };
    let source = InMemoryQuerySource::new(posts)
        .with_page_size(config.feed.page_size)
        .with_latency(Duration::from_millis(cli.latency_ms));

    let session = SessionManager::new();
    if !cli.anonymous {
        session.login(AuthToken::new(None, cli.token.clone()));
    }

    let mut controller = BlogController::new(
        Arc::new(source),
        Arc::new(session),
        Arc::new(preferences),
        ControllerConfig::from(&config.feed),
    );
    let mut snapshots = controller.subscribe();

    match cli.query {
        Some(query) => controller.load_first_page(query),
        None => {
            controller.load_initial_blogs();
        }
    }
    controller.run_until_idle().await;
    print_snapshots(&mut snapshots)?;

    for _ in 0..cli.pages {
        if !controller.load_next_page() {
            break;
        }
        controller.run_until_idle().await;
        print_snapshots(&mut snapshots)?;
    }

    controller.cancel_requests();
    controller.run_until_idle().await;
    print_snapshots(&mut snapshots)?;

    Ok(())
}

fn print_snapshots(snapshots: &mut UnboundedReceiver<BlogViewState>) -> anyhow::Result<()> {
    while let Ok(snapshot) = snapshots.try_recv() {
        println!("{}", serde_json::to_string(&snapshot)?);
    }
    Ok(())
}

fn load_fixture(path: &Path) -> anyhow::Result<Vec<BlogPost>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading fixture {}", path.display()))?;
    let fixture: Fixture = toml::from_str(&content)
        .with_context(|| format!("parsing fixture {}", path.display()))?;
    Ok(fixture.posts)
}

fn sample_posts(count: u32) -> Vec<BlogPost> {
    const AUTHORS: [&str; 4] = ["mitch", "ana", "jo", "sam"];
    (1..=count)
        .map(|pk| BlogPost {
            pk,
            title: format!("Post number {pk}"),
            slug: format!("post-number-{pk}"),
            body: format!("Body of post {pk}"),
            image: format!("https://example.com/images/{pk}.png"),
            date_updated: 1_700_000_000_000 + i64::from(pk) * 60_000,
            username: AUTHORS[pk as usize % AUTHORS.len()].to_string(),
        })
        .collect()
}
