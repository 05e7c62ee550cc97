use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use zenoh::key_expr::KeyExpr;
use zenoh_leaderboard::{LocalScoreStore, SessionExt};

/// z_scoreboard - score server for z_tetris
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Key expression prefix
    #[arg(short, long)]
    prefix: Option<KeyExpr<'static>>,

    /// Path to Zenoh config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// JSON file keeping the scores; in memory if absent
    #[arg(short, long)]
    store: Option<PathBuf>,

    /// How often to log request statistics
    #[arg(long, default_value_t = 60_000)]
    stats_interval_ms: u64,
}

#[tokio::main(flavor = "multi_thread", worker_threads = 1)]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt::init();

    let zenoh_config = match &args.config {
        Some(path) => zenoh::Config::from_file(path)
            .map_err(|e| anyhow::anyhow!("Failed to load config file: {}", e))?,
        None => zenoh::Config::default(),
    };

    let session = zenoh::open(zenoh_config)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to open zenoh session: {}", e))?;

    let store = Arc::new(match &args.store {
        Some(path) => LocalScoreStore::open(path),
        None => LocalScoreStore::in_memory(),
    });

    let mut builder = session.declare_score_server(store);
    if let Some(prefix) = args.prefix.clone() {
        builder = builder.prefix(prefix);
    }
    let server = Arc::new(builder.await?);

    println!("=== z_scoreboard ===");
    println!("Prefix: {}", server.prefix());
    match server.store().path() {
        Some(path) => println!("Store: {}", path.display()),
        None => println!("Store: in memory"),
    }
    println!("Scores: {}", server.store().len());
    println!("Press Ctrl-C to stop");
    println!();

    let mut stats_timer =
        tokio::time::interval(Duration::from_millis(args.stats_interval_ms.max(1)));
    // The first tick completes immediately
    stats_timer.tick().await;
    let mut last_total = 0;
    let stats_tracker = server.stats_tracker();

    let runner = server.clone();
    let mut serve_task = tokio::spawn(async move { runner.run().await });

    loop {
        tokio::select! {
            served = &mut serve_task => {
                match served {
                    Ok(Err(e)) => tracing::error!("Score server stopped: {}", e),
                    Ok(Ok(())) => tracing::info!("Score server stopped"),
                    Err(e) => tracing::error!("Score server task failed: {}", e),
                }
                break;
            }
            _ = stats_timer.tick() => {
                let stats = stats_tracker.get_stats();
                if stats.total() != last_total {
                    tracing::info!("{}", stats);
                    last_total = stats.total();
                }
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Interrupted");
                break;
            }
        }
    }

    serve_task.abort();
    println!("{}", server.stats());
    if let Err(e) = server.store().persist() {
        tracing::warn!("Failed to save scores: {}", e);
    }
    println!("Goodbye!");
    Ok(())
}
