use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use flowdash::routes::{self, AppState};
use flowdash_config::Config;
use flowdash_core::{Aggregator, FetchLimits, SnapshotCache};

/// Live network dashboard service backed by ntopng.
#[derive(Parser)]
#[command(name = "flowdash", version, about)]
struct Cli {
    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run().await {
        tracing::error!("{err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "flowdash=info",
        1 => "flowdash=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let listen_port = config.listen_port;

    info!(
        "upstream ntopng at {} (interface {})",
        config.base_url()?,
        config.interface
    );

    let client = config.client()?;
    let aggregator = Aggregator::new(client, FetchLimits::default());
    let cache = SnapshotCache::new(aggregator, config.cache_ttl());
    let state = Arc::new(AppState::new(cache, config));

    probe_upstream(&state).await;

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", listen_port)).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, routes::router(state)).await?;
    Ok(())
}

/// One connectivity check at startup. A failure is logged, not fatal —
/// the upstream may simply not be up yet.
async fn probe_upstream(state: &AppState) {
    match state.cache.aggregator().api().interface_data().await {
        Ok(_) => info!("ntopng reachable"),
        Err(err) => warn!("ntopng not reachable yet: {err}"),
    }
}
