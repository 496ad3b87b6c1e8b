//! Entry point for the Meeting Cost Engine binary.
//!
//! Running this binary starts an HTTP server exposing the cost model
//! and meeting aggregator.  The rate profile directory, bind address
//! and default region are read from `MEETING_COST_*` environment
//! variables (see [`meeting_cost_engine::config`]).  Log filtering
//! follows `RUST_LOG`.

use meeting_cost_engine::config::ServerConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("meeting_cost_engine=info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = ServerConfig::from_env();
    tracing::info!(rates_dir = %config.rates_dir.display(), "starting meeting cost engine");
    if let Err(err) = meeting_cost_engine::api::serve(&config).await {
        tracing::error!(error = %err, "error running server");
        std::process::exit(1);
    }
}
