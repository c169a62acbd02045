//! Tweet Pulse - Push Server
//!
//! This server provides:
//! 1. Static file serving for the chart page and its WASM bundle
//! 2. The `/ws/tweets` push channel, fed by one shared value generator

use axum::{http::Method, routing::get, Router};
use clap::Parser;
use pulse_common::live::TWEETS_PATH;
use std::{net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
};

mod feed;
mod live;

use feed::{Feed, FeedConfig};

// ── CLI Arguments ──────────────────────────────────────────────────────────────

fn default_static_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("web")
}

#[derive(Parser, Debug, Clone)]
#[command(name = "pulse-server", about = "Tweet Pulse Push Server")]
pub struct Args {
    /// Debug mode
    #[arg(long)]
    pub debug: bool,

    /// Port to listen on
    #[arg(long, default_value_t = 3080)]
    pub port: u16,

    /// Directory served for every path other than the push channel
    #[arg(long, default_value_os_t = default_static_dir())]
    pub static_dir: PathBuf,

    /// Milliseconds between pushed values
    #[arg(long, default_value_t = 1000)]
    pub interval_ms: u64,

    /// Smallest pushed value
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub min: i64,

    /// Largest pushed value
    #[arg(long, default_value_t = 20, allow_negative_numbers = true)]
    pub max: i64,

    /// Require `loadstream` + `startstream` before a connection receives values
    #[arg(long)]
    pub manual_start: bool,
}

impl Args {
    pub fn feed_config(&self) -> anyhow::Result<FeedConfig> {
        FeedConfig::new(Duration::from_millis(self.interval_ms), self.min, self.max)
    }
}

// ── Application State ──────────────────────────────────────────────────────────

pub struct AppStateInner {
    /// CLI arguments
    pub args: Args,

    /// Value group every connection subscribes to
    pub feed: Feed,
}

pub struct AppState(Arc<AppStateInner>);

impl AppState {
    pub fn new(args: Args) -> anyhow::Result<Self> {
        let feed = Feed::spawn(args.feed_config()?);
        Ok(Self(Arc::new(AppStateInner { args, feed })))
    }
}

impl std::ops::Deref for AppState {
    type Target = AppStateInner;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Clone for AppState {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route(TWEETS_PATH, get(live::tweets_ws))
        .fallback_service(ServeDir::new(&state.args.static_dir))
        .with_state(state)
        .layer(cors)
}

// ── Main ───────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let filter = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    log::info!("Tweet Pulse server starting...");
    log::info!("Static Dir: {:?}", args.static_dir);
    log::info!(
        "Feed: every {} ms in {}..={}{}",
        args.interval_ms,
        args.min,
        args.max,
        if args.manual_start { " (manual start)" } else { "" }
    );

    let port = args.port;
    let state = AppState::new(args)?;
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    log::info!("Listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let args = Args::try_parse_from(["pulse-server"]).unwrap();
        assert_eq!(args.port, 3080);
        assert_eq!(args.interval_ms, 1000);
        assert_eq!((args.min, args.max), (0, 20));
        assert!(!args.manual_start);
        assert!(args.static_dir.ends_with("web"));
        assert!(args.feed_config().is_ok());
    }

    #[test]
    fn test_negative_range() {
        let args =
            Args::try_parse_from(["pulse-server", "--min", "-5", "--max", "-1", "--manual-start"])
                .unwrap();
        assert_eq!((args.min, args.max), (-5, -1));
        assert!(args.manual_start);

        let bad = Args::try_parse_from(["pulse-server", "--min", "3", "--max", "2"]).unwrap();
        assert!(bad.feed_config().is_err());
    }

    #[tokio::test]
    async fn test_state_joins_feed() {
        let args = Args::try_parse_from(["pulse-server", "--interval-ms", "5"]).unwrap();
        let state = AppState::new(args).unwrap();
        let mut rx = state.feed.subscribe();
        let value = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .unwrap()
            .unwrap();
        assert!((0. ..=20.).contains(&value));
        let _app = router(state.clone());
    }
}
