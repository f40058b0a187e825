//! santa-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`) overlaid with
//! `SANTA_*` environment variables, then serves the landing page and the
//! `/generate` endpoint over HTTP.
//!
//! # Local testing without mail credentials
//!
//! ```sh
//! SANTA_ADMIN_KEY=secret cargo run -p santa-server -- --dry-run
//! ```

use std::{net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};

use anyhow::Context as _;
use clap::Parser;
use santa_core::AdmissionGate;
use santa_server::{AppState, ServerConfig, mailer::Mailer};
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Secret Santa assignment server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Log notifications instead of sending email.
  #[arg(long)]
  dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let mut server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;
  server_cfg.dry_run |= cli.dry_run;

  if server_cfg.admin_key.as_deref().is_none_or(str::is_empty) {
    tracing::warn!("admin_key is not configured; every generate request will be rejected");
  }
  if server_cfg.dry_run {
    tracing::warn!("dry run: notifications will be logged, not sent");
  }

  let mailer = Mailer::from_config(&server_cfg).context("failed to configure notifier")?;

  // Build application state.
  let state = AppState::new(server_cfg.clone(), Arc::new(mailer));
  spawn_rate_limit_housekeeping(
    Arc::clone(&state.gate),
    server_cfg.rate_limit_policy().window,
  );

  let app = santa_server::router(state);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  Ok(())
}

/// Once per window, forget clients whose history has fully expired.
fn spawn_rate_limit_housekeeping(gate: Arc<AdmissionGate>, every: Duration) {
  tokio::spawn(async move {
    let mut ticker = tokio::time::interval(every);
    loop {
      ticker.tick().await;
      let purged = gate.limiter().purge_idle();
      if purged > 0 {
        tracing::debug!(purged, "dropped idle rate-limit entries");
      }
    }
  });
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(error = %e, "failed to listen for shutdown signal");
    std::future::pending::<()>().await;
  }
  tracing::info!("shutting down");
}
