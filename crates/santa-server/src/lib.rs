//! HTTP layer for the Secret Santa service.
//!
//! Exposes an axum [`Router`] with the landing page and the `/generate`
//! endpoint, backed by any [`Notifier`].

pub mod client;
pub mod error;
pub mod handlers;
pub mod mailer;

pub use error::Error;

use std::{path::Path, sync::Arc, time::Duration};

use axum::{
  Router,
  routing::{get, post},
};
use santa_core::{
  AdmissionGate, Assigner, Notifier,
  admission::{AdminSecret, RateLimitPolicy},
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use handlers::{generate, index};

/// Largest accepted request body.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `SANTA_*` environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:                    String,
  pub port:                    u16,
  /// Expected shared secret. Absent or empty rejects every request.
  #[serde(default)]
  pub admin_key:               Option<String>,
  #[serde(default)]
  pub from_email:              Option<String>,
  #[serde(default)]
  pub sendgrid_api_key:        Option<String>,
  pub sendgrid_api_url:        String,
  /// Log notifications instead of sending them.
  pub dry_run:                 bool,
  pub rate_limit_window_secs:  u64,
  pub rate_limit_max_requests: usize,
  pub max_assignment_attempts: u32,
  /// Key rate limiting on the first `X-Forwarded-For` entry.
  pub trust_forwarded_for:     bool,
}

impl ServerConfig {
  /// Read `path` (optional) overlaid with `SANTA_*` environment variables.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    let cfg: Self = config::Config::builder()
      .set_default("host", "0.0.0.0")?
      .set_default("port", 5000)?
      .set_default("sendgrid_api_url", santa_sendgrid::DEFAULT_API_URL)?
      .set_default("dry_run", false)?
      .set_default("rate_limit_window_secs", 60)?
      .set_default("rate_limit_max_requests", 5)?
      .set_default(
        "max_assignment_attempts",
        i64::from(santa_core::assign::DEFAULT_MAX_ATTEMPTS),
      )?
      .set_default("trust_forwarded_for", false)?
      .add_source(config::File::from(path.to_path_buf()).required(false))
      .add_source(config::Environment::with_prefix("SANTA"))
      .build()?
      .try_deserialize()?;

    if cfg.rate_limit_window_secs == 0 {
      return Err(config::ConfigError::Message(
        "rate_limit_window_secs must be greater than zero".into(),
      ));
    }
    Ok(cfg)
  }

  pub fn rate_limit_policy(&self) -> RateLimitPolicy {
    RateLimitPolicy {
      window:       Duration::from_secs(self.rate_limit_window_secs),
      max_requests: self.rate_limit_max_requests,
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<N: Notifier> {
  pub notifier: Arc<N>,
  pub gate:     Arc<AdmissionGate>,
  pub assigner: Assigner,
  pub config:   Arc<ServerConfig>,
}

impl<N: Notifier> AppState<N> {
  /// Build fresh state: an empty rate-limit table and the configured secret.
  pub fn new(config: ServerConfig, notifier: Arc<N>) -> Self {
    let gate = AdmissionGate::new(
      AdminSecret::new(config.admin_key.as_deref()),
      config.rate_limit_policy(),
    );
    Self {
      notifier,
      gate: Arc::new(gate),
      assigner: Assigner::new(config.max_assignment_attempts),
      config: Arc::new(config),
    }
  }
}

impl<N: Notifier> Clone for AppState<N> {
  fn clone(&self) -> Self {
    Self {
      notifier: Arc::clone(&self.notifier),
      gate:     Arc::clone(&self.gate),
      assigner: self.assigner,
      config:   Arc::clone(&self.config),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build an axum [`Router`] for the Secret Santa server.
///
/// Serve it with `into_make_service_with_connect_info::<SocketAddr>()` so
/// the rate limiter can key on the peer address.
pub fn router<N>(state: AppState<N>) -> Router
where
  N: Notifier + 'static,
{
  Router::new()
    .route("/",         get(index::handler))
    .route("/generate", post(generate::handler::<N>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
