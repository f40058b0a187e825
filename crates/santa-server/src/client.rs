//! Client identification for rate limiting.

use std::{convert::Infallible, net::SocketAddr};

use axum::{
  extract::{ConnectInfo, FromRequestParts},
  http::{HeaderMap, request::Parts},
};
use santa_core::Notifier;

use crate::AppState;

/// Key used when no address can be determined.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// The rate-limit key for the current request.
pub struct ClientId(pub String);

/// Resolve the client key from the first `X-Forwarded-For` hop when
/// `trust_forwarded_for` is set, falling back to the peer address.
pub fn identify(
  headers: &HeaderMap,
  peer: Option<SocketAddr>,
  trust_forwarded_for: bool,
) -> String {
  if trust_forwarded_for
    && let Some(forwarded) = headers
      .get("x-forwarded-for")
      .and_then(|v| v.to_str().ok())
      .and_then(|v| v.split(',').next())
      .map(str::trim)
      .filter(|v| !v.is_empty())
  {
    return forwarded.to_owned();
  }
  peer
    .map(|addr| addr.ip().to_string())
    .unwrap_or_else(|| UNKNOWN_CLIENT.to_owned())
}

impl<N> FromRequestParts<AppState<N>> for ClientId
where
  N: Notifier + 'static,
{
  type Rejection = Infallible;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<N>,
  ) -> Result<Self, Self::Rejection> {
    let peer = parts
      .extensions
      .get::<ConnectInfo<SocketAddr>>()
      .map(|ConnectInfo(addr)| *addr);
    Ok(ClientId(identify(&parts.headers, peer, state.config.trust_forwarded_for)))
  }
}
