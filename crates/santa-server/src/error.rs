//! Error types and axum `IntoResponse` implementation.
//!
//! Admission and validation failures describe the caller's own request and
//! are returned as-is. Assignment and notification failures are internal:
//! the cause is logged where it happens and the response carries only
//! [`INTERNAL_MESSAGE`].

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use santa_core::{AdmissionError, AssignmentError, ValidationError};
use serde_json::json;
use thiserror::Error;

pub const INTERNAL_MESSAGE: &str = "Failed to send Secret Santa assignments";

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Admission(#[from] AdmissionError),

  #[error("request body exceeds the size limit")]
  PayloadTooLarge,

  #[error("request body must be a JSON object")]
  MalformedBody,

  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error(transparent)]
  Assignment(#[from] AssignmentError),

  #[error("{failed} of {total} notifications failed")]
  Notification { failed: usize, total: usize },
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    match self {
      Error::Admission(AdmissionError::Unauthorized) => {
        error_body(StatusCode::FORBIDDEN, "Unauthorized")
      }
      Error::Admission(AdmissionError::RateLimited { retry_after }) => {
        let mut res = error_body(StatusCode::TOO_MANY_REQUESTS, "Too many requests");
        let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
        res
          .headers_mut()
          .insert(header::RETRY_AFTER, HeaderValue::from(secs.max(1)));
        res
      }
      Error::PayloadTooLarge => {
        error_body(StatusCode::PAYLOAD_TOO_LARGE, "Request body too large")
      }
      Error::MalformedBody => {
        error_body(StatusCode::BAD_REQUEST, "Request body must be a JSON object")
      }
      Error::Validation(e) => error_body(StatusCode::BAD_REQUEST, &e.to_string()),
      Error::Assignment(_) | Error::Notification { .. } => {
        error_body(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE)
      }
    }
  }
}

fn error_body(status: StatusCode, message: &str) -> Response {
  (status, Json(json!({ "error": message }))).into_response()
}
