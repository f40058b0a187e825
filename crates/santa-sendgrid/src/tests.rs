//! Tests for `SendGridNotifier` against an in-process stub of the mail API.

use std::sync::{Arc, Mutex};

use axum::{
  Json, Router,
  extract::State,
  http::{HeaderMap, StatusCode, header},
  routing::post,
};
use santa_core::Notifier;
use serde_json::Value;
use tokio::net::TcpListener;

use crate::{Error, SendGridConfig, SendGridNotifier, client::MailSend};

#[derive(Clone, Default)]
struct Captured {
  requests: Arc<Mutex<Vec<(Option<String>, Value)>>>,
}

/// Serve a stub `/v3/mail/send` that records requests and answers `status`.
async fn stub(status: StatusCode) -> (String, Captured) {
  let captured = Captured::default();
  let app = Router::new()
    .route(
      "/v3/mail/send",
      post(
        move |State(c): State<Captured>, headers: HeaderMap, Json(body): Json<Value>| async move {
          let auth = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
          c.requests.lock().unwrap().push((auth, body));
          (status, "stub response")
        },
      ),
    )
    .with_state(captured.clone());

  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  tokio::spawn(async move {
    axum::serve(listener, app).await.unwrap();
  });
  (format!("http://{addr}"), captured)
}

fn notifier(api_url: String) -> SendGridNotifier {
  SendGridNotifier::new(SendGridConfig {
    api_url,
    api_key:    "SG.test-key".into(),
    from_email: "santa@north.pole".into(),
  })
  .unwrap()
}

#[tokio::test]
async fn sends_plain_text_mail() {
  let (url, captured) = stub(StatusCode::ACCEPTED).await;

  notifier(url).send("alice@x.com", "Alice", "Bob").await.unwrap();

  let requests = captured.requests.lock().unwrap();
  assert_eq!(requests.len(), 1);
  let (auth, body) = &requests[0];
  assert_eq!(auth.as_deref(), Some("Bearer SG.test-key"));
  assert_eq!(body["personalizations"][0]["to"][0]["email"], "alice@x.com");
  assert_eq!(body["from"]["email"], "santa@north.pole");
  assert_eq!(body["subject"], santa_core::notify::SUBJECT);
  assert_eq!(body["content"][0]["type"], "text/plain");
  let text = body["content"][0]["value"].as_str().unwrap();
  assert!(text.contains("Hi Alice,"), "{text}");
  assert!(text.contains("Secret Santa for: Bob"), "{text}");
}

#[tokio::test]
async fn trailing_slash_in_base_url_is_tolerated() {
  let (url, captured) = stub(StatusCode::ACCEPTED).await;
  notifier(format!("{url}/")).send("a@x.com", "A", "B").await.unwrap();
  assert_eq!(captured.requests.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn non_success_status_is_rejected() {
  let (url, _captured) = stub(StatusCode::UNAUTHORIZED).await;

  let err = notifier(url).send("alice@x.com", "Alice", "Bob").await.unwrap_err();
  match err {
    Error::Rejected { status, body } => {
      assert_eq!(status, 401);
      assert_eq!(body, "stub response");
    }
    other => panic!("unexpected error: {other}"),
  }
}

#[tokio::test]
async fn unreachable_host_is_http_error() {
  // Bind and immediately drop to get a port nothing listens on.
  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let addr = listener.local_addr().unwrap();
  drop(listener);

  let err = notifier(format!("http://{addr}"))
    .send("alice@x.com", "Alice", "Bob")
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Http(_)), "{err}");
}

#[test]
fn payload_shape() {
  let message = santa_core::notify::compose("Carol", "Alice");
  let payload = MailSend::new("santa@north.pole", "carol@x.com", &message);
  let json = serde_json::to_value(&payload).unwrap();

  assert_eq!(json["personalizations"].as_array().unwrap().len(), 1);
  assert_eq!(json["personalizations"][0]["to"][0]["email"], "carol@x.com");
  assert_eq!(json["content"][0]["value"], message.body.as_str());
}

#[test]
fn debug_redacts_api_key() {
  let printed = format!("{:?}", notifier("http://localhost".into()));
  assert!(!printed.contains("SG.test-key"), "{printed}");
}
