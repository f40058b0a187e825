//! `POST /generate`: admit, validate, assign, notify.
//!
//! Body: `{"admin_key": "...", "participants": [{"name": "...", "email": "..."}]}`
//!
//! Pipeline order is rate limit, body read and parse, authorization, validation,
//! assignment, then one notification per assignment. The first failing step
//! decides the response. Participant data lives only for the duration of the
//! call.

use std::sync::Arc;

use axum::{
  Json,
  body::{Body, Bytes},
  extract::{Request, State},
};
use santa_core::{
  Assigner, Assignment, AssignmentError, AssignmentSet, Notifier, ParticipantList, validate,
};
use serde_json::{Value, json};
use tokio::task::JoinSet;
use uuid::Uuid;

use crate::{AppState, MAX_BODY_BYTES, client::ClientId, error::Error};

pub const SUCCESS_MESSAGE: &str = "🎁 Secret Santa emails sent!";

pub async fn handler<N>(
  State(state): State<AppState<N>>,
  ClientId(client): ClientId,
  req: Request,
) -> Result<Json<Value>, Error>
where
  N: Notifier + 'static,
{
  state.gate.throttle(&client)?;

  let body = collect_body(req.into_body()).await?;

  let Value::Object(mut request) =
    serde_json::from_slice::<Value>(&body).map_err(|_| Error::MalformedBody)?
  else {
    return Err(Error::MalformedBody);
  };

  state
    .gate
    .authorize(request.get("admin_key").and_then(Value::as_str))?;

  let participants = request.remove("participants").unwrap_or(Value::Null);
  let list = validate(&participants).inspect_err(|e| {
    tracing::info!(%client, error = %e, "participant list rejected");
  })?;

  let assignments = draw(&state.assigner, &list).inspect_err(|e| {
    tracing::error!(participants = list.len(), error = %e, "assignment failed");
  })?;

  let batch = Uuid::new_v4();
  dispatch(&state.notifier, assignments, batch).await?;

  tracing::info!(%batch, participants = list.len(), "secret santa notifications sent");
  Ok(Json(json!({ "message": SUCCESS_MESSAGE })))
}

/// Read the whole body, refusing anything over [`MAX_BODY_BYTES`].
async fn collect_body(body: Body) -> Result<Bytes, Error> {
  axum::body::to_bytes(body, MAX_BODY_BYTES)
    .await
    .map_err(|_| Error::PayloadTooLarge)
}

/// Run the assigner on a fresh thread-local RNG.
///
/// Kept synchronous so the non-`Send` RNG handle never crosses an await.
fn draw(assigner: &Assigner, list: &ParticipantList) -> Result<AssignmentSet, AssignmentError> {
  assigner.assign(list, &mut rand::thread_rng())
}

/// Send every notice concurrently and wait for all of them.
///
/// Any failure fails the batch; no lock is held while sends are in flight.
async fn dispatch<N>(
  notifier: &Arc<N>,
  assignments: AssignmentSet,
  batch: Uuid,
) -> Result<(), Error>
where
  N: Notifier + 'static,
{
  let total = assignments.len();
  let mut tasks = JoinSet::new();

  for Assignment { giver, receiver } in assignments {
    let notifier = Arc::clone(notifier);
    tasks.spawn(async move {
      notifier
        .send(&giver.email, &giver.name, &receiver.name)
        .await
    });
  }

  let mut failed = 0;
  while let Some(joined) = tasks.join_next().await {
    match joined {
      Ok(Ok(())) => {}
      Ok(Err(e)) => {
        failed += 1;
        tracing::error!(%batch, error = %e, "notification failed");
      }
      Err(e) => {
        failed += 1;
        tracing::error!(%batch, error = %e, "notification task did not complete");
      }
    }
  }

  if failed > 0 {
    return Err(Error::Notification { failed, total });
  }
  Ok(())
}
