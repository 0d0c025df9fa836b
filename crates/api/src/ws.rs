//! WebSocket streaming of job progress.
//!
//! One connection observes one job. The server pushes a JSON snapshot
//! once per second until the job reaches a terminal status (server
//! closes) or the client disconnects (loop abandoned).

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use linemill_core::{JobId, ProgressSnapshot};
use linemill_pipeline::ProgressReader;

use crate::state::AppState;

/// GET /ws/jobs/{job_id}: upgrade and start streaming.
pub async fn job_progress(
    ws: WebSocketUpgrade,
    Path(job_id): Path<JobId>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| stream_progress(socket, state, job_id))
}

/// Manage one progress stream after upgrade.
///
/// The polling loop runs as its own task feeding a channel; a sender task
/// forwards snapshots to the socket sink, and the current task watches
/// the inbound half for the client going away. Dropping the channel
/// receiver is what stops the polling loop on disconnect.
async fn stream_progress(socket: WebSocket, state: AppState, job_id: JobId) {
    tracing::info!(job_id = %job_id, "progress stream connected");

    let reader = ProgressReader::new(state.store.clone(), state.cache.clone());
    let (tx, mut rx) = mpsc::channel::<ProgressSnapshot>(8);

    let reader_task = tokio::spawn(async move { reader.stream(job_id, tx).await });

    let (mut sink, mut inbound) = socket.split();

    let mut send_task = tokio::spawn(async move {
        while let Some(snapshot) = rx.recv().await {
            let payload = match serde_json::to_string(&snapshot) {
                Ok(payload) => payload,
                Err(err) => {
                    tracing::error!(error = %err, "failed to encode snapshot");
                    break;
                }
            };
            if sink.send(Message::Text(payload.into())).await.is_err() {
                return;
            }
        }
        // Polling loop finished: the job is terminal. Close our side.
        let _ = sink.send(Message::Close(None)).await;
    });

    loop {
        tokio::select! {
            _ = &mut send_task => break,
            message = inbound.next() => match message {
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }

    send_task.abort();
    reader_task.abort();
    tracing::info!(job_id = %job_id, "progress stream closed");
}
