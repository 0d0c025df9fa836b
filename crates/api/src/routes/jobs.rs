//! Job submission endpoint.
//!
//! `POST /jobs` accepts a multipart upload, stages the file on disk,
//! creates the pending job record, and hands dispatch off to a background
//! task. Progress is observed separately over `GET /ws/jobs/{job_id}`.

use std::path::Path;

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use tokio::io::AsyncWriteExt;

use linemill_core::{retry_store, JobId};
use linemill_pipeline::{dispatch_job, STORE_RETRY};

use crate::error::{AppError, AppResult};
use crate::response::JobCreated;
use crate::state::AppState;

/// File extensions accepted for job input.
const ALLOWED_EXTENSIONS: [&str; 2] = ["txt", "log"];

pub fn router() -> Router<AppState> {
    Router::new().route("/jobs", post(create_job))
}

/// POST /jobs
///
/// Validation failures create no state. Once the pending record exists
/// the client gets a job id immediately; line counting and fan-out run in
/// a spawned task so a slow disk never blocks the response.
async fn create_job(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<JobCreated>)> {
    let mut field = loop {
        match multipart
            .next_field()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?
        {
            Some(candidate) if candidate.file_name().is_some() => break candidate,
            Some(_) => continue,
            None => return Err(AppError::BadRequest("no file in upload".into())),
        }
    };

    let file_name = field
        .file_name()
        .unwrap_or_default()
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .to_string();
    if !allowed_file_name(&file_name) {
        return Err(AppError::Validation("Unsupported file type".into()));
    }

    let job_id: JobId = uuid::Uuid::new_v4();
    let path = state.config.upload_dir.join(format!("{job_id}_{file_name}"));

    // Stream the upload to disk chunk-wise; large files never buffer whole.
    let mut file = tokio::fs::File::create(&path)
        .await
        .map_err(|e| AppError::Internal(format!("failed to stage upload: {e}")))?;
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        file.write_all(&chunk)
            .await
            .map_err(|e| AppError::Internal(format!("failed to stage upload: {e}")))?;
    }
    file.flush()
        .await
        .map_err(|e| AppError::Internal(format!("failed to stage upload: {e}")))?;

    retry_store(&STORE_RETRY, || state.store.create_job(job_id, &file_name)).await?;
    tracing::info!(job_id = %job_id, file_name = %file_name, "job created");

    let store = state.store.clone();
    let queue = state.queue.clone();
    tokio::spawn(async move {
        if let Err(err) = dispatch_job(store.as_ref(), &queue, job_id, &path).await {
            tracing::error!(job_id = %job_id, error = %err, "dispatch failed");
        }
    });

    Ok((
        StatusCode::CREATED,
        Json(JobCreated {
            job_id,
            message: "Job created successfully. Check progress via WebSocket.",
        }),
    ))
}

/// Whether the submitted file name carries an allow-listed extension.
fn allowed_file_name(file_name: &str) -> bool {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn txt_and_log_files_are_allowed() {
        assert!(allowed_file_name("server.log"));
        assert!(allowed_file_name("notes.txt"));
        assert!(allowed_file_name("REPORT.TXT"));
    }

    #[test]
    fn other_extensions_are_rejected() {
        assert!(!allowed_file_name("payload.pdf"));
        assert!(!allowed_file_name("script.sh"));
        assert!(!allowed_file_name("noextension"));
        assert!(!allowed_file_name(""));
    }
}
