use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::error::AppError;
use crate::state::SharedState;
use crate::submission::{fields, parser};

#[derive(Debug, Serialize)]
pub struct SubmitAck {
    pub status: &'static str,
    pub message: &'static str,
}

pub async fn submit(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<Json<SubmitAck>, AppError> {
    let data = parser::parse_body(&body).map_err(|e| {
        tracing::debug!("Rejected submission: {e}");
        AppError::BadRequest(e)
    })?;

    let outcome = state.store.append(fields::to_row(data)).await?;

    tracing::debug!(
        path = %state.store.path().display(),
        rows = outcome.rows,
        columns = outcome.columns,
        "Submission stored"
    );

    Ok(Json(SubmitAck {
        status: "success",
        message: "Data saved",
    }))
}
