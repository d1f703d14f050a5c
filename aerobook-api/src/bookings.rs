use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use serde_json::json;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/bookings/cancel", post(cancel_booking))
}

#[derive(Debug, Deserialize)]
struct CancelRequest {
    booking_id: i64,
    /// Optional; when present the deletion is scoped to this email.
    #[serde(default)]
    email: Option<String>,
}

async fn cancel_booking(
    State(state): State<AppState>,
    Json(req): Json<CancelRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let email = req
        .email
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty());

    let removed = state.bookings.cancel_booking(req.booking_id, email).await?;
    if removed == 0 {
        return Err(AppError::NotFound(
            "booking not found or email doesn't match".into(),
        ));
    }
    Ok(Json(json!({ "cancelled": true, "booking_id": req.booking_id })))
}
