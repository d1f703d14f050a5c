use aerobook_core::booking::Booking;
use aerobook_core::flight::{Flight, FlightDraft, FlightForm};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::json;

use crate::error::AppError;
use crate::state::AppState;

/// Flight management, the service-side of the admin dashboard.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/admin/flights", get(list_flights))
        .route("/v1/admin/flights", post(add_flight))
        .route("/v1/admin/flights/{flight_id}", put(edit_flight))
        .route("/v1/admin/flights/{flight_id}", delete(remove_flight))
        .route("/v1/admin/flights/{flight_id}/bookings", get(flight_bookings))
}

async fn list_flights(State(state): State<AppState>) -> Result<Json<Vec<Flight>>, AppError> {
    Ok(Json(state.flights.list().await?))
}

async fn add_flight(
    State(state): State<AppState>,
    Json(form): Json<FlightForm>,
) -> Result<(StatusCode, Json<Flight>), AppError> {
    let draft = FlightDraft::parse(&form)?;
    let flight = state.flights.create(&draft).await?;
    Ok((StatusCode::CREATED, Json(flight)))
}

async fn edit_flight(
    State(state): State<AppState>,
    Path(flight_id): Path<i64>,
    Json(form): Json<FlightForm>,
) -> Result<Json<serde_json::Value>, AppError> {
    let draft = FlightDraft::parse(&form)?;
    state.flights.update(flight_id, &draft).await?;
    Ok(Json(json!({ "updated": true, "flight_id": flight_id })))
}

async fn remove_flight(
    State(state): State<AppState>,
    Path(flight_id): Path<i64>,
) -> Result<Json<serde_json::Value>, AppError> {
    state.flights.delete(flight_id).await?;
    Ok(Json(json!({ "deleted": true, "flight_id": flight_id })))
}

async fn flight_bookings(
    State(state): State<AppState>,
    Path(flight_id): Path<i64>,
) -> Result<Json<Vec<Booking>>, AppError> {
    Ok(Json(state.bookings.bookings_for_flight(flight_id).await?))
}
