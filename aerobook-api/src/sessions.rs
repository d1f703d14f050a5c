use aerobook_core::checkout::{self, CheckoutOutcome, PassengerForm, PaymentMethod};
use aerobook_core::flight::Flight;
use aerobook_core::pricing::Quote;
use aerobook_core::seat::SeatId;
use aerobook_core::session::{BookingSession, Screen};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/sessions", post(create_session))
        .route("/v1/sessions/{session_id}", get(get_session))
        .route("/v1/sessions/{session_id}", delete(finish_session))
        .route("/v1/sessions/{session_id}/seats", post(toggle_seat))
        .route("/v1/sessions/{session_id}/quote", get(get_quote))
        .route("/v1/sessions/{session_id}/checkout", post(checkout_session))
        .route("/v1/sessions/{session_id}/reset", post(reset_session))
}

#[derive(Debug, Deserialize)]
struct CreateSessionRequest {
    flight_id: i64,
}

#[derive(Debug, Serialize)]
struct CreateSessionResponse {
    session_id: Uuid,
    screen: Screen,
}

/// Starts a booking flow: snapshots the chosen flight, loads the
/// booked-seats cache and moves the flow to seat selection.
async fn create_session(
    State(state): State<AppState>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<CreateSessionResponse>), AppError> {
    let flight = state
        .flights
        .get(req.flight_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("flight {} not found", req.flight_id)))?;
    let booked = state.bookings.booked_seats(req.flight_id).await?;

    let session_id = Uuid::new_v4();
    let mut session = BookingSession::new();
    session.set_flight(flight, booked);
    // The registry is the navigation host; screen switches are surfaced as
    // trace events against the session handle.
    session.on_navigate(move |screen| info!(%session_id, %screen, "navigate"));
    session.navigate(Screen::SeatSelection);

    state.sessions.insert(session_id, session).await;
    Ok((
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            session_id,
            screen: Screen::SeatSelection,
        }),
    ))
}

#[derive(Debug, Deserialize)]
struct ToggleSeatRequest {
    seat: String,
    selected: bool,
}

#[derive(Debug, Serialize)]
struct SelectionResponse {
    selected_seats: Vec<SeatId>,
    count: usize,
}

async fn toggle_seat(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<ToggleSeatRequest>,
) -> Result<Json<SelectionResponse>, AppError> {
    let seat: SeatId = req
        .seat
        .parse()
        .map_err(|e: aerobook_core::seat::ParseSeatError| AppError::Validation(e.to_string()))?;

    let mut sessions = state.sessions.write().await;
    let session = sessions
        .get_mut(&session_id)
        .ok_or_else(|| session_not_found(session_id))?;

    if req.selected {
        session.select_seat(seat);
    } else {
        session.deselect_seat(seat);
    }

    let selected_seats: Vec<SeatId> = session.selected_seats().iter().copied().collect();
    let count = selected_seats.len();
    Ok(Json(SelectionResponse { selected_seats, count }))
}

async fn get_quote(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Quote>, AppError> {
    let sessions = state.sessions.read().await;
    let session = sessions
        .get(&session_id)
        .ok_or_else(|| session_not_found(session_id))?;
    let flight = session
        .flight()
        .ok_or_else(|| AppError::Validation("no flight selected".into()))?;

    let quote = Quote::for_seats(session.selected_seats().iter().copied(), flight.price);
    Ok(Json(quote))
}

#[derive(Debug, Deserialize)]
struct CheckoutRequest {
    passengers: Vec<PassengerForm>,
    email: String,
    #[serde(default)]
    payment_method: PaymentMethod,
}

async fn checkout_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<CheckoutRequest>,
) -> Result<Response, AppError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions
        .get_mut(&session_id)
        .ok_or_else(|| session_not_found(session_id))?;

    let outcome = checkout::process_payment(
        session,
        state.bookings.as_ref(),
        &req.passengers,
        &req.email,
        req.payment_method,
    )
    .await?;

    let response = match outcome {
        CheckoutOutcome::Confirmed { booking_ids, total } => (
            StatusCode::OK,
            Json(json!({
                "status": "CONFIRMED",
                "booking_ids": booking_ids,
                "total": total,
                "screen": Screen::Confirmation,
            })),
        ),
        CheckoutOutcome::SeatConflict { seat } => (
            StatusCode::CONFLICT,
            Json(json!({
                "status": "SEAT_CONFLICT",
                "seat": seat,
                "screen": Screen::SeatSelection,
                "error": format!("seat {seat} was just booked, select different seats"),
            })),
        ),
    };
    Ok(response.into_response())
}

/// The confirmation screen's "New Search": keeps the flow alive but clears
/// selection, ids and contact details.
async fn reset_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions
        .get_mut(&session_id)
        .ok_or_else(|| session_not_found(session_id))?;

    session.reset_for_new_search();
    session.navigate(Screen::Search);
    Ok(Json(json!({ "screen": Screen::Search })))
}

#[derive(Debug, Serialize)]
struct SessionView {
    session_id: Uuid,
    screen: Option<Screen>,
    flight: Option<Flight>,
    booked_seats: Vec<SeatId>,
    selected_seats: Vec<SeatId>,
    passenger_name: Option<String>,
    passenger_email: Option<String>,
    booking_ids: Vec<i64>,
    total_price: i64,
}

async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    let sessions = state.sessions.read().await;
    let session = sessions
        .get(&session_id)
        .ok_or_else(|| session_not_found(session_id))?;

    let mut booked_seats: Vec<SeatId> = session.booked_seats().iter().copied().collect();
    booked_seats.sort();

    Ok(Json(SessionView {
        session_id,
        screen: session.current_screen(),
        flight: session.flight().cloned(),
        booked_seats,
        selected_seats: session.selected_seats().iter().copied().collect(),
        passenger_name: session.passenger_name().map(String::from),
        passenger_email: session.passenger_email().map(String::from),
        booking_ids: session.booking_ids().to_vec(),
        total_price: session.total_price(),
    }))
}

/// The confirmation screen's "Finish": the flow is over, drop the session.
async fn finish_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state
        .sessions
        .remove(&session_id)
        .await
        .ok_or_else(|| session_not_found(session_id))?;
    info!(%session_id, "session finished");
    Ok(StatusCode::NO_CONTENT)
}

fn session_not_found(session_id: Uuid) -> AppError {
    AppError::NotFound(format!("session {session_id} not found"))
}
