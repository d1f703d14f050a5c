use std::collections::HashSet;

use aerobook_core::flight::Flight;
use aerobook_core::pricing::{self, BUSINESS_CLASS_PRICE};
use aerobook_core::search::{FlightSearchRequest, SearchQuery};
use aerobook_core::seat::{SeatId, SeatPosition, CABIN_ROWS};
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/flights/search", post(search_flights))
        .route("/v1/flights/{flight_id}/seats", get(seat_map))
}

async fn search_flights(
    State(state): State<AppState>,
    Json(req): Json<FlightSearchRequest>,
) -> Result<Json<Vec<Flight>>, AppError> {
    let query = SearchQuery::parse(&req)?;
    let flights = state.flights.search(&query).await?;
    Ok(Json(flights))
}

#[derive(Debug, serde::Serialize)]
pub struct SeatMapSeat {
    pub seat: SeatId,
    pub booked: bool,
    pub business: bool,
    pub position: SeatPosition,
    pub price: i64,
}

#[derive(Debug, serde::Serialize)]
pub struct SeatMapResponse {
    pub flight_id: i64,
    pub base_price: i64,
    pub business_class_price: i64,
    pub rows: Vec<Vec<SeatMapSeat>>,
}

async fn seat_map(
    State(state): State<AppState>,
    Path(flight_id): Path<i64>,
) -> Result<Json<SeatMapResponse>, AppError> {
    let flight = state
        .flights
        .get(flight_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("flight {flight_id} not found")))?;
    let booked: HashSet<SeatId> = state
        .bookings
        .booked_seats(flight_id)
        .await?
        .into_iter()
        .collect();

    Ok(Json(build_seat_map(&flight, &booked)))
}

/// Projects the fixed cabin grid against a flight: every seat with its
/// booked flag and the price the pricing engine would charge for it.
fn build_seat_map(flight: &Flight, booked: &HashSet<SeatId>) -> SeatMapResponse {
    let mut rows: Vec<Vec<SeatMapSeat>> = (0..CABIN_ROWS).map(|_| Vec::new()).collect();
    for seat in SeatId::all() {
        rows[seat.row() as usize - 1].push(SeatMapSeat {
            seat,
            booked: booked.contains(&seat),
            business: seat.is_business(),
            position: seat.position(),
            price: pricing::seat_price(seat, flight.price),
        });
    }
    SeatMapResponse {
        flight_id: flight.id,
        base_price: flight.price,
        business_class_price: BUSINESS_CLASS_PRICE,
        rows,
    }
}
