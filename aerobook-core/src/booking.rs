use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::seat::SeatId;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Payment state of a booking row. The simulated gateway only ever produces
/// `Paid`; the enum exists so the column stays an enum at the edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Paid,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentStatus::Paid => f.write_str("PAID"),
        }
    }
}

impl FromStr for PaymentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PAID" => Ok(PaymentStatus::Paid),
            other => Err(format!("unknown payment status {other:?}")),
        }
    }
}

/// A persisted booking row. Insert-only; removed only by cancellation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    pub flight_id: i64,
    pub passenger_name: String,
    pub age: i32,
    pub email: String,
    pub seat: SeatId,
    pub payment_status: PaymentStatus,
    pub booking_time: DateTime<Utc>,
}

/// One seat plus the passenger it is being booked for. The order of
/// assignments handed to the store is the order seats are checked, inserted
/// and reported back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatAssignment {
    pub seat: SeatId,
    pub passenger_name: String,
    pub age: i32,
}

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("seat {seat} is already booked")]
    SeatTaken { seat: SeatId },
    #[error("store error: {0}")]
    Store(#[source] BoxError),
}

impl BookingError {
    pub fn store(err: impl Into<BoxError>) -> Self {
        BookingError::Store(err.into())
    }
}

/// Seam between the checkout flow and the persistence layer. The Postgres
/// implementation lives in the store crate; tests use an in-memory one.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Seats already booked for the flight, for the session's cache.
    async fn booked_seats(&self, flight_id: i64) -> Result<Vec<SeatId>, BookingError>;

    /// Atomically reserves every listed seat, in list order, inside one
    /// transaction. First conflict aborts the whole call with the offending
    /// seat; success returns the store-assigned booking ids in input order.
    async fn book_seats(
        &self,
        flight_id: i64,
        assignments: &[SeatAssignment],
        email: &str,
    ) -> Result<Vec<i64>, BookingError>;
}
