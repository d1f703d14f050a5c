use aerobook_core::booking::{Booking, BookingError, BookingStore, SeatAssignment};
use aerobook_core::seat::SeatId;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{info, warn};

use crate::error::StoreError;

#[derive(sqlx::FromRow)]
struct BookingRow {
    booking_id: i64,
    flight_id: i64,
    passenger_name: String,
    age: i32,
    email: String,
    seat_number: String,
    payment_status: String,
    booking_time: DateTime<Utc>,
}

impl TryFrom<BookingRow> for Booking {
    type Error = StoreError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let seat = row
            .seat_number
            .parse()
            .map_err(|e| StoreError::Decode(format!("booking {}: {e}", row.booking_id)))?;
        let payment_status = row
            .payment_status
            .parse()
            .map_err(|e| StoreError::Decode(format!("booking {}: {e}", row.booking_id)))?;
        Ok(Booking {
            id: row.booking_id,
            flight_id: row.flight_id,
            passenger_name: row.passenger_name,
            age: row.age,
            email: row.email,
            seat,
            payment_status,
            booking_time: row.booking_time,
        })
    }
}

pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn booked_seats(&self, flight_id: i64) -> Result<Vec<SeatId>, StoreError> {
        let seats: Vec<String> =
            sqlx::query_scalar("SELECT seat_number FROM bookings WHERE flight_id = $1")
                .bind(flight_id)
                .fetch_all(&self.pool)
                .await?;

        seats
            .iter()
            .map(|s| {
                s.parse()
                    .map_err(|e| StoreError::Decode(format!("flight {flight_id}: {e}")))
            })
            .collect()
    }

    /// The booking transaction: check-then-insert per seat, in input order,
    /// inside one transaction. The first seat found taken aborts the whole
    /// call (seats after it are never checked) and rolls back every insert
    /// already made. The unique (flight_id, seat_number) constraint backs
    /// the pre-check, so a racing insert surfaces as the same conflict.
    pub async fn book_seats(
        &self,
        flight_id: i64,
        assignments: &[SeatAssignment],
        email: &str,
    ) -> Result<Vec<i64>, StoreError> {
        let mut tx = self.pool.begin().await?;
        let mut booking_ids = Vec::with_capacity(assignments.len());

        for assignment in assignments {
            let seat = assignment.seat;
            let taken: Option<i32> =
                sqlx::query_scalar("SELECT 1 FROM bookings WHERE flight_id = $1 AND seat_number = $2")
                    .bind(flight_id)
                    .bind(seat.to_string())
                    .fetch_optional(&mut *tx)
                    .await?;

            if taken.is_some() {
                tx.rollback().await?;
                warn!(flight_id, %seat, "seat conflict, transaction rolled back");
                return Err(StoreError::SeatTaken { seat });
            }

            let inserted: Result<i64, sqlx::Error> = sqlx::query_scalar(
                "INSERT INTO bookings (flight_id, passenger_name, age, email, seat_number, payment_status) \
                 VALUES ($1, $2, $3, $4, $5, $6) RETURNING booking_id",
            )
            .bind(flight_id)
            .bind(&assignment.passenger_name)
            .bind(assignment.age)
            .bind(email)
            .bind(seat.to_string())
            .bind("PAID")
            .fetch_one(&mut *tx)
            .await;

            match inserted {
                Ok(id) => booking_ids.push(id),
                Err(err) if StoreError::is_unique_violation(&err) => {
                    tx.rollback().await?;
                    warn!(flight_id, %seat, "unique constraint hit, transaction rolled back");
                    return Err(StoreError::SeatTaken { seat });
                }
                Err(err) => {
                    tx.rollback().await?;
                    return Err(err.into());
                }
            }
        }

        tx.commit().await?;
        info!(flight_id, count = booking_ids.len(), "bookings committed");
        Ok(booking_ids)
    }

    pub async fn bookings_for_flight(&self, flight_id: i64) -> Result<Vec<Booking>, StoreError> {
        let rows: Vec<BookingRow> = sqlx::query_as(
            "SELECT booking_id, flight_id, passenger_name, age, email, seat_number, payment_status, booking_time \
             FROM bookings WHERE flight_id = $1 ORDER BY booking_id",
        )
        .bind(flight_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    /// Deletes a booking by id, scoped to the given email when one is
    /// supplied. Returns the number of rows removed; zero means no such
    /// booking, or the email did not match.
    pub async fn cancel_booking(
        &self,
        booking_id: i64,
        email: Option<&str>,
    ) -> Result<u64, StoreError> {
        let result = match email {
            Some(email) => {
                sqlx::query("DELETE FROM bookings WHERE booking_id = $1 AND email = $2")
                    .bind(booking_id)
                    .bind(email)
                    .execute(&self.pool)
                    .await?
            }
            None => {
                sqlx::query("DELETE FROM bookings WHERE booking_id = $1")
                    .bind(booking_id)
                    .execute(&self.pool)
                    .await?
            }
        };

        let removed = result.rows_affected();
        info!(booking_id, removed, "cancellation attempted");
        Ok(removed)
    }
}

#[async_trait]
impl BookingStore for PgBookingRepository {
    async fn booked_seats(&self, flight_id: i64) -> Result<Vec<SeatId>, BookingError> {
        PgBookingRepository::booked_seats(self, flight_id)
            .await
            .map_err(Into::into)
    }

    async fn book_seats(
        &self,
        flight_id: i64,
        assignments: &[SeatAssignment],
        email: &str,
    ) -> Result<Vec<i64>, BookingError> {
        PgBookingRepository::book_seats(self, flight_id, assignments, email)
            .await
            .map_err(Into::into)
    }
}
