use aerobook_core::flight::{Flight, FlightDraft};
use aerobook_core::search::SearchQuery;
use chrono::{NaiveDate, NaiveTime};
use sqlx::PgPool;
use tracing::info;

use crate::error::StoreError;

#[derive(sqlx::FromRow)]
struct FlightRow {
    flight_id: i64,
    airline_name: String,
    source: String,
    destination: String,
    flight_date: NaiveDate,
    departure_time: NaiveTime,
    arrival_time: NaiveTime,
    price: i64,
}

impl From<FlightRow> for Flight {
    fn from(row: FlightRow) -> Self {
        Flight {
            id: row.flight_id,
            airline_name: row.airline_name,
            source: row.source,
            destination: row.destination,
            flight_date: row.flight_date,
            departure_time: row.departure_time,
            arrival_time: row.arrival_time,
            price: row.price,
        }
    }
}

const FLIGHT_COLUMNS: &str = "flight_id, airline_name, source, destination, flight_date, \
                              departure_time, arrival_time, price";

pub struct PgFlightRepository {
    pool: PgPool,
}

impl PgFlightRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, draft: &FlightDraft) -> Result<Flight, StoreError> {
        let row: FlightRow = sqlx::query_as(
            "INSERT INTO flights (airline_name, source, destination, flight_date, departure_time, arrival_time, price) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING flight_id, airline_name, source, destination, flight_date, departure_time, arrival_time, price",
        )
        .bind(&draft.airline_name)
        .bind(&draft.source)
        .bind(&draft.destination)
        .bind(draft.flight_date)
        .bind(draft.departure_time)
        .bind(draft.arrival_time)
        .bind(draft.price)
        .fetch_one(&self.pool)
        .await?;

        info!(flight_id = row.flight_id, "flight created");
        Ok(row.into())
    }

    pub async fn update(&self, flight_id: i64, draft: &FlightDraft) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE flights SET airline_name = $1, source = $2, destination = $3, flight_date = $4, \
             departure_time = $5, arrival_time = $6, price = $7 WHERE flight_id = $8",
        )
        .bind(&draft.airline_name)
        .bind(&draft.source)
        .bind(&draft.destination)
        .bind(draft.flight_date)
        .bind(draft.departure_time)
        .bind(draft.arrival_time)
        .bind(draft.price)
        .bind(flight_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::FlightNotFound(flight_id));
        }
        Ok(())
    }

    /// Deleting a flight cascades to its bookings at the schema level.
    pub async fn delete(&self, flight_id: i64) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM flights WHERE flight_id = $1")
            .bind(flight_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::FlightNotFound(flight_id));
        }
        info!(flight_id, "flight deleted");
        Ok(())
    }

    pub async fn get(&self, flight_id: i64) -> Result<Option<Flight>, StoreError> {
        let row: Option<FlightRow> =
            sqlx::query_as(&format!("SELECT {FLIGHT_COLUMNS} FROM flights WHERE flight_id = $1"))
                .bind(flight_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(Into::into))
    }

    pub async fn list(&self) -> Result<Vec<Flight>, StoreError> {
        let rows: Vec<FlightRow> =
            sqlx::query_as(&format!("SELECT {FLIGHT_COLUMNS} FROM flights ORDER BY flight_id"))
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Route-and-date search against the one canonical `flight_date` column.
    /// Schema drift is a loud store error, not something to probe around.
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<Flight>, StoreError> {
        let rows: Vec<FlightRow> = sqlx::query_as(&format!(
            "SELECT {FLIGHT_COLUMNS} FROM flights \
             WHERE source = $1 AND destination = $2 AND flight_date = $3 \
             ORDER BY departure_time",
        ))
        .bind(&query.source)
        .bind(&query.destination)
        .bind(query.date)
        .fetch_all(&self.pool)
        .await?;

        info!(
            source = %query.source,
            destination = %query.destination,
            date = %query.date,
            matches = rows.len(),
            "flight search"
        );
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
