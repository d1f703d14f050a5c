use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult};

/// A flight as stored. Immutable once booked against; the id is assigned by
/// the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    pub id: i64,
    pub airline_name: String,
    pub source: String,
    pub destination: String,
    pub flight_date: NaiveDate,
    pub departure_time: NaiveTime,
    pub arrival_time: NaiveTime,
    /// Base price per seat in whole currency units.
    pub price: i64,
}

/// Raw admin form input, validated into a [`FlightDraft`].
#[derive(Debug, Clone, Deserialize)]
pub struct FlightForm {
    pub airline_name: String,
    pub source: String,
    pub destination: String,
    pub flight_date: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub price: String,
}

/// A validated flight waiting for a store-assigned id.
#[derive(Debug, Clone, PartialEq)]
pub struct FlightDraft {
    pub airline_name: String,
    pub source: String,
    pub destination: String,
    pub flight_date: NaiveDate,
    pub departure_time: NaiveTime,
    pub arrival_time: NaiveTime,
    pub price: i64,
}

impl FlightDraft {
    pub fn parse(form: &FlightForm) -> CoreResult<Self> {
        let airline_name = form.airline_name.trim();
        let source = form.source.trim();
        let destination = form.destination.trim();
        let flight_date = form.flight_date.trim();
        let departure_time = form.departure_time.trim();
        let arrival_time = form.arrival_time.trim();
        let price = form.price.trim();

        if airline_name.is_empty()
            || source.is_empty()
            || destination.is_empty()
            || flight_date.is_empty()
            || departure_time.is_empty()
            || arrival_time.is_empty()
            || price.is_empty()
        {
            return Err(CoreError::Validation("all fields are required".into()));
        }

        let flight_date = NaiveDate::parse_from_str(flight_date, "%Y-%m-%d")
            .map_err(|_| CoreError::Validation("invalid date format, use YYYY-MM-DD".into()))?;
        let departure_time = parse_time(departure_time)?;
        let arrival_time = parse_time(arrival_time)?;
        let price: i64 = price
            .parse()
            .map_err(|_| CoreError::Validation("invalid price format".into()))?;
        if price < 0 {
            return Err(CoreError::Validation("price cannot be negative".into()));
        }

        Ok(Self {
            airline_name: airline_name.to_string(),
            source: source.to_string(),
            destination: destination.to_string(),
            flight_date,
            departure_time,
            arrival_time,
            price,
        })
    }
}

fn parse_time(s: &str) -> CoreResult<NaiveTime> {
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|_| CoreError::Validation("invalid time format, use HH:MM".into()))
}
