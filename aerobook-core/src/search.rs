use chrono::NaiveDate;
use serde::Deserialize;

use crate::{CoreError, CoreResult};

/// Raw search form input as it arrives from the client.
#[derive(Debug, Clone, Deserialize)]
pub struct FlightSearchRequest {
    pub source: String,
    pub destination: String,
    pub date: String,
}

/// A validated route-and-date query. Construction is the only validation
/// gate; no store access happens for rejected input.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub source: String,
    pub destination: String,
    pub date: NaiveDate,
}

impl SearchQuery {
    pub fn parse(req: &FlightSearchRequest) -> CoreResult<Self> {
        let source = req.source.trim();
        let destination = req.destination.trim();
        let date = req.date.trim();

        if source.is_empty() || destination.is_empty() || date.is_empty() {
            return Err(CoreError::Validation(
                "source, destination and date are required".into(),
            ));
        }
        if source.eq_ignore_ascii_case(destination) {
            return Err(CoreError::Validation(
                "source and destination cannot be the same".into(),
            ));
        }
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| CoreError::Validation("invalid date format, use YYYY-MM-DD".into()))?;

        Ok(Self {
            source: source.to_string(),
            destination: destination.to_string(),
            date,
        })
    }
}
