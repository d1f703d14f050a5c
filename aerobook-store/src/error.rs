use aerobook_core::booking::BookingError;
use aerobook_core::seat::SeatId;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("seat {seat} is already booked")]
    SeatTaken { seat: SeatId },
    #[error("flight {0} not found")]
    FlightNotFound(i64),
    #[error("email {0} is already registered")]
    DuplicateEmail(String),
    #[error("corrupt row: {0}")]
    Decode(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// True when the underlying Postgres error is a unique-constraint
    /// violation. The (flight, seat) constraint is the authoritative guard
    /// against double booking; the pre-check only exists for a friendlier
    /// message.
    pub fn is_unique_violation(err: &sqlx::Error) -> bool {
        matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
    }
}

impl From<StoreError> for BookingError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::SeatTaken { seat } => BookingError::SeatTaken { seat },
            other => BookingError::store(other),
        }
    }
}
