use aerobook_core::booking::BookingError;
use aerobook_core::checkout::CheckoutError;
use aerobook_core::CoreError;
use aerobook_store::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    Validation(String),
    NotFound(String),
    Conflict(String),
    Internal(anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::Internal(err) => {
                tracing::error!("Internal Server Error: {err:#}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => AppError::Validation(msg),
            CoreError::Internal(msg) => AppError::Internal(anyhow::anyhow!(msg)),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::SeatTaken { .. } | StoreError::DuplicateEmail(_) => {
                AppError::Conflict(err.to_string())
            }
            StoreError::FlightNotFound(_) => AppError::NotFound(err.to_string()),
            other => AppError::Internal(anyhow::Error::new(other)),
        }
    }
}

impl From<BookingError> for AppError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::SeatTaken { .. } => AppError::Conflict(err.to_string()),
            BookingError::Store(_) => AppError::Internal(anyhow::Error::new(err)),
        }
    }
}

impl From<CheckoutError> for AppError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::Validation(core) => core.into(),
            CheckoutError::Store(store) => store.into(),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_error_taxonomy() {
        let seat = "12C".parse().unwrap();
        assert_eq!(
            AppError::from(StoreError::SeatTaken { seat }).into_response().status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(StoreError::DuplicateEmail("a@b.c".into()))
                .into_response()
                .status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(StoreError::FlightNotFound(9)).into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::from(CoreError::Validation("bad".into()))
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(StoreError::Decode("seat".into())).into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
