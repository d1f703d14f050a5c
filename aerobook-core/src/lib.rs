pub mod booking;
pub mod checkout;
pub mod flight;
pub mod pricing;
pub mod search;
pub mod seat;
pub mod session;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("internal error: {0}")]
    Internal(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
