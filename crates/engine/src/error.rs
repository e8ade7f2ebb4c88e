//! The module contains the errors the engine can throw.
//!
//! Every variant maps to one HTTP status at the server boundary:
//!
//! - [`BadRequest`] for rejected input (missing images, missing phone).
//! - [`KeyNotFound`] when a record is absent.
//! - [`Forbidden`] for ownership violations.
//! - [`Conflict`] when a state transition loses the write race.
//! - [`Gateway`] for payment-gateway failures.
//!
//!  [`BadRequest`]: EngineError::BadRequest
//!  [`KeyNotFound`]: EngineError::KeyNotFound
//!  [`Forbidden`]: EngineError::Forbidden
//!  [`Conflict`]: EngineError::Conflict
//!  [`Gateway`]: EngineError::Gateway
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0} not found")]
    KeyNotFound(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Conflict(String),
    #[error("payment gateway error: {0}")]
    Gateway(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::BadRequest(a), Self::BadRequest(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::Forbidden(a), Self::Forbidden(b)) => a == b,
            (Self::Conflict(a), Self::Conflict(b)) => a == b,
            (Self::Gateway(a), Self::Gateway(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
