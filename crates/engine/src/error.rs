//! The module contains the errors the engine can return.
//!
//! - [`Validation`] a request parameter is missing or malformed.
//! - [`Store`] the record store failed to answer a query.
//! - [`Encoding`] a record could not be written as CSV.
//!
//!  [`Validation`]: EngineError::Validation
//!  [`Store`]: EngineError::Store
//!  [`Encoding`]: EngineError::Encoding
use sea_orm::DbErr;
use thiserror::Error;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0}")]
    Validation(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid record: {0}")]
    InvalidRecord(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error(transparent)]
    Store(#[from] DbErr),
    #[error(transparent)]
    Encoding(#[from] csv::Error),
}

impl EngineError {
    /// `true` when the error was caused by the caller's input rather than by
    /// the store or the encoder.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::InvalidRecord(a), Self::InvalidRecord(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::Store(a), Self::Store(b)) => a.to_string() == b.to_string(),
            (Self::Encoding(a), Self::Encoding(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
