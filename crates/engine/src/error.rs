//! The module contains the error the engine can throw.
//!
//! The four domain kinds mirror the failure semantics of the ledger core:
//!
//! - [`NotFound`] when a fund/expense/alert does not exist **or** does not
//!   belong to the caller (the two cases are indistinguishable on purpose).
//! - [`InsufficientFunds`] when a debit would drive a fund balance below zero.
//! - [`InvalidTransition`] when an approval/rejection is attempted from a
//!   state that does not permit it.
//! - [`Validation`] for malformed input caught before any write.
//!
//! [`NotFound`]: EngineError::NotFound
//! [`InsufficientFunds`]: EngineError::InsufficientFunds
//! [`InvalidTransition`]: EngineError::InvalidTransition
//! [`Validation`]: EngineError::Validation
use sea_orm::DbErr;
use thiserror::Error;

use crate::Amount;

/// Engine custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" not found!")]
    NotFound(String),
    #[error("insufficient funds: required {required}, available {available}")]
    InsufficientFunds { required: Amount, available: Amount },
    #[error("invalid transition: {0}")]
    InvalidTransition(String),
    #[error("invalid input: {0}")]
    Validation(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::NotFound(a), Self::NotFound(b)) => a == b,
            (
                Self::InsufficientFunds {
                    required: ra,
                    available: aa,
                },
                Self::InsufficientFunds {
                    required: rb,
                    available: ab,
                },
            ) => ra == rb && aa == ab,
            (Self::InvalidTransition(a), Self::InvalidTransition(b)) => a == b,
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
