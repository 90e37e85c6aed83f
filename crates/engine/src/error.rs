//! The module contains the errors the adapter can throw.

use docstore::StoreError;
use thiserror::Error;

/// Adapter custom errors.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    /// A category delete refused because transactions still reference it.
    #[error("category in use: {0}")]
    CategoryInUse(String),
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid date: {0}")]
    InvalidDate(String),
    #[error("Invalid name: {0}")]
    InvalidName(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}
