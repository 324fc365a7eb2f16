pub mod identity;

pub use identity::{Customer, CustomerDirectory, CustomerTier, InMemoryDirectory};

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Customer not found: {0}")]
    CustomerNotFound(String),
    #[error("Internal service error: {0}")]
    Internal(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
