pub mod catalog;
pub mod itinerary;
pub mod offer;
pub mod recommendation;
pub mod repository;
pub mod search;
pub mod supplier;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Offer provider error: {0}")]
    ProviderError(String),
    #[error("Internal service error: {0}")]
    InternalError(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
