use thiserror::Error;

use crate::{db_types::InvalidWindowError, traits::StoreError};

#[derive(Debug, Clone, Error)]
pub enum AlertApiError {
    #[error("No alert with id {0} exists for this email address")]
    NotFound(String),
    #[error("Invalid alert. {0}")]
    InvalidAlert(String),
    #[error("{0}")]
    StoreError(#[from] StoreError),
}

impl From<InvalidWindowError> for AlertApiError {
    fn from(e: InvalidWindowError) -> Self {
        AlertApiError::InvalidAlert(e.to_string())
    }
}
