use thiserror::Error;

#[derive(Debug, Error)]
pub enum TgvMaxApiError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Request to the tgvmax endpoint failed: {0}")]
    RequestError(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("Query failed. Error {status}. {message}")]
    QueryError { status: u16, message: String },
}
