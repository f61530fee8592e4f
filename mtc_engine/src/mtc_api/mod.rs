mod alert_api;
mod errors;

pub use alert_api::AlertApi;
pub use errors::AlertApiError;
