//! Error types shared by the store, the calculators and the weather lookup.

use std::io;

use thiserror::Error;

/// Why an add-task request was turned down. The message is shown to the user as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Please enter a task and choose a date.")]
    EmptyText,
    #[error("Please enter a task and choose a date.")]
    MissingDate,
}

#[derive(Debug, Error)]
pub enum GardenError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Rejected(#[from] Rejection),

    /// Non-positive or non-numeric calculator input.
    #[error("{0}")]
    InvalidInput(String),

    /// The weather service does not know the town.
    #[error("City not found: {0}")]
    CityNotFound(String),

    /// A weather response that could not be used.
    #[error("weather lookup failed: {0}")]
    Weather(String),

    /// Transport failures, timeouts and unexpected HTTP statuses.
    #[error("HTTP error: {0}")]
    Http(String),
}

impl From<reqwest::Error> for GardenError {
    fn from(err: reqwest::Error) -> Self {
        GardenError::Http(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GardenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_are_http_errors() {
        let err = reqwest::blocking::Client::new().get("not a url").send().unwrap_err();
        let err = GardenError::from(err);
        assert!(matches!(err, GardenError::Http(_)));
        assert!(err.to_string().starts_with("HTTP error:"));
        assert!(!err.to_string().contains("weather"));
    }

    #[test]
    fn unknown_town_message() {
        assert_eq!(GardenError::CityNotFound("Durbn".into()).to_string(), "City not found: Durbn");
    }
}
