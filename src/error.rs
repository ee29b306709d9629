use reqwest::StatusCode;

/// Errors raised by the listing controller and the search client.
///
/// Filter errors are returned to the caller. Fetch errors never escape a fetch:
/// the controller records their display string as the listing's `last_error`.
#[derive(Debug, thiserror::Error)]
pub enum ListingError {
    #[error("unknown filter dimension: {0}")]
    InvalidFilterDimension(String),

    #[error("{value:?} is not a valid option for the {dimension} filter")]
    InvalidFilterValue { dimension: String, value: String },

    #[error("Failed to fetch doctors: {0}")]
    Transport(String),

    #[error("Failed to fetch doctors (HTTP {0})")]
    HttpStatus(StatusCode),

    #[error("Failed to fetch doctors: unexpected response body ({0})")]
    MalformedResponse(String),

    #[error("config error: {0}")]
    Config(String),
}
