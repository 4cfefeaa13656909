/*!
 * Error types for the slidesmith application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors that can occur when working with the generative AI service
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// The API answered but produced nothing usable
    #[error("Empty response: {0}")]
    EmptyResponse(String),

    /// A long-running operation finished in a failed state
    #[error("Operation failed: {0}")]
    OperationFailed(String),

    /// A long-running operation did not finish in time
    #[error("Operation timed out: {0}")]
    Timeout(String),
}

impl ProviderError {
    /// Map an HTTP status and body to the matching provider error
    pub fn from_status(status_code: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status_code {
            401 | 403 => Self::AuthenticationError(message),
            429 => Self::RateLimitExceeded(message),
            _ => Self::ApiError { status_code, message },
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(error.to_string())
        } else if error.is_connect() {
            Self::ConnectionError(error.to_string())
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}

/// Errors that abort a generation run or a single-slide request
#[derive(Error, Debug)]
pub enum GenerationError {
    /// The generation request itself is invalid
    #[error("Invalid generation request: {0}")]
    InvalidRequest(String),

    /// The text generation call failed
    #[error("Failed to generate slide content from the AI model: {0}")]
    ContentGeneration(#[source] ProviderError),

    /// The text generation call returned data that does not match the schema
    #[error("Malformed slide content received from the AI model: {0}")]
    MalformedResponse(String),

    /// An image request failed
    #[error("Failed to generate image: {0}")]
    ImageGeneration(#[source] ProviderError),

    /// The intro video operation failed
    #[error("Failed to generate intro video: {0}")]
    VideoGeneration(#[source] ProviderError),
}

/// Errors raised by presentation document updates
#[derive(Error, Debug, PartialEq)]
pub enum StoreError {
    /// No slide with the given id exists in the presentation
    #[error("Unknown slide: {0}")]
    UnknownSlide(String),
}

/// Errors raised by the external diagram renderer
#[derive(Error, Debug)]
pub enum DiagramError {
    /// The renderer executable could not be started
    #[error("Diagram renderer unavailable: {0}")]
    RendererUnavailable(String),

    /// The renderer rejected the diagram source
    #[error("{0}")]
    RenderFailed(String),

    /// Filesystem error while exchanging files with the renderer
    #[error("Diagram renderer I/O error: {0}")]
    Io(#[from] std::io::Error),
}
