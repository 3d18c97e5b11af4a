/// Errors produced while validating, detecting and rendering an image.
///
/// Every variant renders as a single human-readable line, which is what the
/// dashboard shows when a detect action fails.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The request never produced a response (connection refused, DNS, timeout).
    #[error("Network error: {0}")]
    Network(String),

    /// The detection service answered with a non-success status.
    #[error("Server responded with status {status}: {body}")]
    Server { status: u16, body: String },

    /// The response body was not a well-formed detection result.
    #[error("Invalid response from detection service: {0}")]
    Protocol(String),

    /// The selected file is not an acceptable image.
    #[error("Invalid input: {0}")]
    Input(String),

    /// A setting (endpoint, timeout, flag) could not be used.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Decoding or encoding a raster surface failed.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Shorthand for `std::result::Result<T, wastelens::Error>`.
pub type Result<T> = std::result::Result<T, Error>;

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            Error::Config(err.to_string())
        } else {
            Error::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Protocol(err.to_string())
    }
}
