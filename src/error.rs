//! Error types for configuration and replay input
//!
//! The decision core never fails; these errors only surface from loading a
//! [`DeciderConfig`](crate::config::DeciderConfig) or reading observations.

use thiserror::Error;

/// Errors raised outside the decision core
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Malformed observation on line {line}: {reason}")]
    MalformedObservation { line: usize, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for fallible tail-sampler operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = Error::InvalidConfig("band_width must be finite".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: band_width must be finite"
        );

        let err = Error::MalformedObservation {
            line: 7,
            reason: "missing duration".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Malformed observation on line 7: missing duration"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
        assert!(err.to_string().contains("gone"));
    }
}
