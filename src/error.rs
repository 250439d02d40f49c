//! Error types for the pagemeta crate

use std::num::ParseIntError;

use thiserror::Error;

/// Result type for pagemeta operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for pagemeta operations
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP client error (network, TLS or body decompression)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status
    #[error("Unexpected response status: {status_code}")]
    Status {
        /// HTTP status code
        status_code: u16,
    },

    /// Reading the document byte stream failed
    #[error("Stream error: {0}")]
    Stream(#[from] std::io::Error),

    /// A numeric OpenGraph property could not be parsed
    #[error("Invalid value {value:?} for {property}: {source}")]
    Contribution {
        /// The `property` attribute of the offending meta tag
        property: String,
        /// The raw `content` attribute
        value: String,
        /// Underlying integer parse failure
        #[source]
        source: ParseIntError,
    },

    /// The page URL used as resolution base is not a valid URL
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contribution_message() {
        let source = "abc".parse::<i64>().unwrap_err();
        let err = Error::Contribution {
            property: "og:image:width".to_string(),
            value: "abc".to_string(),
            source,
        };
        assert_eq!(
            err.to_string(),
            "Invalid value \"abc\" for og:image:width: invalid digit found in string"
        );
    }

    #[test]
    fn test_status_message() {
        let err = Error::Status { status_code: 404 };
        assert_eq!(err.to_string(), "Unexpected response status: 404");
    }
}
