//! Error type definitions for the channel player
//!
//! Each layer owns a focused error enum; [`AppError`] wraps them all so that
//! handlers and `main` can propagate with `?`.

use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Catalog download and decoding errors
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Favorites / recently-watched persistence errors
    #[error("Library error: {0}")]
    Library(#[from] LibraryError),

    /// Web layer errors
    #[error("Web error: {0}")]
    Web(#[from] WebError),

    /// Playback controller errors
    #[error("Player error: {0}")]
    Player(#[from] PlayerError),

    /// Validation errors
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Resource not found errors
    #[error("Not found: {resource} with id {id}")]
    NotFound { resource: String, id: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Errors raised while fetching the public channel catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Transport-level failure
    #[error("Request for {collection} failed: {source}")]
    Request {
        collection: String,
        #[source]
        source: reqwest::Error,
    },

    /// Non-success HTTP status
    #[error("HTTP error fetching {collection}: {status}")]
    Http { collection: String, status: u16 },

    /// Body was not the expected JSON shape
    #[error("Decode error for {collection}: {message}")]
    Decode { collection: String, message: String },

    /// Base URL could not be joined with a collection name
    #[error("Invalid catalog url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// Errors raised by the key/value store behind the personal library
#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Stored value could not be (de)serialized
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Storage error for key {key}: {message}")]
    Storage { key: String, message: String },
}

/// Web layer specific errors
#[derive(Error, Debug)]
pub enum WebError {
    /// Invalid request format
    #[error("Invalid request: {field} - {message}")]
    InvalidRequest { field: String, message: String },

    /// Page template failed to render
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// Playback controller errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlayerError {
    /// The fallback timer needs a tokio runtime to run on
    #[error("no async runtime available to arm the fallback timer")]
    NoAsyncRuntime,
}

/// Convenience methods for creating common error types
impl AppError {
    /// Create a validation error with a custom message
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a not found error for a specific resource
    pub fn not_found<R: Into<String>, I: Into<String>>(resource: R, id: I) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl CatalogError {
    pub fn request<C: Into<String>>(collection: C, source: reqwest::Error) -> Self {
        Self::Request {
            collection: collection.into(),
            source,
        }
    }

    pub fn decode<C: Into<String>, M: Into<String>>(collection: C, message: M) -> Self {
        Self::Decode {
            collection: collection.into(),
            message: message.into(),
        }
    }
}

impl LibraryError {
    pub fn storage<K: Into<String>, M: Into<String>>(key: K, message: M) -> Self {
        Self::Storage {
            key: key.into(),
            message: message.into(),
        }
    }
}

impl WebError {
    /// Create an invalid request error
    pub fn invalid_request<F: Into<String>, M: Into<String>>(field: F, message: M) -> Self {
        Self::InvalidRequest {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layer_errors_convert_into_app_error() {
        let err: AppError = LibraryError::storage("favorites", "disk full").into();
        assert!(matches!(err, AppError::Library(_)));
        assert_eq!(
            err.to_string(),
            "Library error: Storage error for key favorites: disk full"
        );

        let err: AppError = PlayerError::NoAsyncRuntime.into();
        assert!(err.to_string().starts_with("Player error:"));
    }

    #[test]
    fn not_found_message_names_resource() {
        let err = AppError::not_found("channel", "bbc1.uk");
        assert_eq!(err.to_string(), "Not found: channel with id bbc1.uk");
    }
}
