//! Centralized error handling for the channel player
//!
//! # Error Categories
//!
//! - **Catalog Errors**: fetching and decoding the public channel collections
//! - **Library Errors**: favorites and recently-watched persistence
//! - **Web Errors**: HTTP request/response handling issues
//! - **Player Errors**: playback controller setup
//!
//! # Usage
//!
//! ```rust
//! use channel_player::errors::{AppError, AppResult};
//!
//! fn lookup(id: &str) -> AppResult<String> {
//!     Err(AppError::not_found("channel", id))
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

pub type CatalogResult<T> = Result<T, CatalogError>;

pub type LibraryResult<T> = Result<T, LibraryError>;

/// Convenience type alias for Web Results
pub type WebResult<T> = Result<T, WebError>;
