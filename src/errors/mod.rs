//! Centralized error handling for tvlogo-sync
//!
//! # Error Categories
//!
//! - **Source Errors**: remote listing and raw content fetches
//! - **Download Errors**: per-logo fetch and local write failures
//! - **Store Errors**: channel source and logo assignment collaborators
//! - **App Errors**: configuration and startup failures in the binary
//!
//! # Usage
//!
//! ```rust
//! use tvlogo_sync::errors::{AppError, AppResult};
//!
//! fn example_function() -> AppResult<String> {
//!     Ok("success".to_string())
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for remote source Results
pub type SourceResult<T> = Result<T, SourceError>;

/// Convenience type alias for channel store Results
pub type StoreResult<T> = Result<T, StoreError>;
