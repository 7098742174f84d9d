#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # reshape-path
//!
//! Nested path addressing for `serde_json::Value` trees.
//!
//! Paths are dot-delimited strings such as `"user.address.city"`, parsed once
//! into a [`Path`] of segments. Reads never fail: a path that does not
//! resolve simply yields `None`. Writes create intermediate objects as
//! needed, and [`set`] leaves its input untouched by returning a new tree.

/// Parsed path type and segment grammar.
pub mod path;
/// Lookup and assignment over JSON values.
pub mod resolve;

/// Primary path type.
pub use path::{DELIMITER, Path};
/// Path operations over JSON values.
pub use resolve::{get, has, has_value, set, set_in_place};

use thiserror::Error;

/// Errors that can occur when parsing paths
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },
}

impl Error {
    /// Build an invalid-path error with input path and parsing reason.
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Crate-local result type for path operations.
pub type Result<T> = std::result::Result<T, Error>;
