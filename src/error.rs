//! Error types for rendering values.
//!
//! Rendering is all-or-nothing: every error aborts the traversal that raised
//! it. Output written to the sink before the failure is left in place.
//!
//! ## Error Categories
//!
//! - **I/O Errors**: the sink rejected a write. The [`std::io::Error`] is kept
//!   as-is.
//! - **Filter Errors**: a [`Filter`](crate::Filter) failed while rendering a
//!   value. The filter's own error is kept as the [`source`] so callers can
//!   downcast it.
//! - **UTF-8 Errors**: a string was requested but a filter wrote bytes that
//!   are not UTF-8. Writers receive the bytes unchanged.
//! - **Custom Errors**: misuse reported by the library itself, e.g. a serde
//!   implementation that calls `serialize_value` before `serialize_key`.
//!
//! [`source`]: std::error::Error::source
//!
//! ## Examples
//!
//! ```rust
//! use lucid::Error;
//!
//! let err = Error::custom("something went wrong");
//! assert!(err.to_string().contains("something went wrong"));
//! ```

use std::fmt;
use std::io;
use thiserror::Error;

/// Represents all possible errors that can occur while rendering a value.
#[derive(Debug, Error)]
pub enum Error {
    /// The output sink rejected a write.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// A filter failed while rendering a value.
    #[error("filter error: {0}")]
    Filter(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Text output was requested but a filter wrote bytes that are not UTF-8.
    #[error("output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Wraps the failure of a filter's own logic.
    ///
    /// The wrapped error is reachable through [`std::error::Error::source`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lucid::Error;
    /// use std::error::Error as _;
    ///
    /// let err = Error::filter(std::fmt::Error);
    /// assert!(err.source().unwrap().is::<std::fmt::Error>());
    /// ```
    pub fn filter<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Error::Filter(err.into())
    }

    /// Creates a custom error with a display message.
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Returns the filter's original error if this is a [`Error::Filter`].
    pub fn filter_source(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Error::Filter(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
