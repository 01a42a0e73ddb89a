//! Extension trait for wrapping a failed `Result` into an [`ExtError`].
//!
//! The original error becomes the causing error and the location recorded is
//! the one calling `ext_err`, not a frame inside this crate.
//!
//! # Examples
//!
//! ```
//! use exterror::traits::ResultExt;
//! use exterror::ExtResult;
//!
//! fn load_config() -> ExtResult<String> {
//!     std::fs::read_to_string("does-not-exist.toml").ext_err(10, "configuration is unavailable")
//! }
//!
//! let err = load_config().unwrap_err();
//! assert_eq!(err.id(), 10);
//! assert!(err.parent().is_some());
//! ```

use crate::error::{BoxError, ExtError, ExtResult};

/// Extension trait turning a `Result`'s error into the parent of a new [`ExtError`].
pub trait ResultExt<T> {
    /// Wraps the error with an id and end-user message.
    fn ext_err(self, id: i64, end_user_msg: impl Into<String>) -> ExtResult<T>;

    /// Like [`ext_err`](ResultExt::ext_err), building the message only on failure.
    fn ext_err_with<F, S>(self, id: i64, f: F) -> ExtResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Into<BoxError>,
{
    #[track_caller]
    #[inline]
    fn ext_err(self, id: i64, end_user_msg: impl Into<String>) -> ExtResult<T> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(ExtError::with_parent(id, end_user_msg, err)),
        }
    }

    #[track_caller]
    #[inline]
    fn ext_err_with<F, S>(self, id: i64, f: F) -> ExtResult<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(ExtError::with_parent(id, f(), err)),
        }
    }
}
