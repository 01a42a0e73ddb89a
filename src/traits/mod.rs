//! Extension traits for producing [`ExtError`](crate::ExtError)s from other error types.
//!
//! - [`ResultExt`]: wraps a failed `Result`'s error as the causing error of a new `ExtError`

pub mod result_ext;

pub use result_ext::ResultExt;
