//! Convenience re-exports for common usage patterns.
//!
//! ```
//! use exterror::prelude::*;
//!
//! fn read_settings() -> ExtResult<String> {
//!     std::fs::read_to_string("settings.toml").ext_err(100, "settings are unavailable")
//! }
//!
//! assert!(read_settings().is_err());
//! ```
//!
//! # What's Included
//!
//! - **Macros**: [`exterror!`]
//! - **Types**: [`ExtError`], [`ExtResult`], [`Template`]
//! - **Traits**: [`ResultExt`], [`ReportTemplate`]

pub use crate::exterror;

pub use crate::error::{ExtError, ExtResult};
pub use crate::template::{ReportTemplate, Template};

pub use crate::traits::ResultExt;
