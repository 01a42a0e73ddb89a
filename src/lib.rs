//! Extended errors for diagnostics.
//!
//! An [`ExtError`] wraps an optional causing error with an id, a message meant
//! for end users, debug details, the location that created it and a snapshot
//! of the stack, and renders all of it into a report through a [`Template`].
//!
//! # Examples
//!
//! ## Creating and enriching an error
//!
//! ```
//! use exterror::ExtError;
//!
//! let err = ExtError::new(42, "payment was declined")
//!     .with_debug_msg("card issuer returned code 05")
//!     .with_debug_field("order", "A-1009");
//!
//! let report = err.render();
//! assert!(report.contains("payment was declined"));
//! assert!(report.contains("Error Number: 42"));
//! assert!(report.contains("Debug Message: card issuer returned code 05"));
//! assert!(report.contains("order: A-1009"));
//! ```
//!
//! ## Chaining errors
//!
//! ```
//! use exterror::ExtError;
//!
//! let parent = ExtError::new(1, "disk quota exceeded");
//! let err = ExtError::with_parent(2, "could not save draft", parent);
//!
//! let report = err.render();
//! assert!(report.contains("could not save draft"));
//! assert!(report.contains("Parent Error:"));
//! assert!(report.contains("disk quota exceeded"));
//! ```
//!
//! ## Custom templates
//!
//! ```
//! use exterror::{ExtError, Template};
//!
//! let template = Template::parse("{{.EndUserMsg}}").unwrap();
//! let err = ExtError::new(3, "try again later").with_template(template);
//!
//! assert_eq!(err.to_string(), "try again later");
//! ```

/// Capture settings read once per process
pub mod config;
/// ExtError and its result aliases
pub mod error;
/// Creation-site lookup
pub mod location;
/// Macros capturing the enclosing function name
pub mod macros;
/// Convenience re-exports for quick starts
pub mod prelude;
/// Destinations for logged reports
pub mod sink;
/// Stack snapshots
pub mod stack;
/// Report templates and the template language
pub mod template;
/// Extension traits producing ExtErrors
pub mod traits;

pub use config::CaptureConfig;
pub use error::{BoxError, BoxedExtResult, DebugValue, ExtError, ExtResult};
pub use location::Location;
pub use sink::{ReportSink, TracingSink};
pub use template::{ReportTemplate, Template, TemplateError, DEFAULT_TEMPLATE};
pub use traits::ResultExt;
