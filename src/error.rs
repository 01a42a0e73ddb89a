//! The extended error type.
//!
//! An [`ExtError`] records where it was created and the stack at that point,
//! carries an id, a message for end users, optional debug details and an
//! optional causing error, and renders all of it through a template.
//!
//! # Examples
//!
//! ```
//! use exterror::ExtError;
//!
//! let io = std::io::Error::new(std::io::ErrorKind::NotFound, "config.toml missing");
//! let err = ExtError::with_parent(1001, "could not load settings", io)
//!     .with_debug_msg("checked the working directory only")
//!     .with_debug_field("attempts", 3);
//!
//! let report = err.render();
//! assert!(report.contains("could not load settings"));
//! assert!(report.contains("Error Number: 1001"));
//! assert!(report.contains("attempts: 3"));
//! assert!(report.contains("config.toml missing"));
//! ```

use core::fmt::{self, Display};
use std::collections::BTreeMap;
use std::error::Error;
use std::panic;
use std::sync::Arc;

use crate::config::CaptureConfig;
use crate::location::Location;
use crate::sink::{ReportSink, TracingSink};
use crate::stack::Frames;
use crate::template::{ReportData, ReportTemplate, Template};

/// A debug field value: anything displayable that can cross threads.
pub type DebugValue = Arc<dyn Display + Send + Sync>;

/// Boxed causing error.
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Error with caller location, stack snapshot, debug details and a causing error.
#[must_use]
pub struct ExtError {
    id: i64,
    end_user_msg: String,
    debug_msg: String,
    debug_fields: BTreeMap<String, DebugValue>,
    parent: Option<BoxError>,
    location: Location,
    stack_trace: String,
    template: Option<Arc<dyn ReportTemplate>>,
}

impl ExtError {
    /// Creates an error without a causing error.
    ///
    /// The caller's location and stack are captured here, according to
    /// [`CaptureConfig::global`].
    #[track_caller]
    pub fn new(id: i64, end_user_msg: impl Into<String>) -> Self {
        Self::capture(id, end_user_msg.into(), None, None, CaptureConfig::global())
    }

    /// Creates an error caused by `parent`.
    #[track_caller]
    pub fn with_parent<E>(id: i64, end_user_msg: impl Into<String>, parent: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::capture(id, end_user_msg.into(), Some(parent.into()), None, CaptureConfig::global())
    }

    /// Creates an error with explicit capture settings instead of the global ones.
    #[track_caller]
    pub fn new_with_config(
        id: i64,
        end_user_msg: impl Into<String>,
        parent: Option<BoxError>,
        config: &CaptureConfig,
    ) -> Self {
        Self::capture(id, end_user_msg.into(), parent, None, config)
    }

    /// Used by [`exterror!`](crate::exterror), which knows the enclosing function at compile time.
    #[doc(hidden)]
    #[track_caller]
    pub fn __with_function(
        id: i64,
        end_user_msg: impl Into<String>,
        parent: Option<BoxError>,
        function: &str,
    ) -> Self {
        Self::capture(id, end_user_msg.into(), parent, Some(function), CaptureConfig::global())
    }

    #[track_caller]
    fn capture(
        id: i64,
        end_user_msg: String,
        parent: Option<BoxError>,
        function: Option<&str>,
        config: &CaptureConfig,
    ) -> Self {
        let site = panic::Location::caller();
        let (location, stack_trace) = match function {
            Some(function) if !needs_frames(true, config) => {
                (Location::new(site.file(), function, site.line()), String::new())
            }
            _ => {
                let frames = Frames::capture();
                let (mut location, anchor) = Location::resolve(site, &frames);
                if let Some(function) = function {
                    location = Location::new(site.file(), function, site.line());
                }
                let stack_trace = match anchor {
                    Some(from) if config.capture_stack => frames.render(from, config.stack_limit),
                    _ => String::new(),
                };
                (location, stack_trace)
            }
        };

        Self {
            id,
            end_user_msg,
            debug_msg: String::new(),
            debug_fields: BTreeMap::new(),
            parent,
            location,
            stack_trace,
            template: None,
        }
    }

    /// Sets one debug field, replacing any value stored under the same key.
    pub fn with_debug_field<V>(mut self, key: impl Into<String>, value: V) -> Self
    where
        V: Display + Send + Sync + 'static,
    {
        self.debug_fields.insert(key.into(), Arc::new(value));
        self
    }

    /// Sets the debug message, replacing any previous one.
    pub fn with_debug_msg(mut self, debug_msg: impl Into<String>) -> Self {
        self.debug_msg = debug_msg.into();
        self
    }

    /// Renders this error with `template` instead of the default one.
    pub fn with_template<T>(self, template: T) -> Self
    where
        T: ReportTemplate + 'static,
    {
        self.with_shared_template(Arc::new(template))
    }

    /// Like [`with_template`](Self::with_template) for a template shared between errors.
    pub fn with_shared_template(mut self, template: Arc<dyn ReportTemplate>) -> Self {
        self.template = Some(template);
        self
    }

    /// Records this error with the default [`TracingSink`] and returns it unchanged.
    pub fn log_and_return(self) -> Self {
        self.log_to(&TracingSink)
    }

    /// Records this error with `sink` and returns it unchanged.
    pub fn log_to(self, sink: &dyn ReportSink) -> Self {
        sink.record(&self);
        self
    }

    /// Renders the report with this error's template, or the default one.
    ///
    /// # Panics
    ///
    /// Panics when the template fails to execute, for example when a function
    /// is called with an argument of the wrong type. A broken template is a
    /// programming error; no partial report is produced.
    #[must_use]
    pub fn render(&self) -> String {
        let report = ReportData::new(self);
        let result = match &self.template {
            Some(template) => template.execute(&report),
            None => Template::default_report().execute(&report),
        };

        match result {
            Ok(text) => text,
            Err(err) => panic!("failed to render error {}: {err}", self.id),
        }
    }

    #[inline]
    pub fn id(&self) -> i64 {
        self.id
    }

    #[inline]
    pub fn end_user_msg(&self) -> &str {
        &self.end_user_msg
    }

    /// The debug message; empty when none was set.
    #[inline]
    pub fn debug_msg(&self) -> &str {
        &self.debug_msg
    }

    pub fn debug_field(&self, key: &str) -> Option<&(dyn Display + Send + Sync)> {
        self.debug_fields.get(key).map(|value| &**value)
    }

    /// Debug fields in key order.
    pub fn debug_fields(&self) -> impl Iterator<Item = (&str, &(dyn Display + Send + Sync))> {
        self.debug_fields.iter().map(|(key, value)| (key.as_str(), &**value))
    }

    #[inline]
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Stack captured at creation, most recent call first; empty when capture is off.
    #[inline]
    pub fn stack_trace(&self) -> &str {
        &self.stack_trace
    }

    /// The causing error, if any.
    pub fn parent(&self) -> Option<&(dyn Error + Send + Sync + 'static)> {
        self.parent.as_deref()
    }

    /// Consumes the error, returning the causing error.
    pub fn into_parent(self) -> Option<BoxError> {
        self.parent
    }
}

impl Display for ExtError {
    /// Same text as [`ExtError::render`], including its panic on a broken template.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl fmt::Debug for ExtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: BTreeMap<&str, String> =
            self.debug_fields.iter().map(|(key, value)| (key.as_str(), value.to_string())).collect();
        f.debug_struct("ExtError")
            .field("id", &self.id)
            .field("end_user_msg", &self.end_user_msg)
            .field("debug_msg", &self.debug_msg)
            .field("debug_fields", &fields)
            .field("location", &self.location)
            .field("parent", &self.parent)
            .field("template", &self.template)
            .finish_non_exhaustive()
    }
}

impl Error for ExtError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.parent.as_deref().map(|parent| parent as &(dyn Error + 'static))
    }
}

/// Symbolizing the stack is skipped when neither the trace nor the function name needs it.
fn needs_frames(function_known: bool, config: &CaptureConfig) -> bool {
    config.capture_stack || !function_known
}

/// Result alias carrying an [`ExtError`].
pub type ExtResult<T> = Result<T, ExtError>;

/// Result alias with a boxed [`ExtError`] for a smaller `Err` variant.
pub type BoxedExtResult<T> = Result<T, Box<ExtError>>;
