//! Source location of the code that created an error.

use core::fmt;
use std::panic;
use std::path::Path;

use crate::stack::Frames;

/// File, enclosing function and line of an error's creation site.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Location {
    filename: String,
    calling_function: String,
    line: u32,
}

impl Location {
    /// Builds a location from explicit parts; `file` is reduced to its base name.
    pub fn new(file: &str, calling_function: impl Into<String>, line: u32) -> Self {
        Self { filename: base_name(file), calling_function: calling_function.into(), line }
    }

    /// Location of the code calling this function.
    ///
    /// File and line come from the compiler; the function name is resolved
    /// from the symbolized stack and is empty when it cannot be found.
    #[track_caller]
    pub fn caller() -> Self {
        let site = panic::Location::caller();
        let frames = Frames::capture();
        Self::resolve(site, &frames).0
    }

    /// Resolves `site` against captured `frames`.
    ///
    /// Returns the location together with the index of the frame for `site`,
    /// which is where facility-internal frames end.
    pub(crate) fn resolve(
        site: &panic::Location<'_>,
        frames: &Frames,
    ) -> (Self, Option<usize>) {
        let anchor = frames.anchor(site.file(), site.line());
        let function = anchor
            .and_then(|index| frames.iter().nth(index))
            .map(|frame| frame.name.clone())
            .unwrap_or_default();

        (Self::new(site.file(), function, site.line()), anchor)
    }

    /// Base name of the source file, without directories.
    #[inline]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Fully qualified name of the enclosing function.
    #[inline]
    pub fn calling_function(&self) -> &str {
        &self.calling_function
    }

    #[inline]
    pub fn line(&self) -> u32 {
        self.line
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{} {}", self.filename, self.line, self.calling_function)
    }
}

fn base_name(file: &str) -> String {
    Path::new(file)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.to_string())
}

/// Strips the trailing helper segment from a `type_name` of a function item
/// declared inside the function being named. Used by [`function_name!`](crate::function_name).
#[doc(hidden)]
pub fn __enclosing_function(helper_type_name: &'static str) -> &'static str {
    let mut name = helper_type_name.strip_suffix("::__exterror_here").unwrap_or(helper_type_name);
    while let Some(stripped) = name.strip_suffix("::{{closure}}") {
        name = stripped;
    }
    name
}
