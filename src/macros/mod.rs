//! Macros that capture the enclosing function name at compile time.
//!
//! - [`macro@crate::exterror`] - Creates an [`ExtError`](crate::ExtError) whose calling
//!   function is exact, instead of being resolved from debug symbols at runtime.
//! - [`macro@crate::function_name`] - Fully qualified name of the enclosing function.
//!
//! # Examples
//!
//! ```
//! use exterror::exterror;
//!
//! fn open_session() -> exterror::ExtError {
//!     exterror!(7, "session could not be opened")
//! }
//!
//! let err = open_session();
//! assert!(err.location().calling_function().ends_with("open_session"));
//! ```

/// Creates an [`ExtError`](crate::ExtError) at the invocation site.
///
/// # Syntax
///
/// - `exterror!(id, message)`
/// - `exterror!(id, message, parent)` - `parent` is anything convertible into a boxed error
///
/// File and line are the macro invocation's; the calling function comes from
/// [`function_name!`](crate::function_name), so it does not depend on debug info.
///
/// # Examples
///
/// ```rust
/// use exterror::exterror;
///
/// let parent = std::io::Error::new(std::io::ErrorKind::TimedOut, "read timed out");
/// let err = exterror!(504, "upstream did not answer", parent)
///     .with_debug_field("upstream", "billing");
///
/// assert_eq!(err.id(), 504);
/// assert!(err.render().contains("read timed out"));
/// ```
#[macro_export]
macro_rules! exterror {
    ($id:expr, $msg:expr $(,)?) => {
        $crate::ExtError::__with_function(
            $id,
            $msg,
            ::core::option::Option::None,
            $crate::function_name!(),
        )
    };
    ($id:expr, $msg:expr, $parent:expr $(,)?) => {
        $crate::ExtError::__with_function(
            $id,
            $msg,
            ::core::option::Option::Some(::core::convert::Into::into($parent)),
            $crate::function_name!(),
        )
    };
}

/// Expands to the fully qualified name of the enclosing function as `&'static str`.
///
/// Closure segments are dropped, so inside a closure or `async` block this is
/// the function that contains it.
///
/// # Examples
///
/// ```
/// fn handler() -> &'static str {
///     exterror::function_name!()
/// }
///
/// assert!(handler().ends_with("::handler"));
/// ```
#[macro_export]
macro_rules! function_name {
    () => {{
        fn __exterror_here() {}
        fn __exterror_type_name_of<T>(_: T) -> &'static str {
            ::core::any::type_name::<T>()
        }
        $crate::location::__enclosing_function(__exterror_type_name_of(__exterror_here))
    }};
}
