use exterror::traits::ResultExt;
use exterror::{exterror, function_name, ExtError, Location};
use std::io;

/// `module_path!()` spells a keyword-named test crate as `r#mod`; type names do not.
fn qualified(function: &str) -> String {
    format!("{}::{function}", module_path!().trim_start_matches("r#"))
}

#[test]
fn new_records_file_and_line_of_the_caller() {
    let line = line!() + 1;
    let err = ExtError::new(1234, "test error #1");

    assert_eq!(err.location().filename(), "location.rs");
    assert_eq!(err.location().line(), line);
}

#[test]
fn new_resolves_the_enclosing_function() {
    let err = ExtError::new(1, "function lookup");

    let function = err.location().calling_function();
    assert!(
        function.ends_with("location::new_resolves_the_enclosing_function"),
        "unexpected calling function: {function}"
    );
}

#[test]
fn with_parent_records_the_caller_too() {
    let parent = io::Error::new(io::ErrorKind::Other, "root cause");
    let line = line!() + 1;
    let err = ExtError::with_parent(2, "wrapped", parent);

    assert_eq!(err.location().filename(), "location.rs");
    assert_eq!(err.location().line(), line);
}

#[test]
fn macro_records_exact_function_name() {
    let line = line!() + 1;
    let err = exterror!(6, "test error #6");

    assert_eq!(
        err.location().calling_function(),
        qualified("macro_records_exact_function_name")
    );
    assert_eq!(err.location().filename(), "location.rs");
    assert_eq!(err.location().line(), line);
}

#[test]
fn function_name_ignores_closures() {
    let name = (|| function_name!())();
    assert_eq!(name, qualified("function_name_ignores_closures"));
}

#[test]
fn location_caller_points_at_the_call() {
    let line = line!() + 1;
    let location = Location::caller();

    assert_eq!(location.filename(), "location.rs");
    assert_eq!(location.line(), line);
    assert!(location.calling_function().ends_with("location_caller_points_at_the_call"));
}

#[test]
fn result_ext_records_the_wrapping_site() {
    let result: Result<(), io::Error> = Err(io::Error::new(io::ErrorKind::NotFound, "missing"));
    let line = line!() + 1;
    let err = result.ext_err(3, "lookup failed").unwrap_err();

    assert_eq!(err.location().filename(), "location.rs");
    assert_eq!(err.location().line(), line);
}

#[test]
fn location_is_fixed_at_creation() {
    let err = ExtError::new(4, "fixed");
    let before = err.location().clone();

    let err = err.with_debug_msg("more detail").with_debug_field("k", 1);
    let _ = err.render();

    assert_eq!(err.location(), &before);
}
