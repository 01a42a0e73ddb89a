use exterror::config::DEFAULT_STACK_LIMIT;
use exterror::{stack, CaptureConfig, ExtError};
use std::hint::black_box;

fn recurse<F: Fn() -> T, T>(depth: usize, f: &F) -> T {
    if depth == 0 {
        f()
    } else {
        black_box(recurse(depth - 1, f))
    }
}

#[test]
fn stack_starts_at_the_creating_function() {
    let err = ExtError::new(1, "with stack");

    let first = err.stack_trace().lines().next().unwrap_or_default();
    assert!(
        first.contains("stack_starts_at_the_creating_function"),
        "unexpected first frame: {first}"
    );
}

#[test]
fn stack_excludes_capture_frames() {
    let err = ExtError::new(1, "with stack");
    let trace = err.stack_trace();

    assert!(!trace.contains("backtrace::capture::"));
    assert!(!trace.contains("backtrace::backtrace::"));
    assert!(!trace.contains("exterror::stack::"));
    assert!(!trace.contains("ExtError::new"));
}

#[test]
fn capture_starts_at_its_caller() {
    let trace = stack::capture_default();

    let first = trace.lines().next().unwrap_or_default();
    assert!(first.contains("capture_starts_at_its_caller"), "unexpected first frame: {first}");
}

#[test]
fn deep_stacks_are_truncated_to_the_buffer() {
    let trace = recurse(300, &stack::capture_default);

    assert!(!trace.is_empty());
    assert!(trace.len() <= DEFAULT_STACK_LIMIT);
}

#[test]
fn small_limits_are_respected() {
    for limit in [0, 1, 17, 64, 500] {
        let trace = stack::capture(limit);
        assert!(trace.len() <= limit, "limit {limit} exceeded: {}", trace.len());
    }
}

#[test]
fn configured_limit_bounds_the_error_stack() {
    let config = CaptureConfig::with_stack_limit(128);
    let err = recurse(100, &|| ExtError::new_with_config(5, "deep", None, &config));

    assert!(!err.stack_trace().is_empty());
    assert!(err.stack_trace().len() <= 128);
}

#[test]
fn disabled_stack_capture_keeps_the_location() {
    let config = CaptureConfig::location_only();
    let line = line!() + 1;
    let err = ExtError::new_with_config(9, "no stack", None, &config);

    assert_eq!(err.stack_trace(), "");
    assert_eq!(err.location().line(), line);
    assert!(err.render().ends_with("\tTrace:"));
}

#[test]
fn capture_config_defaults() {
    let config = CaptureConfig::default();
    assert!(config.capture_stack);
    assert_eq!(config.stack_limit, 4096);
    assert!(!CaptureConfig::location_only().capture_stack);
}
