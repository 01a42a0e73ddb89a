use exterror::ExtError;
use std::error::Error;
use std::io;

#[test]
fn parent_is_reachable() {
    let parent = ExtError::new(1, "parent error");
    let err = ExtError::with_parent(2, "test error #5", parent);

    assert_eq!(err.id(), 2);
    let parent = err.parent().unwrap();
    assert!(!parent.to_string().is_empty());
    assert_eq!(parent.downcast_ref::<ExtError>().map(ExtError::id), Some(1));
}

#[test]
fn source_follows_the_chain() {
    let root = io::Error::new(io::ErrorKind::PermissionDenied, "permission denied");
    let middle = ExtError::with_parent(1, "cannot open log", root);
    let top = ExtError::with_parent(2, "startup failed", middle);

    let mut depth = 0;
    let mut current: Option<&(dyn Error + 'static)> = Some(&top);
    while let Some(err) = current {
        depth += 1;
        current = err.source();
    }
    assert_eq!(depth, 3);

    let root_cause = top
        .source()
        .and_then(|err| err.source())
        .and_then(|err| err.downcast_ref::<io::Error>())
        .unwrap();
    assert_eq!(root_cause.kind(), io::ErrorKind::PermissionDenied);
}

#[test]
fn into_parent_returns_the_owned_error() {
    let err = ExtError::with_parent(3, "wrapper", io::Error::new(io::ErrorKind::Other, "inner"));

    let parent = err.into_parent().unwrap();
    assert_eq!(parent.to_string(), "inner");
    assert!(parent.downcast::<io::Error>().is_ok());
}

#[test]
fn string_parents_are_accepted() {
    let err = ExtError::with_parent(4, "wrapper", "plain text cause");

    assert_eq!(err.parent().map(|parent| parent.to_string()), Some("plain text cause".to_string()));
}

#[test]
fn errors_without_parent_have_no_source() {
    let err = ExtError::new(5, "alone");

    assert!(err.source().is_none());
    assert!(err.into_parent().is_none());
}
