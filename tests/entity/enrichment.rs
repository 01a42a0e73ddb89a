use exterror::{ExtError, Template};

#[test]
fn new_stores_inputs_verbatim() {
    let err = ExtError::new(1234, "test error #1");

    assert_eq!(err.id(), 1234);
    assert_eq!(err.end_user_msg(), "test error #1");
    assert_eq!(err.debug_msg(), "");
    assert_eq!(err.debug_fields().count(), 0);
    assert!(err.parent().is_none());
}

#[test]
fn new_accepts_any_id_and_empty_messages() {
    let err = ExtError::new(-1, "");

    assert_eq!(err.id(), -1);
    assert_eq!(err.end_user_msg(), "");
    assert!(err.render().contains("Error Number: -1"));
}

#[test]
fn debug_msg_is_set_and_overwritten() {
    let err = ExtError::new(11111111, "test error #3").with_debug_msg("debug message");
    assert_eq!(err.debug_msg(), "debug message");

    let err = err.with_debug_msg("second message");
    assert_eq!(err.debug_msg(), "second message");
}

#[test]
fn debug_fields_hold_mixed_values() {
    let testnum = 5;
    let teststr = "test";
    let err = ExtError::new(4, "test error #4")
        .with_debug_field("testnum", testnum)
        .with_debug_field("teststr", teststr);

    assert_eq!(err.debug_field("testnum").map(|v| v.to_string()), Some("5".to_string()));
    assert_eq!(err.debug_field("teststr").map(|v| v.to_string()), Some("test".to_string()));
    assert!(err.debug_field("missing").is_none());
}

#[test]
fn debug_field_with_same_key_is_replaced() {
    let err = ExtError::new(1, "overwrite").with_debug_field("k", 1).with_debug_field("k", 2);

    let fields: Vec<(String, String)> =
        err.debug_fields().map(|(key, value)| (key.to_string(), value.to_string())).collect();
    assert_eq!(fields, vec![("k".to_string(), "2".to_string())]);
}

#[test]
fn debug_fields_iterate_in_key_order() {
    let err = ExtError::new(1, "ordered")
        .with_debug_field("zeta", 'z')
        .with_debug_field("alpha", 1.5)
        .with_debug_field("mid", String::from("m"));

    let keys: Vec<&str> = err.debug_fields().map(|(key, _)| key).collect();
    assert_eq!(keys, vec!["alpha", "mid", "zeta"]);
}

#[test]
fn per_error_template_leaves_the_default_alone() {
    let custom = ExtError::new(1, "custom")
        .with_template(Template::parse("{{.EndUserMsg}}").unwrap());
    let plain = ExtError::new(2, "plain");

    assert_eq!(custom.render(), "custom");
    assert!(plain.render().contains("Error Number: 2"));
}

#[test]
fn template_is_replaced_by_the_last_call() {
    let err = ExtError::new(1, "msg")
        .with_template(Template::parse("first {{.Id}}").unwrap())
        .with_template(Template::parse("second {{.Id}}").unwrap());

    assert_eq!(err.render(), "second 1");
}

#[test]
fn render_does_not_change_the_error() {
    let err = ExtError::new(8, "stable").with_debug_field("a", 1);

    let first = err.render();
    let second = err.render();

    assert_eq!(first, second);
    assert_eq!(err.to_string(), first);
    assert_eq!(err.debug_fields().count(), 1);
}

#[test]
fn debug_output_lists_fields() {
    let err = ExtError::new(77, "debuggable").with_debug_field("user", "u-1");

    let debug = format!("{err:?}");
    assert!(debug.contains("ExtError"));
    assert!(debug.contains("77"));
    assert!(debug.contains("u-1"));
}

#[test]
fn errors_cross_threads() {
    let handles: Vec<_> = (0..8)
        .map(|i| {
            let err = ExtError::new(i, format!("worker {i}")).with_debug_field("worker", i);
            std::thread::spawn(move || err.render())
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let report = handle.join().unwrap();
        assert!(report.contains(&format!("worker {i}")));
        assert!(report.contains(&format!("Error Number: {i}")));
    }
}
