use exterror::template::{ReportData, Value};
use exterror::{exterror, ExtError, ReportTemplate, Template, TemplateError};
use std::sync::Arc;

#[test]
fn message_only_template() {
    let err = ExtError::new(1, "test error #6").with_template(Template::parse("{{.EndUserMsg}}").unwrap());

    assert_eq!(err.render(), "test error #6");
}

#[test]
fn location_fields_are_exposed() {
    let template = Template::parse("Error at {{.Filename}}:{{.CallingMethod}}:{{.Line}}: {{.EndUserMsg}}").unwrap();
    let line = line!() + 1;
    let err = exterror!(1, "test error #7").with_template(template);

    assert_eq!(
        err.render(),
        format!(
            "Error at custom_template.rs:{}::location_fields_are_exposed:{line}: test error #7",
            module_path!().trim_start_matches("r#")
        )
    );
}

#[test]
fn debug_fields_can_be_ranged() {
    let template = Template::parse("{{range $k, $v := .DebugFields}}{{$k}}={{$v}};{{end}}").unwrap();
    let err = ExtError::new(1, "fields")
        .with_debug_field("b", 2)
        .with_debug_field("a", 1)
        .with_template(template);

    assert_eq!(err.render(), "a=1;b=2;");
}

#[test]
fn missing_parent_renders_as_empty_text() {
    let template = Template::parse("[{{errorString .ParentErr}}]{{if not .ParentErr}} none{{end}}").unwrap();
    let err = ExtError::new(1, "orphan").with_template(template);

    assert_eq!(err.render(), "[] none");
}

#[test]
fn parent_text_is_available_to_templates() {
    let template = Template::parse("{{.EndUserMsg}} <- {{errorString .ParentErr}}").unwrap();
    let err = ExtError::with_parent(1, "outer", "inner cause").with_template(template);

    assert_eq!(err.render(), "outer <- inner cause");
}

#[test]
fn custom_functions_extend_the_template() {
    let template = Template::builder("upper")
        .func("upper", |args: &[Value]| match args {
            [Value::Str(text)] => Ok(Value::Str(text.to_uppercase())),
            _ => Err(TemplateError::func("upper takes one string")),
        })
        .parse("{{.EndUserMsg | upper}} ({{.Id}})")
        .unwrap();
    let err = ExtError::new(42, "quiet please").with_template(template);

    assert_eq!(err.render(), "QUIET PLEASE (42)");
}

#[test]
#[should_panic(expected = "failed to render error 1")]
fn function_rejecting_its_argument_panics() {
    let template = Template::builder("badfunc")
        .func("badfunc", |args: &[Value]| match args {
            [Value::List(items)] => Ok(Value::Int(items.len() as i64)),
            [other] => Err(TemplateError::Type { expected: "list", got: other.kind() }),
            _ => Err(TemplateError::func("badfunc takes one list")),
        })
        .parse("{{badfunc .EndUserMsg}}")
        .unwrap();

    let _ = ExtError::new(1, "test error #8").with_template(template).render();
}

#[test]
#[should_panic(expected = "expected string; got int")]
fn builtin_type_mismatch_panics() {
    let template = Template::parse("{{trimLeft .Id}}").unwrap();

    let _ = ExtError::new(2, "not a string").with_template(template).render();
}

#[test]
#[should_panic(expected = "failed to render error 3")]
fn display_panics_like_render() {
    let template = Template::parse("{{indent .Id}}").unwrap();
    let err = ExtError::new(3, "broken").with_template(template);

    let _ = err.to_string();
}

#[test]
fn malformed_templates_are_rejected_at_parse() {
    for source in ["{{.EndUserMsg", "{{if .Id}}open", "{{nosuch .Id}}", "{{end}}", "{{$undeclared}}"] {
        assert!(
            matches!(Template::parse(source), Err(TemplateError::Parse { .. })),
            "accepted {source:?}"
        );
    }
}

#[derive(Debug)]
struct OneLine;

impl ReportTemplate for OneLine {
    fn execute(&self, report: &ReportData<'_>) -> Result<String, TemplateError> {
        let err = report.error();
        Ok(format!("E{} {} @ {}", err.id(), err.end_user_msg(), err.location().filename()))
    }
}

#[test]
fn other_engines_plug_in() {
    let err = ExtError::new(12, "pluggable").with_template(OneLine);

    assert_eq!(err.render(), "E12 pluggable @ custom_template.rs");
}

#[test]
fn shared_templates_serve_many_errors() {
    let shared: Arc<dyn ReportTemplate> = Arc::new(Template::parse("#{{.Id}}").unwrap());

    let reports: Vec<String> = (1..=3)
        .map(|id| ExtError::new(id, "shared").with_shared_template(Arc::clone(&shared)).render())
        .collect();

    assert_eq!(reports, vec!["#1", "#2", "#3"]);
}

#[test]
fn default_template_renders_from_many_threads() {
    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                let err = ExtError::new(i, "threaded");
                (err.render(), Template::default_report().source().len())
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let (report, source_len) = handle.join().unwrap();
        assert!(report.contains(&format!("Error Number: {i}")));
        assert_eq!(source_len, exterror::DEFAULT_TEMPLATE.len());
    }
}
