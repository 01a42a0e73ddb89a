use exterror::{ExtError, ReportSink, TracingSink};
use std::sync::Mutex;

#[derive(Default)]
struct Collect {
    reports: Mutex<Vec<(i64, String)>>,
}

impl ReportSink for Collect {
    fn record(&self, error: &ExtError) {
        self.reports.lock().unwrap().push((error.id(), error.render()));
    }
}

#[test]
fn log_and_return_returns_the_same_error() {
    let err = ExtError::new(5678, "test error #2").with_debug_msg("detail").log_and_return();

    assert_eq!(err.id(), 5678);
    assert_eq!(err.end_user_msg(), "test error #2");
    assert_eq!(err.debug_msg(), "detail");
}

#[test]
fn log_to_hands_the_report_to_the_sink() {
    let sink = Collect::default();
    let err = ExtError::new(9, "recorded").with_debug_field("attempt", 2).log_to(&sink);

    let reports = sink.reports.lock().unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].0, 9);
    assert_eq!(reports[0].1, err.render());
}

#[test]
fn closures_are_sinks() {
    let seen = Mutex::new(Vec::new());
    let record = |error: &ExtError| seen.lock().unwrap().push(error.end_user_msg().to_string());

    let _err = ExtError::new(1, "first").log_to(&record);
    let _err = ExtError::new(2, "second").log_to(&record);

    assert_eq!(*seen.lock().unwrap(), vec!["first".to_string(), "second".to_string()]);
}

#[test]
fn tracing_sink_accepts_reports_without_a_subscriber() {
    let err = ExtError::new(3, "no subscriber").log_to(&TracingSink);
    assert_eq!(err.id(), 3);
}
