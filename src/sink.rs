//! Where [`ExtError::log_and_return`](crate::ExtError::log_and_return) sends reports.
//!
//! The crate does not own a logging backend. [`TracingSink`] forwards each
//! report to the `tracing` dispatcher installed by the application; any other
//! destination can implement [`ReportSink`], and closures taking `&ExtError`
//! already do.

use crate::ExtError;

/// Records error reports.
pub trait ReportSink {
    fn record(&self, error: &ExtError);
}

impl<F> ReportSink for F
where
    F: Fn(&ExtError),
{
    fn record(&self, error: &ExtError) {
        self(error)
    }
}

/// Emits one `ERROR` event with target `exterror` per report.
///
/// The id and the creation site are attached as structured fields; the
/// rendered report is the event message.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ReportSink for TracingSink {
    fn record(&self, error: &ExtError) {
        let location = error.location();
        tracing::error!(
            target: "exterror",
            id = error.id(),
            file = location.filename(),
            line = location.line(),
            function = location.calling_function(),
            "{}",
            error.render()
        );
    }
}
