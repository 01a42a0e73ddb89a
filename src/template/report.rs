use super::{Record, Value};
use crate::ExtError;

/// Read-only view of an [`ExtError`] handed to templates.
#[derive(Debug, Clone, Copy)]
pub struct ReportData<'a> {
    error: &'a ExtError,
}

impl<'a> ReportData<'a> {
    #[inline]
    pub fn new(error: &'a ExtError) -> Self {
        Self { error }
    }

    #[inline]
    pub fn error(&self) -> &'a ExtError {
        self.error
    }
}

impl Record for ReportData<'_> {
    fn field(&self, name: &str) -> Option<Value> {
        let error = self.error;
        let location = error.location();
        Some(match name {
            "Id" => Value::Int(error.id()),
            "Filename" => location.filename().into(),
            "CallingMethod" => location.calling_function().into(),
            "Line" => location.line().into(),
            "EndUserMsg" => error.end_user_msg().into(),
            "DebugMsg" => error.debug_msg().into(),
            "DebugFields" => Value::Map(
                error.debug_fields().map(|(key, value)| (key.to_string(), Value::Str(value.to_string()))).collect(),
            ),
            "StackTrace" => error.stack_trace().into(),
            // Stringified only when a template asks for it.
            "ParentErr" => error.parent().map_or(Value::Nil, |parent| Value::Error(parent.to_string())),
            _ => return None,
        })
    }
}
