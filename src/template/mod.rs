//! Text templates that turn an [`ExtError`](crate::ExtError) into a report.
//!
//! The syntax is a subset of Go's `text/template`:
//!
//! - `{{.Field}}` reads a field of the report, `{{.}}` is the current value
//! - `{{fn arg ...}}` calls a function, `{{x | fn arg}}` passes `x` as the last argument
//! - `{{if}}`, `{{range}}`, `{{with}}`, `{{else}}`, `{{end}}` control output
//! - `{{$v := ...}}` declares a variable, `$` is the report itself
//! - `{{-` and `-}}` trim whitespace around an action, `{{/* ... */}}` is a comment
//!
//! Report fields: `Id`, `Filename`, `CallingMethod`, `Line`, `EndUserMsg`,
//! `DebugMsg`, `DebugFields`, `StackTrace`, `ParentErr`. Built-in functions are
//! listed in [`funcs`].
//!
//! # Examples
//!
//! ```
//! use exterror::{ExtError, Template};
//!
//! let template = Template::parse("{{.Id}}: {{.EndUserMsg}}").unwrap();
//! let err = ExtError::new(404, "page not found").with_template(template);
//!
//! assert_eq!(err.render(), "404: page not found");
//! ```

use core::fmt;
use std::sync::{Arc, OnceLock};

mod error;
mod exec;
pub mod funcs;
mod lex;
mod parse;
mod report;
mod value;

pub use error::TemplateError;
pub use funcs::{FuncMap, TemplateFn};
pub use report::ReportData;
pub use value::{Record, Value};

use exec::Executor;
use parse::{Node, Parser};

/// Template every error renders with unless it carries its own.
///
/// Output: a `file:line function: message` header, the error number, the debug
/// message when set, one line per debug field, the indented stack trace and,
/// when the causing error has text, the causing error's report indented one
/// level further.
pub const DEFAULT_TEMPLATE: &str = concat!(
    "{{.Filename}}:{{.Line}} {{.CallingMethod}}: {{.EndUserMsg}}\n",
    "\tError Number: {{.Id}}\n",
    "{{- if .DebugMsg}}\n",
    "\tDebug Message: {{.DebugMsg}}\n",
    "{{- end}}\n",
    "{{- range $key, $value := .DebugFields}}\n",
    "\t{{$key}}: {{$value}}\n",
    "{{- end}}\n",
    "\tTrace:\n",
    "{{- range lines .StackTrace}}\n",
    "{{indent \"\\t\\t\" (trimLeft .)}}\n",
    "{{- end}}\n",
    "{{- with errorString .ParentErr}}\n",
    "\tParent Error:\n",
    "{{- range lines .}}\n",
    "{{indent \"\\t\\t\" .}}\n",
    "{{- end}}\n",
    "{{- end}}",
);

static DEFAULT_REPORT: OnceLock<Template> = OnceLock::new();

/// Renders a report for an error.
///
/// Implemented by [`Template`]; implement it to plug in another engine.
pub trait ReportTemplate: fmt::Debug + Send + Sync {
    fn execute(&self, report: &ReportData<'_>) -> Result<String, TemplateError>;
}

/// A parsed template. Cloning is cheap.
#[derive(Clone)]
pub struct Template {
    inner: Arc<Inner>,
}

struct Inner {
    name: String,
    source: String,
    nodes: Vec<Node>,
    funcs: FuncMap,
}

impl Template {
    /// Parses a template named `report` with the built-in functions.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        Self::builder("report").parse(source)
    }

    /// Starts a template that can register its own functions.
    pub fn builder(name: impl Into<String>) -> TemplateBuilder {
        TemplateBuilder { name: name.into(), funcs: FuncMap::new() }
    }

    /// The shared [`DEFAULT_TEMPLATE`], parsed on first use.
    pub fn default_report() -> &'static Template {
        DEFAULT_REPORT
            .get_or_init(|| Template::parse(DEFAULT_TEMPLATE).expect("default report template must parse"))
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    #[inline]
    pub fn source(&self) -> &str {
        &self.inner.source
    }

    /// Executes the template against any record.
    pub fn execute_record(&self, root: &dyn Record) -> Result<String, TemplateError> {
        tracing::trace!(template = %self.inner.name, "executing template");
        Executor::new(&self.inner.name, &self.inner.funcs, funcs::builtins(), root).run(&self.inner.nodes)
    }
}

impl ReportTemplate for Template {
    fn execute(&self, report: &ReportData<'_>) -> Result<String, TemplateError> {
        self.execute_record(report)
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut funcs: Vec<&str> = self.inner.funcs.keys().map(String::as_str).collect();
        funcs.sort_unstable();
        f.debug_struct("Template")
            .field("name", &self.inner.name)
            .field("source", &self.inner.source)
            .field("funcs", &funcs)
            .finish()
    }
}

/// Collects custom functions before parsing; see [`Template::builder`].
pub struct TemplateBuilder {
    name: String,
    funcs: FuncMap,
}

impl TemplateBuilder {
    /// Registers a function, shadowing a built-in of the same name.
    pub fn func<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, TemplateError> + Send + Sync + 'static,
    {
        self.funcs.insert(name.into(), Arc::new(f));
        self
    }

    pub fn parse(self, source: &str) -> Result<Template, TemplateError> {
        let items = lex::split_items(&self.name, source)?;
        let builtins = funcs::builtins();
        let is_func = |name: &str| self.funcs.contains_key(name) || builtins.contains_key(name);
        let nodes = Parser::new(&self.name, items, &is_func).parse()?;

        Ok(Template {
            inner: Arc::new(Inner {
                name: self.name,
                source: source.to_string(),
                nodes,
                funcs: self.funcs,
            }),
        })
    }
}
