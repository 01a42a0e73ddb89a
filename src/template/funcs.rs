//! Functions available to every template.
//!
//! | Name | Arguments | Result |
//! |------|-----------|--------|
//! | `trimLeft` | string | the string without leading whitespace |
//! | `lines` | string | list of the string's lines |
//! | `split` | separator, string | list of the parts between separators |
//! | `indent` | prefix, string | prefix followed by the string |
//! | `errorString` | any | text of a causing error, empty for nil |
//! | `print` | any... | operands concatenated, spaces between non-strings |
//! | `len` | string, list or map | its length |
//! | `not` | any | negated truthiness |
//! | `eq` | any, any | equality |
//!
//! `split` and `indent` take the text last so they work at the end of a pipeline:
//! `{{.StackTrace | split "\n"}}`.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use super::{TemplateError, Value};

/// A function callable from a template.
pub type TemplateFn = Arc<dyn Fn(&[Value]) -> Result<Value, TemplateError> + Send + Sync>;

/// Functions by name.
pub type FuncMap = HashMap<String, TemplateFn>;

static BUILTINS: OnceLock<FuncMap> = OnceLock::new();

/// Functions every template can call.
pub fn builtins() -> &'static FuncMap {
    BUILTINS.get_or_init(|| {
        let mut funcs = FuncMap::new();
        register(&mut funcs, "trimLeft", trim_left);
        register(&mut funcs, "lines", lines);
        register(&mut funcs, "split", split);
        register(&mut funcs, "indent", indent);
        register(&mut funcs, "errorString", error_string);
        register(&mut funcs, "print", print);
        register(&mut funcs, "len", len);
        register(&mut funcs, "not", not);
        register(&mut funcs, "eq", eq);
        funcs
    })
}

fn register(
    funcs: &mut FuncMap,
    name: &str,
    f: fn(&[Value]) -> Result<Value, TemplateError>,
) {
    funcs.insert(name.to_string(), Arc::new(f));
}

fn arity(func: &'static str, args: &[Value], want: usize) -> Result<(), TemplateError> {
    if args.len() == want {
        Ok(())
    } else {
        Err(TemplateError::Arity { func, want, got: args.len() })
    }
}

fn string_arg(value: &Value) -> Result<&str, TemplateError> {
    value.as_str().ok_or(TemplateError::Type { expected: "string", got: value.kind() })
}

/// Left-trims whitespace.
pub fn trim_left(args: &[Value]) -> Result<Value, TemplateError> {
    arity("trimLeft", args, 1)?;
    Ok(Value::Str(string_arg(&args[0])?.trim_start().to_string()))
}

/// Splits text into lines; a trailing newline does not produce an empty line.
pub fn lines(args: &[Value]) -> Result<Value, TemplateError> {
    arity("lines", args, 1)?;
    let text = string_arg(&args[0])?;
    Ok(Value::List(text.lines().map(Value::from).collect()))
}

/// Splits text on every occurrence of a separator.
pub fn split(args: &[Value]) -> Result<Value, TemplateError> {
    arity("split", args, 2)?;
    let separator = string_arg(&args[0])?;
    let text = string_arg(&args[1])?;
    if separator.is_empty() {
        return Ok(Value::List(text.chars().map(|c| Value::Str(c.to_string())).collect()));
    }
    Ok(Value::List(text.split(separator).map(Value::from).collect()))
}

/// Prepends a prefix to a line.
pub fn indent(args: &[Value]) -> Result<Value, TemplateError> {
    arity("indent", args, 2)?;
    let prefix = string_arg(&args[0])?;
    let line = string_arg(&args[1])?;
    let mut out = String::with_capacity(prefix.len() + line.len());
    out.push_str(prefix);
    out.push_str(line);
    Ok(Value::Str(out))
}

/// Text of an optional causing error; empty when there is none.
pub fn error_string(args: &[Value]) -> Result<Value, TemplateError> {
    arity("errorString", args, 1)?;
    Ok(Value::Str(match &args[0] {
        Value::Nil => String::new(),
        Value::Error(text) | Value::Str(text) => text.clone(),
        other => other.to_string(),
    }))
}

/// Concatenates operands, adding spaces between operands when neither is a string.
pub fn print(args: &[Value]) -> Result<Value, TemplateError> {
    let mut out = String::new();
    for (i, arg) in args.iter().enumerate() {
        if i > 0 && !matches!(arg, Value::Str(_)) && !matches!(args[i - 1], Value::Str(_)) {
            out.push(' ');
        }
        out.push_str(&arg.to_string());
    }
    Ok(Value::Str(out))
}

pub fn len(args: &[Value]) -> Result<Value, TemplateError> {
    arity("len", args, 1)?;
    let n = match &args[0] {
        Value::Str(s) => s.len(),
        Value::List(items) => items.len(),
        Value::Map(entries) => entries.len(),
        other => return Err(TemplateError::Type { expected: "string, list or map", got: other.kind() }),
    };
    Ok(Value::Int(i64::try_from(n).unwrap_or(i64::MAX)))
}

pub fn not(args: &[Value]) -> Result<Value, TemplateError> {
    arity("not", args, 1)?;
    Ok(Value::Bool(!args[0].is_truthy()))
}

pub fn eq(args: &[Value]) -> Result<Value, TemplateError> {
    arity("eq", args, 2)?;
    Ok(Value::Bool(args[0] == args[1]))
}
