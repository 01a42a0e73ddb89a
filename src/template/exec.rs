//! Walks the node tree against a record and writes the output.

use smallvec::SmallVec;

use super::funcs::FuncMap;
use super::parse::{Action, Arg, Command, Control, Node, Pipeline};
use super::{Record, TemplateError, Value};

pub(crate) struct Executor<'a> {
    name: &'a str,
    funcs: &'a FuncMap,
    builtins: &'a FuncMap,
    root: &'a dyn Record,
    vars: Vec<(String, Value)>,
    out: String,
}

impl<'a> Executor<'a> {
    pub(crate) fn new(
        name: &'a str,
        funcs: &'a FuncMap,
        builtins: &'a FuncMap,
        root: &'a dyn Record,
    ) -> Self {
        Self {
            name,
            funcs,
            builtins,
            root,
            vars: vec![(String::new(), Value::Root)],
            out: String::new(),
        }
    }

    pub(crate) fn run(mut self, nodes: &[Node]) -> Result<String, TemplateError> {
        self.walk(nodes, &Value::Root)?;
        Ok(self.out)
    }

    fn walk(&mut self, nodes: &[Node], dot: &Value) -> Result<(), TemplateError> {
        for node in nodes {
            match node {
                Node::Text(text) => self.out.push_str(text),
                Node::Action(action) => {
                    let value = self.eval_action(action, dot)?;
                    if action.pipe.decl.is_empty() {
                        self.out.push_str(&value.to_string());
                    } else {
                        self.declare(&action.pipe.decl, value);
                    }
                }
                Node::If(control) => {
                    let scope = self.vars.len();
                    let value = self.eval_action(&control.action, dot)?;
                    let truthy = value.is_truthy();
                    self.declare(&control.action.pipe.decl, value);
                    let branch = if truthy { &control.body } else { &control.otherwise };
                    self.walk(branch, dot)?;
                    self.vars.truncate(scope);
                }
                Node::With(control) => {
                    let scope = self.vars.len();
                    let value = self.eval_action(&control.action, dot)?;
                    self.declare(&control.action.pipe.decl, value.clone());
                    if value.is_truthy() {
                        self.walk(&control.body, &value)?;
                    } else {
                        self.walk(&control.otherwise, dot)?;
                    }
                    self.vars.truncate(scope);
                }
                Node::Range(control) => self.walk_range(control, dot)?,
            }
        }
        Ok(())
    }

    fn walk_range(&mut self, control: &Control, dot: &Value) -> Result<(), TemplateError> {
        let value = self.eval_action(&control.action, dot)?;
        let entries: Vec<(Value, Value)> = match value {
            Value::Nil => Vec::new(),
            Value::List(items) => items
                .into_iter()
                .enumerate()
                .map(|(i, item)| (Value::Int(i64::try_from(i).unwrap_or(i64::MAX)), item))
                .collect(),
            Value::Map(entries) => {
                entries.into_iter().map(|(key, item)| (Value::Str(key), item)).collect()
            }
            other => {
                return Err(self.fail(
                    &control.action,
                    TemplateError::func(format!("range can't iterate over {}", other.kind())),
                ))
            }
        };

        if entries.is_empty() {
            return self.walk(&control.otherwise, dot);
        }

        let decl = &control.action.pipe.decl;
        for (key, item) in entries {
            let scope = self.vars.len();
            match decl.as_slice() {
                [] => {}
                [value_name] => self.vars.push((value_name.clone(), item.clone())),
                [key_name, value_name, ..] => {
                    self.vars.push((key_name.clone(), key));
                    self.vars.push((value_name.clone(), item.clone()));
                }
            }
            self.walk(&control.body, &item)?;
            self.vars.truncate(scope);
        }
        Ok(())
    }

    fn declare(&mut self, names: &[String], value: Value) {
        if let Some(name) = names.first() {
            self.vars.push((name.clone(), value));
        }
    }

    /// Ties a failure to the action that caused it.
    fn fail(&self, action: &Action, err: TemplateError) -> TemplateError {
        match err {
            TemplateError::Exec { .. } | TemplateError::Parse { .. } => err,
            other => TemplateError::Exec {
                name: self.name.to_string(),
                line: action.line,
                action: action.source.clone(),
                message: other.to_string(),
            },
        }
    }

    fn eval_action(&self, action: &Action, dot: &Value) -> Result<Value, TemplateError> {
        self.eval_pipeline(&action.pipe, dot).map_err(|err| self.fail(action, err))
    }

    fn eval_pipeline(&self, pipe: &Pipeline, dot: &Value) -> Result<Value, TemplateError> {
        let mut piped = None;
        for command in &pipe.commands {
            piped = Some(self.eval_command(command, dot, piped.take())?);
        }
        Ok(piped.unwrap_or(Value::Nil))
    }

    fn eval_command(
        &self,
        command: &Command,
        dot: &Value,
        piped: Option<Value>,
    ) -> Result<Value, TemplateError> {
        let Some((first, rest)) = command.args.split_first() else {
            return Err(TemplateError::func("empty command"));
        };

        if let Arg::Func(name) = first {
            let mut args: SmallVec<[Value; 4]> = SmallVec::with_capacity(rest.len() + 1);
            for arg in rest {
                args.push(self.eval_arg(arg, dot)?);
            }
            args.extend(piped);
            return self.call(name, &args);
        }

        if !rest.is_empty() || piped.is_some() {
            return Err(TemplateError::func("can't give argument to non-function"));
        }
        self.eval_arg(first, dot)
    }

    fn call(&self, name: &str, args: &[Value]) -> Result<Value, TemplateError> {
        let func = self
            .funcs
            .get(name)
            .or_else(|| self.builtins.get(name))
            .ok_or_else(|| TemplateError::func(format!("function {name:?} not defined")))?;
        func(args)
    }

    fn eval_arg(&self, arg: &Arg, dot: &Value) -> Result<Value, TemplateError> {
        match arg {
            Arg::Dot => Ok(dot.clone()),
            Arg::Field(fields) => self.fields(dot.clone(), fields),
            Arg::Variable(name, fields) => {
                let value = self
                    .vars
                    .iter()
                    .rev()
                    .find(|(var, _)| var == name)
                    .map(|(_, value)| value.clone())
                    .ok_or_else(|| TemplateError::func(format!("undefined variable: ${name}")))?;
                self.fields(value, fields)
            }
            Arg::Func(name) => self.call(name, &[]),
            Arg::Str(s) => Ok(Value::Str(s.clone())),
            Arg::Int(n) => Ok(Value::Int(*n)),
            Arg::Bool(b) => Ok(Value::Bool(*b)),
            Arg::Nil => Ok(Value::Nil),
            Arg::Sub(pipe) => self.eval_pipeline(pipe, dot),
        }
    }

    fn fields(&self, mut value: Value, fields: &[String]) -> Result<Value, TemplateError> {
        for field in fields {
            value = match value {
                Value::Root => self
                    .root
                    .field(field)
                    .ok_or_else(|| TemplateError::func(format!("can't evaluate field {field} in report")))?,
                Value::Map(entries) => entries
                    .into_iter()
                    .find(|(key, _)| key == field)
                    .map_or(Value::Nil, |(_, item)| item),
                Value::Nil => {
                    return Err(TemplateError::func(format!("nil pointer evaluating .{field}")))
                }
                other => {
                    return Err(TemplateError::func(format!(
                        "can't evaluate field {field} in type {}",
                        other.kind()
                    )))
                }
            };
        }
        Ok(value)
    }
}
