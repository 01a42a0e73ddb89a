//! Builds the node tree from lexed items.

use super::lex::{Item, Token};
use super::TemplateError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Node {
    Text(String),
    Action(Action),
    If(Control),
    Range(Control),
    With(Control),
}

/// A pipeline together with where it came from, for error messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Action {
    pub line: usize,
    pub source: String,
    pub pipe: Pipeline,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Control {
    pub action: Action,
    pub body: Vec<Node>,
    pub otherwise: Vec<Node>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) struct Pipeline {
    /// Variables declared with `:=`.
    pub decl: Vec<String>,
    pub commands: Vec<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Command {
    pub args: Vec<Arg>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Arg {
    Dot,
    Field(Vec<String>),
    Variable(String, Vec<String>),
    Func(String),
    Str(String),
    Int(i64),
    Bool(bool),
    Nil,
    Sub(Pipeline),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Keyword {
    If,
    Range,
    With,
}

impl Keyword {
    fn as_str(self) -> &'static str {
        match self {
            Keyword::If => "if",
            Keyword::Range => "range",
            Keyword::With => "with",
        }
    }
}

/// What ended a node list.
enum Stop {
    End { line: usize },
    Else { tokens: Vec<Token>, line: usize, source: String },
}

pub(crate) struct Parser<'a> {
    name: &'a str,
    items: std::vec::IntoIter<Item>,
    is_func: &'a dyn Fn(&str) -> bool,
    vars: Vec<String>,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(name: &'a str, items: Vec<Item>, is_func: &'a dyn Fn(&str) -> bool) -> Self {
        Self { name, items: items.into_iter(), is_func, vars: vec![String::new()] }
    }

    /// Parses the whole template.
    pub(crate) fn parse(mut self) -> Result<Vec<Node>, TemplateError> {
        let (nodes, stop) = self.parse_list()?;
        match stop {
            None => Ok(nodes),
            Some(Stop::End { line }) => Err(self.error(line, "unexpected {{end}}")),
            Some(Stop::Else { line, .. }) => Err(self.error(line, "unexpected {{else}}")),
        }
    }

    fn error(&self, line: usize, message: impl Into<String>) -> TemplateError {
        TemplateError::Parse { name: self.name.to_string(), line, message: message.into() }
    }

    fn parse_list(&mut self) -> Result<(Vec<Node>, Option<Stop>), TemplateError> {
        let mut nodes = Vec::new();

        while let Some(item) = self.items.next() {
            let (tokens, line, source) = match item {
                Item::Text(text) => {
                    nodes.push(Node::Text(text));
                    continue;
                }
                Item::Action { tokens, line, source } => (tokens, line, source),
            };

            let keyword = match tokens.first() {
                Some(Token::Ident(word)) => word.as_str(),
                _ => "",
            };
            match keyword {
                "end" => {
                    if tokens.len() > 1 {
                        return Err(self.error(line, "unexpected tokens in end"));
                    }
                    return Ok((nodes, Some(Stop::End { line })));
                }
                "else" => {
                    let tokens = tokens[1..].to_vec();
                    return Ok((nodes, Some(Stop::Else { tokens, line, source })));
                }
                "if" => nodes.push(self.parse_control(Keyword::If, &tokens[1..], line, source)?),
                "range" => {
                    nodes.push(self.parse_control(Keyword::Range, &tokens[1..], line, source)?)
                }
                "with" => nodes.push(self.parse_control(Keyword::With, &tokens[1..], line, source)?),
                _ => {
                    let pipe = self.parse_pipeline(&tokens, line, true)?;
                    nodes.push(Node::Action(Action { line, source, pipe }));
                }
            }
        }

        Ok((nodes, None))
    }

    fn parse_control(
        &mut self,
        keyword: Keyword,
        tokens: &[Token],
        line: usize,
        source: String,
    ) -> Result<Node, TemplateError> {
        let scope = self.vars.len();
        let pipe = self.parse_pipeline(tokens, line, true)?;
        if keyword != Keyword::Range && pipe.decl.len() > 1 {
            return Err(self.error(line, format!("too many declarations in {}", keyword.as_str())));
        }
        if pipe.decl.len() > 2 {
            return Err(self.error(line, "too many declarations in range"));
        }

        let (body, stop) = self.parse_list()?;
        let otherwise = match stop {
            None => return Err(self.error(line, format!("unexpected EOF in {}", keyword.as_str()))),
            Some(Stop::End { .. }) => Vec::new(),
            Some(Stop::Else { tokens, line: else_line, source: else_source }) => {
                if tokens.is_empty() {
                    let (otherwise, stop) = self.parse_list()?;
                    match stop {
                        Some(Stop::End { .. }) => otherwise,
                        Some(Stop::Else { line, .. }) => {
                            return Err(self.error(line, "expected end; found {{else}}"))
                        }
                        None => {
                            return Err(self.error(else_line, format!("unexpected EOF in {}", keyword.as_str())))
                        }
                    }
                } else if keyword != Keyword::Range
                    && tokens.first() == Some(&Token::Ident(keyword.as_str().to_string()))
                {
                    // `else if` / `else with` chain into a nested control sharing one end.
                    vec![self.parse_control(keyword, &tokens[1..], else_line, else_source)?]
                } else {
                    return Err(self.error(else_line, "unexpected tokens after else"));
                }
            }
        };
        self.vars.truncate(scope);

        let control = Control { action: Action { line, source, pipe }, body, otherwise };
        Ok(match keyword {
            Keyword::If => Node::If(control),
            Keyword::Range => Node::Range(control),
            Keyword::With => Node::With(control),
        })
    }

    fn parse_pipeline(
        &mut self,
        tokens: &[Token],
        line: usize,
        allow_decl: bool,
    ) -> Result<Pipeline, TemplateError> {
        let mut pipe = Pipeline::default();
        let mut rest = tokens;

        if allow_decl {
            if let Some(position) = rest.iter().position(|token| *token == Token::Declare) {
                let declared = &rest[..position];
                for (i, token) in declared.iter().enumerate() {
                    match token {
                        Token::Variable(name, fields) if i % 2 == 0 && fields.is_empty() => {
                            pipe.decl.push(name.clone())
                        }
                        Token::Comma if i % 2 == 1 => {}
                        _ => return Err(self.error(line, "bad variable declaration")),
                    }
                }
                if pipe.decl.is_empty() || declared.len() % 2 == 0 {
                    return Err(self.error(line, "bad variable declaration"));
                }
                rest = &rest[position + 1..];
            }
        }

        if rest.is_empty() {
            return Err(self.error(line, "missing value for command"));
        }

        let mut depth = 0usize;
        let mut start = 0;
        for (i, token) in rest.iter().enumerate() {
            match token {
                Token::LParen => depth += 1,
                Token::RParen => {
                    depth = depth.checked_sub(1).ok_or_else(|| self.error(line, "unexpected right paren"))?
                }
                Token::Pipe if depth == 0 => {
                    pipe.commands.push(self.parse_command(&rest[start..i], line)?);
                    start = i + 1;
                }
                _ => {}
            }
        }
        if depth != 0 {
            return Err(self.error(line, "unclosed left paren"));
        }
        pipe.commands.push(self.parse_command(&rest[start..], line)?);

        // Declared names become visible after the declaring pipeline.
        self.vars.extend(pipe.decl.iter().cloned());
        Ok(pipe)
    }

    fn parse_command(&mut self, tokens: &[Token], line: usize) -> Result<Command, TemplateError> {
        if tokens.is_empty() {
            return Err(self.error(line, "missing command"));
        }

        let mut args = Vec::new();
        let mut i = 0;
        while i < tokens.len() {
            let arg = match &tokens[i] {
                Token::Dot => Arg::Dot,
                Token::Field(fields) => Arg::Field(fields.clone()),
                Token::Variable(name, fields) => {
                    if !self.vars.iter().any(|var| var == name) {
                        return Err(self.error(line, format!("undefined variable \"${name}\"")));
                    }
                    Arg::Variable(name.clone(), fields.clone())
                }
                Token::Ident(name) => {
                    if !(self.is_func)(name) {
                        return Err(self.error(line, format!("function {name:?} not defined")));
                    }
                    Arg::Func(name.clone())
                }
                Token::Str(s) => Arg::Str(s.clone()),
                Token::Int(n) => Arg::Int(*n),
                Token::Bool(b) => Arg::Bool(*b),
                Token::Nil => Arg::Nil,
                Token::LParen => {
                    let close = matching_paren(tokens, i)
                        .ok_or_else(|| self.error(line, "unclosed left paren"))?;
                    let inner = self.parse_pipeline(&tokens[i + 1..close], line, false)?;
                    i = close;
                    Arg::Sub(inner)
                }
                Token::RParen => return Err(self.error(line, "unexpected right paren")),
                Token::Pipe | Token::Comma | Token::Declare => {
                    return Err(self.error(line, "unexpected token in operand"))
                }
            };
            args.push(arg);
            i += 1;
        }

        Ok(Command { args })
    }
}

fn matching_paren(tokens: &[Token], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(open) {
        match token {
            Token::LParen => depth += 1,
            Token::RParen => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}
