//! Splits template source into text and actions, and actions into tokens.

use super::TemplateError;

const LEFT_DELIM: &str = "{{";
const RIGHT_DELIM: &str = "}}";

/// Top-level piece of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Item {
    Text(String),
    Action { tokens: Vec<Token>, line: usize, source: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Token {
    /// `.`
    Dot,
    /// `.A.B`
    Field(Vec<String>),
    /// `$name.A.B`; the name is empty for `$`.
    Variable(String, Vec<String>),
    Ident(String),
    Str(String),
    Int(i64),
    Bool(bool),
    Nil,
    LParen,
    RParen,
    Pipe,
    Comma,
    Declare,
}

/// Splits `source` into text and action items, applying `{{-` and `-}}` trim markers.
pub(crate) fn split_items(name: &str, source: &str) -> Result<Vec<Item>, TemplateError> {
    let mut items = Vec::new();
    let mut pos = 0;
    let mut line = 1;

    while pos < source.len() {
        let Some(open) = source[pos..].find(LEFT_DELIM).map(|i| pos + i) else {
            items.push(Item::Text(source[pos..].to_string()));
            break;
        };

        let after_open = open + LEFT_DELIM.len();
        let trim_left = has_trim_marker(&source[after_open..]);
        let mut text = &source[pos..open];
        line += text.matches('\n').count();
        if trim_left {
            text = text.trim_end();
        }
        if !text.is_empty() {
            items.push(Item::Text(text.to_string()));
        }

        let content_start = if trim_left { after_open + 1 } else { after_open };
        let close = find_close(&source[content_start..])
            .map(|i| content_start + i)
            .ok_or_else(|| parse_error(name, line, "unclosed action"))?;

        let raw = &source[content_start..close];
        let trim_right = raw.ends_with('-') && raw[..raw.len() - 1].ends_with(char::is_whitespace);
        let content = if trim_right { &raw[..raw.len() - 1] } else { raw };

        let action_line = line;
        line += raw.matches('\n').count();

        let trimmed = content.trim();
        if trimmed.starts_with("/*") {
            if !trimmed.ends_with("*/") {
                return Err(parse_error(name, action_line, "unclosed comment"));
            }
        } else {
            let tokens = tokenize(content).map_err(|msg| parse_error(name, action_line, &msg))?;
            if tokens.is_empty() {
                return Err(parse_error(name, action_line, "missing value for command"));
            }
            items.push(Item::Action { tokens, line: action_line, source: trimmed.to_string() });
        }

        pos = close + RIGHT_DELIM.len();
        if trim_right {
            let rest = &source[pos..];
            let kept = rest.trim_start();
            line += rest[..rest.len() - kept.len()].matches('\n').count();
            pos += rest.len() - kept.len();
        }
    }

    Ok(items)
}

fn parse_error(name: &str, line: usize, message: &str) -> TemplateError {
    TemplateError::Parse { name: name.to_string(), line, message: message.to_string() }
}

/// `-` followed by whitespace right after `{{`.
fn has_trim_marker(rest: &str) -> bool {
    let mut chars = rest.chars();
    chars.next() == Some('-') && chars.next().is_some_and(char::is_whitespace)
}

/// Offset of the closing delimiter, ignoring delimiters inside quoted strings.
fn find_close(rest: &str) -> Option<usize> {
    let bytes = rest.as_bytes();
    let mut quote: Option<u8> = None;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Some(b'"') if b == b'\\' => i += 1,
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'`' => quote = Some(b),
            None if bytes[i..].starts_with(RIGHT_DELIM.as_bytes()) => return Some(i),
            None => {}
        }
        i += 1;
    }
    None
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Reads `.A.B` style field chains starting at `chars[i]`.
fn read_fields(chars: &[char], i: &mut usize) -> Vec<String> {
    let mut fields = Vec::new();
    while *i + 1 < chars.len() && chars[*i] == '.' && is_ident_char(chars[*i + 1]) {
        *i += 1;
        let start = *i;
        while *i < chars.len() && is_ident_char(chars[*i]) {
            *i += 1;
        }
        fields.push(chars[start..*i].iter().collect());
    }
    fields
}

/// Tokenizes the inside of one action.
pub(crate) fn tokenize(content: &str) -> Result<Vec<Token>, String> {
    let chars: Vec<char> = content.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
            '.' => {
                let fields = read_fields(&chars, &mut i);
                if fields.is_empty() {
                    tokens.push(Token::Dot);
                    i += 1;
                } else {
                    tokens.push(Token::Field(fields));
                }
            }
            '$' => {
                i += 1;
                let start = i;
                while i < chars.len() && is_ident_char(chars[i]) {
                    i += 1;
                }
                let name: String = chars[start..i].iter().collect();
                let fields = read_fields(&chars, &mut i);
                tokens.push(Token::Variable(name, fields));
            }
            '"' => {
                i += 1;
                let mut value = String::new();
                loop {
                    let Some(&ch) = chars.get(i) else {
                        return Err("unterminated quoted string".to_string());
                    };
                    i += 1;
                    match ch {
                        '"' => break,
                        '\\' => {
                            let escaped = chars.get(i).copied();
                            i += 1;
                            match escaped {
                                Some('n') => value.push('\n'),
                                Some('t') => value.push('\t'),
                                Some('r') => value.push('\r'),
                                Some('\\') => value.push('\\'),
                                Some('"') => value.push('"'),
                                Some(other) => return Err(format!("unknown escape sequence: \\{other}")),
                                None => return Err("unterminated quoted string".to_string()),
                            }
                        }
                        ch => value.push(ch),
                    }
                }
                tokens.push(Token::Str(value));
            }
            '`' => {
                i += 1;
                let start = i;
                while i < chars.len() && chars[i] != '`' {
                    i += 1;
                }
                if i == chars.len() {
                    return Err("unterminated raw quoted string".to_string());
                }
                tokens.push(Token::Str(chars[start..i].iter().collect()));
                i += 1;
            }
            c if c.is_ascii_digit() || (c == '-' && chars.get(i + 1).is_some_and(char::is_ascii_digit)) => {
                let start = i;
                i += 1;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
                let text: String = chars[start..i].iter().collect();
                let number = text.parse::<i64>().map_err(|_| format!("bad number syntax: {text:?}"))?;
                tokens.push(Token::Int(number));
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            '|' => {
                tokens.push(Token::Pipe);
                i += 1;
            }
            ',' => {
                tokens.push(Token::Comma);
                i += 1;
            }
            ':' if chars.get(i + 1) == Some(&'=') => {
                tokens.push(Token::Declare);
                i += 2;
            }
            c if c.is_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && is_ident_char(chars[i]) {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                tokens.push(match word.as_str() {
                    "true" => Token::Bool(true),
                    "false" => Token::Bool(false),
                    "nil" => Token::Nil,
                    _ => Token::Ident(word),
                });
            }
            other => return Err(format!("unexpected {other:?} in command")),
        }
    }

    Ok(tokens)
}
