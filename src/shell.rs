//! Interactive form editing
//!
//! Parses the line commands of `replayn shell` and applies row and field
//! edits to the form.

use crate::request::{KeyValue, RawRequestConfig};

pub const HELP: &str = "\
Commands:
  method <METHOD>          set the HTTP method
  url <URL>                set the URL
  param <key> [value]      add a parameter row (also key=value)
  header <Name>: <value>   add a header row
  body [text]              set the body text (no text clears it)
  params clear             remove all parameter rows
  headers clear            remove all header rows
  show                     print the form and the request it builds
  send                     send the form
  replay                   restore the last sent form and send it again
  clear                    reset the form and forget the last request
  help                     show this help
  quit                     leave the shell";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Method(String),
    Url(String),
    Param(KeyValue),
    Header(KeyValue),
    Body(String),
    ClearParams,
    ClearHeaders,
    Show,
    Send,
    Replay,
    Clear,
    Help,
    Quit,
    Empty,
    Invalid(String),
}

impl ShellCommand {
    /// Apply a form edit. Returns false for commands that are not edits.
    pub fn apply(&self, form: &mut RawRequestConfig) -> bool {
        match self {
            ShellCommand::Method(m) => form.method = m.to_ascii_uppercase(),
            ShellCommand::Url(u) => form.url = u.clone(),
            ShellCommand::Param(p) => form.params.push(p.clone()),
            ShellCommand::Header(h) => form.headers.push(h.clone()),
            ShellCommand::Body(b) => form.body_text = b.clone(),
            ShellCommand::ClearParams => form.params.clear(),
            ShellCommand::ClearHeaders => form.headers.clear(),
            _ => return false,
        }
        true
    }
}

pub fn parse_line(line: &str) -> ShellCommand {
    let line = line.trim_end_matches(['\r', '\n']);
    let trimmed = line.trim_start();
    if trimmed.is_empty() {
        return ShellCommand::Empty;
    }

    let (word, rest) = match trimmed.split_once(char::is_whitespace) {
        Some((w, r)) => (w, r),
        None => (trimmed, ""),
    };

    match word.to_ascii_lowercase().as_str() {
        "method" => match rest.trim() {
            "" => ShellCommand::Invalid("usage: method <METHOD>".to_string()),
            m => ShellCommand::Method(m.to_string()),
        },
        "url" => match rest.trim() {
            "" => ShellCommand::Invalid("usage: url <URL>".to_string()),
            u => ShellCommand::Url(u.to_string()),
        },
        "param" => match parse_param_pair(rest) {
            Some(p) => ShellCommand::Param(p),
            None => ShellCommand::Invalid("usage: param <key> [value]".to_string()),
        },
        "header" => match parse_header_line(rest) {
            Some(h) => ShellCommand::Header(h),
            None => ShellCommand::Invalid("usage: header <Name>: <value>".to_string()),
        },
        // body keeps its text verbatim apart from the separating space
        "body" => ShellCommand::Body(rest.to_string()),
        "params" if rest.trim() == "clear" => ShellCommand::ClearParams,
        "headers" if rest.trim() == "clear" => ShellCommand::ClearHeaders,
        "show" => ShellCommand::Show,
        "send" => ShellCommand::Send,
        "replay" => ShellCommand::Replay,
        "clear" => ShellCommand::Clear,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => ShellCommand::Invalid(format!("unknown command {other:?}, try help")),
    }
}

/// Parse `key=value` or `key value`
pub fn parse_param_pair(input: &str) -> Option<KeyValue> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    // `=` separates only when the text before it is a single word
    let separated = match input.split_once('=') {
        Some((k, v)) if !k.trim().contains(char::is_whitespace) => Some((k, v)),
        _ => input.split_once(char::is_whitespace),
    };
    let (key, value) = separated.unwrap_or((input, ""));

    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some(KeyValue::new(key, value.trim()))
}

/// Parse `Name: value`, `Name value`, or a bare `Name` with an empty value
pub fn parse_header_line(input: &str) -> Option<KeyValue> {
    let input = input.trim();
    let (name, value) = input
        .split_once(':')
        .or_else(|| input.split_once(char::is_whitespace))
        .unwrap_or((input, ""));

    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some(KeyValue::new(name, value.trim()))
}
