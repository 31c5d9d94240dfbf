//! Output formatting for send and replay outcomes
//!
//! Supports pretty (colored terminal), JSON, and compact formats.

use colored::Colorize;

use crate::error::ErrorKind;
use crate::executor::ResponseResult;
use crate::request::RequestDescriptor;
use crate::session::Outcome;

/// Print an outcome in pretty format: status line, timing line, body
pub fn print_outcome_pretty(outcome: &Outcome) {
    match outcome {
        Outcome::Response(response) => print_response_pretty(response),
        Outcome::Error(error) => {
            let label = match error.kind {
                ErrorKind::NoPriorRequest => "Notice".yellow().bold(),
                _ => "Error".red().bold(),
            };
            println!("{} {}", "Status:".bold(), label);
            println!("{}", "Time:".bold());
            println!();
            println!("Error: {}", error.message);
        }
    }
}

fn print_response_pretty(response: &ResponseResult) {
    println!(
        "{} {}",
        "Status:".bold(),
        format_status(response.status_code, &response.status_line())
    );
    println!("{} {}", "Time:".bold(), response.elapsed_display());
    println!(
        "{} {}",
        "Sent:".dimmed(),
        response
            .started_at
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string()
            .dimmed()
    );
    println!("{}", "─".repeat(60).dimmed());
    println!("{}", response.body_text);
}

/// Print the descriptor a form would send
pub fn print_descriptor_pretty(descriptor: &RequestDescriptor) {
    println!("{} {}", descriptor.method.bold(), descriptor.url);
    for (name, value) in &descriptor.headers {
        println!("{}: {}", name.dimmed(), value);
    }
    if let Some(ref body) = descriptor.body {
        println!();
        println!("{}", body);
    }
}

/// Format status with color by class
fn format_status(status: u16, text: &str) -> String {
    if status >= 500 {
        text.red().to_string()
    } else if status >= 400 {
        text.yellow().to_string()
    } else if status >= 300 {
        text.cyan().to_string()
    } else {
        text.green().to_string()
    }
}

/// Print outcome as JSON
pub fn print_outcome_json(outcome: &Outcome) -> String {
    serde_json::to_string_pretty(outcome).unwrap_or_else(|_| "{}".to_string())
}

/// Print outcome in compact format
pub fn print_outcome_compact(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Response(r) => format!(
            "{} {} {}B",
            r.status_line(),
            r.elapsed_display(),
            r.body_size
        ),
        Outcome::Error(e) => format!("ERR {}", e.message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorResult;
    use chrono::Utc;

    fn response() -> ResponseResult {
        ResponseResult {
            status_code: 404,
            status_text: "Not Found".to_string(),
            elapsed_ms: 12.3456,
            body_text: "missing".to_string(),
            body_size: 7,
            started_at: Utc::now(),
        }
    }

    #[test]
    fn test_compact_response() {
        let line = print_outcome_compact(&Outcome::Response(response()));
        assert_eq!(line, "404 Not Found 12.35ms 7B");
    }

    #[test]
    fn test_compact_error() {
        let outcome = Outcome::Error(ErrorResult {
            kind: ErrorKind::Transport,
            message: "request failed: connection refused".to_string(),
        });
        assert_eq!(
            print_outcome_compact(&outcome),
            "ERR request failed: connection refused"
        );
    }

    #[test]
    fn test_json_is_tagged() {
        let json = print_outcome_json(&Outcome::Response(response()));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["outcome"], "response");
        assert_eq!(value["status_code"], 404);
        assert_eq!(value["body_text"], "missing");
    }
}
