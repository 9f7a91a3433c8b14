//! Terminal output.
//!
//! Human output goes to stdout, warnings and errors to stderr. In `--json`
//! mode only machine-readable values are printed.

use comerce_domain::message::{Report, Severity};
use comerce_domain::OrderStatus;
use console::style;
use serde::Serialize;

#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    pub fn is_json(&self) -> bool {
        self.json
    }

    fn human(&self) -> bool {
        !self.json
    }

    pub fn info(&self, msg: &str) {
        if self.human() {
            println!("{} {}", style("ℹ").cyan(), msg);
        }
    }

    pub fn success(&self, msg: &str) {
        if self.human() {
            println!("{} {}", style("✓").green().bold(), msg);
        }
    }

    pub fn warn(&self, msg: &str) {
        if self.human() {
            eprintln!("{} {}", style("!").yellow().bold(), style(msg).yellow());
        }
    }

    /// Printed in both modes; JSON mode wraps it in `{"error": ...}`.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        } else {
            eprintln!("{} {}", style("✗").red().bold(), style(msg).red());
        }
    }

    /// Only with `--verbose`.
    pub fn debug(&self, msg: &str) {
        if self.verbose && self.human() {
            eprintln!("  {}", style(msg).dim());
        }
    }

    pub fn header(&self, title: &str) {
        if self.human() {
            println!("\n{}", style(title).bold());
        }
    }

    pub fn json<T: Serialize>(&self, value: &T) {
        match serde_json::to_string_pretty(value) {
            Ok(json) => println!("{}", json),
            Err(e) => self.error(&format!("Failed to encode output: {}", e)),
        }
    }

    pub fn kv(&self, key: &str, value: &str) {
        if self.human() {
            println!("  {:<12} {}", style(key).dim(), value);
        }
    }

    pub fn list_item(&self, item: &str) {
        if self.human() {
            println!("  - {}", item);
        }
    }

    /// One row of left-aligned columns.
    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if !self.human() {
            return;
        }
        let row = cols
            .iter()
            .zip(widths)
            .map(|(col, width)| format!("{:<width$}", col, width = *width))
            .collect::<Vec<_>>()
            .join("  ");
        println!("  {}", row.trim_end());
    }

    /// Print every message of an operation report by severity.
    pub fn report(&self, report: &Report) {
        if self.json {
            self.json(report);
            return;
        }
        if report.is_empty() {
            self.info("Nothing to report.");
        }
        for message in &report.messages {
            match message.severity {
                Severity::Information => self.info(&message.message),
                Severity::Success => self.success(&message.message),
                Severity::Warning => self.warn(&message.message),
                Severity::Error => self.error(&message.message),
            }
        }
    }
}

/// Colored fulfillment status.
pub fn status_badge(status: OrderStatus) -> String {
    let label = style(status.to_string());
    match status {
        OrderStatus::Review | OrderStatus::Fulfilled => label.green(),
        OrderStatus::FailedCancelled => label.red(),
        OrderStatus::Placed => label.dim(),
        _ => label.yellow(),
    }
    .to_string()
}
