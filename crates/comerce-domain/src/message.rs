//! Report messages returned to callers of batch operations.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::CommerceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Information,
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Information => "information",
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
    pub severity: Severity,
}

impl Message {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Information, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(Severity::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }
}

impl From<&CommerceError> for Message {
    fn from(e: &CommerceError) -> Self {
        let severity = match e {
            CommerceError::InsufficientInventory { .. } => Severity::Warning,
            _ => Severity::Error,
        };
        Message::new(severity, e.to_string())
    }
}

/// Ordered list of messages produced by one call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Report {
    pub messages: Vec<Message>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn extend(&mut self, other: Report) {
        self.messages.extend(other.messages);
    }

    /// Highest severity present.
    pub fn worst(&self) -> Option<Severity> {
        self.messages.iter().map(|m| m.severity).max()
    }

    pub fn has(&self, severity: Severity) -> bool {
        self.messages.iter().any(|m| m.severity == severity)
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }
}

impl From<Vec<Message>> for Report {
    fn from(messages: Vec<Message>) -> Self {
        Self { messages }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_serializes_lowercase() {
        let m = Message::warning("Rice has insufficient quantity");
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["severity"], "warning");
    }

    #[test]
    fn test_worst_severity() {
        let mut report = Report::new();
        report.push(Message::info("a"));
        report.push(Message::warning("b"));
        report.push(Message::success("c"));
        assert_eq!(report.worst(), Some(Severity::Warning));
    }

    #[test]
    fn test_shortfall_error_is_a_warning() {
        let e = CommerceError::InsufficientInventory {
            product_id: "p1".into(),
            requested: 5,
            shortfall: 2,
        };
        assert_eq!(Message::from(&e).severity, Severity::Warning);
    }
}
