//! Request correlation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier attached to every handled request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub String);

impl RequestId {
    /// Generate a new random request id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().simple().to_string())
    }

    /// Use the caller's id if it looks sane, otherwise generate one.
    pub fn from_header(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if !v.is_empty() && v.len() <= 128 && v.chars().all(|c| c.is_ascii_graphic()) => {
                Self(v.to_string())
            }
            _ => Self::generate(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::generate()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trace context propagated from an upstream caller.
///
/// Compatible with the W3C Trace Context `traceparent` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceContext {
    /// The trace ID (128-bit, hex encoded).
    pub trace_id: String,
    /// The parent span ID (64-bit, hex encoded).
    pub parent_span_id: String,
    pub sampled: bool,
}

impl TraceContext {
    /// Parse from a W3C traceparent header.
    ///
    /// Format: `{version}-{trace_id}-{span_id}-{flags}`
    /// Example: `00-0af7651916cd43dd8448eb211c80319c-b7ad6b7169203331-01`
    pub fn from_traceparent(header: &str) -> Option<Self> {
        let parts: Vec<&str> = header.trim().split('-').collect();
        if parts.len() != 4 || parts[0] != "00" {
            return None;
        }
        let is_hex = |s: &str, len: usize| s.len() == len && s.chars().all(|c| c.is_ascii_hexdigit());
        if !is_hex(parts[1], 32) || !is_hex(parts[2], 16) {
            return None;
        }
        let flags = u8::from_str_radix(parts[3], 16).ok()?;

        Some(Self {
            trace_id: parts[1].to_string(),
            parent_span_id: parts[2].to_string(),
            sampled: flags & 0x01 != 0,
        })
    }

    /// The trace id doubles as the request id for correlation.
    pub fn request_id(&self) -> RequestId {
        RequestId(self.trace_id.clone())
    }
}
