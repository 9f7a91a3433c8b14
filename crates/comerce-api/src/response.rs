//! Response envelopes.
//!
//! Every response body is a JSON object with a `messages` list, plus
//! endpoint-specific fields.

use comerce_domain::message::{Message, Report};
use http::header::{HeaderValue, CONTENT_TYPE};
use http::StatusCode;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::ApiError;

/// A handled request, before it becomes an `http::Response`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: StatusCode, report: Report) -> Self {
        let mut body = Map::new();
        body.insert("messages".to_string(), messages_value(&report.messages));
        Self {
            status,
            body: Value::Object(body),
        }
    }

    pub fn ok(report: Report) -> Self {
        Self::new(StatusCode::OK, report)
    }

    pub fn created(report: Report) -> Self {
        Self::new(StatusCode::CREATED, report)
    }

    /// Attach an extra top-level field.
    pub fn with_field(mut self, key: &str, value: impl Serialize) -> Self {
        let value = match serde_json::to_value(value) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!(error = %e, field = key, "failed to serialize response field");
                return Self::from(ApiError::Commerce(comerce_domain::CommerceError::Server(
                    e.to_string(),
                )));
            }
        };
        if let Value::Object(body) = &mut self.body {
            body.insert(key.to_string(), value);
        }
        self
    }

    /// Messages in the body.
    pub fn messages(&self) -> Vec<Message> {
        self.body
            .get("messages")
            .and_then(|m| serde_json::from_value(m.clone()).ok())
            .unwrap_or_default()
    }

    pub fn into_http(self) -> http::Response<Vec<u8>> {
        let bytes = serde_json::to_vec(&self.body).unwrap_or_else(|_| b"{\"messages\":[]}".to_vec());
        let mut response = http::Response::new(bytes);
        *response.status_mut() = self.status;
        response
            .headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        response
    }
}

impl From<ApiError> for ApiResponse {
    fn from(e: ApiError) -> Self {
        let status = e.status();
        if status.is_server_error() {
            tracing::error!(error = %e, "request failed");
        } else {
            tracing::info!(error = %e, status = status.as_u16(), "request rejected");
        }
        Self::new(status, Report::from(vec![Message::error(e.public_message())]))
    }
}

fn messages_value(messages: &[Message]) -> Value {
    serde_json::to_value(messages).unwrap_or_else(|_| Value::Array(Vec::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use comerce_domain::message::Severity;

    #[test]
    fn test_envelope_shape() {
        let response = ApiResponse::created(Report::from(vec![Message::success("Order placed")]))
            .with_field("order_id", "o1");
        assert_eq!(response.status, StatusCode::CREATED);
        assert_eq!(response.body["messages"][0]["message"], "Order placed");
        assert_eq!(response.body["messages"][0]["severity"], "success");
        assert_eq!(response.body["order_id"], "o1");
        assert_eq!(response.messages()[0].severity, Severity::Success);
    }

    #[test]
    fn test_error_envelope() {
        let response = ApiResponse::from(ApiError::InvalidBody("empty body".into()));
        assert_eq!(response.status, StatusCode::NOT_ACCEPTABLE);
        assert_eq!(response.body["messages"][0]["severity"], "error");

        let http = response.into_http();
        assert_eq!(http.status(), StatusCode::NOT_ACCEPTABLE);
        assert_eq!(http.headers()[CONTENT_TYPE], "application/json");
        let body: Value = serde_json::from_slice(http.body()).unwrap();
        assert!(body["messages"].is_array());
    }
}
