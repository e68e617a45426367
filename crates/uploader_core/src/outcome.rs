use std::fmt;

use serde::Deserialize;

use crate::disposition::suggested_filename;
use crate::filename::sanitize_download_name;
use crate::PayloadProfile;

/// Classified result of one submission cycle.
#[derive(Clone, PartialEq, Eq)]
pub enum ResponseOutcome {
    Success {
        payload: Vec<u8>,
        suggested_filename: String,
    },
    ServerError {
        message: String,
    },
    UnexpectedContent {
        raw_text: String,
    },
    TransportError {
        message: String,
    },
}

impl ResponseOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ResponseOutcome::Success { .. })
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ResponseOutcome::Success { .. } => "success",
            ResponseOutcome::ServerError { .. } => "server_error",
            ResponseOutcome::UnexpectedContent { .. } => "unexpected_content",
            ResponseOutcome::TransportError { .. } => "transport_error",
        }
    }
}

// Payloads can be megabytes; keep them out of logs.
impl fmt::Debug for ResponseOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseOutcome::Success {
                payload,
                suggested_filename,
            } => f
                .debug_struct("Success")
                .field("payload_len", &payload.len())
                .field("suggested_filename", suggested_filename)
                .finish(),
            ResponseOutcome::ServerError { message } => {
                f.debug_struct("ServerError").field("message", message).finish()
            }
            ResponseOutcome::UnexpectedContent { raw_text } => f
                .debug_struct("UnexpectedContent")
                .field("raw_text", raw_text)
                .finish(),
            ResponseOutcome::TransportError { message } => f
                .debug_struct("TransportError")
                .field("message", message)
                .finish(),
        }
    }
}

/// A completed HTTP response as captured by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    /// Status line such as `500 Internal Server Error`.
    pub status_line: String,
    pub content_type: Option<String>,
    pub content_disposition: Option<String>,
    pub body: Vec<u8>,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<serde_json::Value>,
}

/// Maps a completed response onto exactly one outcome for `profile`.
pub fn classify(reply: HttpReply, profile: &PayloadProfile) -> ResponseOutcome {
    if !reply.is_success() {
        return ResponseOutcome::ServerError {
            message: server_error_message(&reply),
        };
    }

    let content_type = reply.content_type.as_deref().unwrap_or("");
    if !profile.matches(content_type) {
        return ResponseOutcome::UnexpectedContent {
            raw_text: String::from_utf8_lossy(&reply.body).into_owned(),
        };
    }

    // The name shown to the user is the name written to disk.
    let suggested = suggested_filename(
        reply.content_disposition.as_deref(),
        &profile.default_filename,
    );
    let suggested_filename = sanitize_download_name(&suggested, &profile.default_filename);
    ResponseOutcome::Success {
        payload: reply.body,
        suggested_filename,
    }
}

/// JSON `error` field, else raw text, else the status line.
fn server_error_message(reply: &HttpReply) -> String {
    let text = String::from_utf8_lossy(&reply.body);
    if text.trim().is_empty() {
        return reply.status_line.clone();
    }
    match serde_json::from_str::<ErrorBody>(&text) {
        Ok(ErrorBody { error: Some(value) }) => {
            error_value_message(&value).unwrap_or_else(|| reply.status_line.clone())
        }
        Ok(_) => reply.status_line.clone(),
        Err(_) => text.into_owned(),
    }
}

/// Text of an `error` value. Null, false, zero and "" carry no message.
fn error_value_message(value: &serde_json::Value) -> Option<String> {
    use serde_json::Value;

    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(message) if message.is_empty() => None,
        Value::String(message) => Some(message.clone()),
        Value::Number(number) if number.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

/// Describes a transport failure the way it is shown to the user.
pub fn transport_error(message: impl Into<String>) -> ResponseOutcome {
    ResponseOutcome::TransportError {
        message: message.into(),
    }
}
