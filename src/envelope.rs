// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Theta Omicron Chapter

//! # Response Envelope
//!
//! Every endpoint answers with the same JSON shape:
//!
//! ```text
//! { "success": true,  ...payload }
//! { "success": false, "error": "<message>" }
//! ```
//!
//! `success` is derived from the HTTP status alone: it is `true` exactly
//! when the status lies in `[200, 300)`. The client gateway decodes the same
//! shape back into an [`Envelope`].

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{Map, Value};

/// Field carrying the outcome flag.
pub const SUCCESS_FIELD: &str = "success";

/// Field carrying the failure message.
pub const ERROR_FIELD: &str = "error";

/// Merge `content` with the `success` flag implied by `status`.
///
/// Any `success` key already present in `content` is overwritten.
pub fn build(status: StatusCode, mut content: Map<String, Value>) -> Value {
    content.insert(SUCCESS_FIELD.to_string(), Value::Bool(status.is_success()));
    Value::Object(content)
}

/// Outcome of a request as seen on the wire.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    Success {
        status: StatusCode,
        payload: Map<String, Value>,
    },
    Failure {
        status: StatusCode,
        message: String,
    },
}

impl Envelope {
    pub fn failure(status: StatusCode, message: impl Into<String>) -> Self {
        Envelope::Failure {
            status,
            message: message.into(),
        }
    }

    /// Classify a handler result by its status.
    ///
    /// For failure statuses the message is taken from the `error` field of
    /// `content`, falling back to the status' canonical reason.
    pub fn from_parts(status: StatusCode, mut content: Map<String, Value>) -> Self {
        if status.is_success() {
            content.remove(SUCCESS_FIELD);
            return Envelope::Success {
                status,
                payload: content,
            };
        }

        let message = match content.remove(ERROR_FIELD) {
            Some(Value::String(message)) => message,
            _ => status.canonical_reason().unwrap_or("Request failed").to_string(),
        };
        Envelope::Failure { status, message }
    }

    /// Decode an envelope received over HTTP.
    ///
    /// A body whose `success` flag is not literally `true` is a failure,
    /// whatever the status says.
    pub fn from_json(status: StatusCode, body: Value) -> Self {
        let mut fields = match body {
            Value::Object(fields) => fields,
            other => {
                return Envelope::Failure {
                    status,
                    message: format!("unexpected response body: {other}"),
                }
            }
        };

        match fields.remove(SUCCESS_FIELD) {
            Some(Value::Bool(true)) => Envelope::Success {
                status,
                payload: fields,
            },
            _ => {
                let message = match fields.remove(ERROR_FIELD) {
                    Some(Value::String(message)) => message,
                    Some(other) => other.to_string(),
                    None => String::new(),
                };
                Envelope::Failure { status, message }
            }
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Envelope::Success { status, .. } | Envelope::Failure { status, .. } => *status,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Envelope::Success { .. })
    }

    /// Payload of a successful envelope.
    pub fn payload(&self) -> Option<&Map<String, Value>> {
        match self {
            Envelope::Success { payload, .. } => Some(payload),
            Envelope::Failure { .. } => None,
        }
    }

    /// Failure message, if any.
    pub fn error(&self) -> Option<&str> {
        match self {
            Envelope::Failure { message, .. } => Some(message),
            Envelope::Success { .. } => None,
        }
    }

    /// Render the wire representation.
    pub fn to_json(&self) -> Value {
        match self {
            Envelope::Success { status, payload } => build(*status, payload.clone()),
            Envelope::Failure { status, message } => {
                let mut content = Map::new();
                content.insert(ERROR_FIELD.to_string(), Value::String(message.clone()));
                build(*status, content)
            }
        }
    }
}

impl IntoResponse for Envelope {
    fn into_response(self) -> Response {
        let status = self.status();
        (status, Json(self.to_json())).into_response()
    }
}
