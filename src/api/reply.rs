// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Theta Omicron Chapter

//! Handler results.
//!
//! Every handler returns a [`RouteResult`]. A [`Reply`] carries a status and
//! the fields of the body; the envelope's `success` flag is added when it is
//! rendered. Errors go through [`RouteError`], so no handler formats a
//! failure body by hand.

use axum::{
    extract::FromRequest,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::envelope::Envelope;
use crate::error::RouteError;

pub type RouteResult = Result<Reply, RouteError>;

/// Key used when a handler's content is not a JSON object.
const DATA_FIELD: &str = "data";

#[derive(Debug, Clone)]
pub struct Reply {
    status: StatusCode,
    content: Map<String, Value>,
}

impl Reply {
    pub fn new(status: StatusCode, content: impl Serialize) -> Result<Self, RouteError> {
        let content = match serde_json::to_value(content)? {
            Value::Object(fields) => fields,
            Value::Null => Map::new(),
            other => {
                let mut fields = Map::new();
                fields.insert(DATA_FIELD.to_string(), other);
                fields
            }
        };
        Ok(Self { status, content })
    }

    /// 200 with the given content.
    pub fn ok(content: impl Serialize) -> RouteResult {
        Self::new(StatusCode::OK, content)
    }

    /// 201 with the given content.
    pub fn created(content: impl Serialize) -> RouteResult {
        Self::new(StatusCode::CREATED, content)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        Envelope::from_parts(self.status, self.content).into_response()
    }
}

/// JSON request body whose rejections are failure envelopes.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(RouteError))]
pub struct Payload<T>(pub T);
