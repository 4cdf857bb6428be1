// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Theta Omicron Chapter

//! Route errors.
//!
//! Handlers fail with a [`RouteError`]. An [`ApiError`] carries a status and
//! a message meant for the caller; everything else is internal, gets logged
//! here and leaves the server as a generic 500 envelope.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::auth::AuthError;
use crate::envelope::Envelope;
use crate::storage::{DocumentError, StoreError};

/// Message returned for every failure not meant for the caller.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal Server Error";

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        Envelope::failure(self.status, self.message).into_response()
    }
}

/// Failure of a route handler.
#[derive(Debug)]
pub enum RouteError {
    /// Failure with a status and message for the caller.
    Api(ApiError),
    /// Anything else. Logged, never shown.
    Internal(Box<dyn std::error::Error + Send + Sync>),
}

impl RouteError {
    pub fn internal(error: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        RouteError::Internal(error.into())
    }

    /// Status this error will be answered with.
    pub fn status(&self) -> StatusCode {
        match self {
            RouteError::Api(err) => err.status,
            RouteError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for RouteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RouteError::Api(err) => write!(f, "{err}"),
            RouteError::Internal(err) => write!(f, "internal error: {err}"),
        }
    }
}

impl std::error::Error for RouteError {}

impl IntoResponse for RouteError {
    fn into_response(self) -> Response {
        match self {
            RouteError::Api(err) => {
                tracing::debug!(status = %err.status, error = %err.message, "Request rejected");
                err.into_response()
            }
            RouteError::Internal(err) => {
                tracing::error!(error = %err, "Unhandled error in route handler");
                Envelope::failure(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
                    .into_response()
            }
        }
    }
}

impl From<ApiError> for RouteError {
    fn from(err: ApiError) -> Self {
        RouteError::Api(err)
    }
}

impl From<AuthError> for RouteError {
    fn from(err: AuthError) -> Self {
        let status = err.status_code();
        if status.is_server_error() {
            RouteError::internal(err)
        } else {
            RouteError::Api(ApiError::new(status, err.to_string()))
        }
    }
}

impl From<StoreError> for RouteError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => RouteError::Api(ApiError::not_found(format!("{what} not found"))),
            StoreError::AlreadyExists(what) => {
                RouteError::Api(ApiError::conflict(format!("{what} already exists")))
            }
            other => RouteError::internal(other),
        }
    }
}

impl From<DocumentError> for RouteError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::NotFound(what) => RouteError::Api(ApiError::not_found(format!("{what} not found"))),
            other => RouteError::internal(other),
        }
    }
}

impl From<serde_json::Error> for RouteError {
    fn from(err: serde_json::Error) -> Self {
        RouteError::internal(err)
    }
}

impl From<JsonRejection> for RouteError {
    fn from(rejection: JsonRejection) -> Self {
        RouteError::Api(ApiError::new(rejection.status(), rejection.body_text()))
    }
}
