// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Theta Omicron Chapter

//! HTTP wrapper for the chapter API.
//!
//! Every call is a `POST` to `<endpoint>/<api>`. Successful responses are
//! decoded into an [`Envelope`]; everything else comes back as a
//! [`GatewayError`] value.

use reqwest::header::{HeaderMap, HeaderValue, InvalidHeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{multipart, StatusCode};
use serde_json::{Map, Value};
use thiserror::Error;
use url::Url;

use crate::envelope::{Envelope, ERROR_FIELD};

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("invalid API endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    #[error("invalid header value: {0}")]
    InvalidHeader(#[from] InvalidHeaderValue),

    #[error("HTTP error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("API error ({status}): {body}")]
    Status { status: StatusCode, body: String },

    #[error("invalid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

impl GatewayError {
    /// Text to show the user.
    ///
    /// For a failed status this is the envelope's `error` field when the body
    /// is an envelope, and the raw body otherwise.
    pub fn message(&self) -> String {
        match self {
            GatewayError::Status { body, .. } => match serde_json::from_str::<Value>(body) {
                Ok(Value::Object(fields)) => match fields.get(ERROR_FIELD) {
                    Some(Value::String(message)) => message.clone(),
                    _ => body.clone(),
                },
                _ => body.clone(),
            },
            other => other.to_string(),
        }
    }

    /// Status of the response, when one was received.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            GatewayError::Status { status, .. } => Some(*status),
            GatewayError::Network(err) => err.status(),
            _ => None,
        }
    }
}

/// Request body of an API call.
#[derive(Debug)]
pub enum RequestBody {
    /// Sent as `application/json`.
    Json(Value),
    /// Sent as `multipart/form-data`; headers pass through untouched.
    Form(multipart::Form),
}

impl RequestBody {
    /// `{}`
    pub fn empty() -> Self {
        RequestBody::Json(Value::Object(Map::new()))
    }
}

impl From<Value> for RequestBody {
    fn from(value: Value) -> Self {
        RequestBody::Json(value)
    }
}

impl From<multipart::Form> for RequestBody {
    fn from(form: multipart::Form) -> Self {
        RequestBody::Form(form)
    }
}

/// `Authorization: Bearer <token>` as a header map.
pub fn bearer(token: &str) -> Result<HeaderMap, GatewayError> {
    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {token}"))?);
    Ok(headers)
}

#[derive(Debug, Clone)]
pub struct ApiGateway {
    endpoint: Url,
    http: reqwest::Client,
}

impl ApiGateway {
    pub fn new(endpoint: &str) -> Result<Self, GatewayError> {
        Self::with_client(endpoint, reqwest::Client::new())
    }

    pub fn with_client(endpoint: &str, http: reqwest::Client) -> Result<Self, GatewayError> {
        let mut endpoint = Url::parse(endpoint)?;
        if !endpoint.path().ends_with('/') {
            let path = format!("{}/", endpoint.path());
            endpoint.set_path(&path);
        }
        Ok(Self { endpoint, http })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// POST `body` to `api`.
    ///
    /// JSON bodies get `Content-Type: application/json`, with `headers`
    /// applied on top. Form bodies send `headers` unmodified.
    pub async fn call(
        &self,
        api: &str,
        body: RequestBody,
        headers: HeaderMap,
    ) -> Result<Envelope, GatewayError> {
        let url = self.endpoint.join(api.trim_start_matches('/'))?;
        let request = self.http.post(url);
        let request = match body {
            RequestBody::Json(value) => {
                let mut merged = HeaderMap::new();
                merged.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                merged.extend(headers);
                request.headers(merged).body(serde_json::to_vec(&value)?)
            }
            RequestBody::Form(form) => request.headers(headers).multipart(form),
        };

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(api, error = %err, "API call failed");
                return Err(err.into());
            }
        };

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            tracing::warn!(api, status = status.as_u16(), "API call returned an error status");
            return Err(GatewayError::Status { status, body: text });
        }

        let body: Value = serde_json::from_str(&text).inspect_err(|err| {
            tracing::warn!(api, error = %err, "API call returned invalid JSON");
        })?;
        Ok(Envelope::from_json(status, body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MemberStatus;
    use crate::test_support::{add_member, spawn_server, test_state};
    use serde_json::json;

    async fn gateway() -> (ApiGateway, crate::state::AppState, tempfile::TempDir) {
        let (state, dir) = test_state();
        let addr = spawn_server(state.clone()).await;
        let gateway = ApiGateway::new(&format!("http://{addr}")).unwrap();
        (gateway, state, dir)
    }

    #[test]
    fn endpoint_gets_trailing_slash() {
        let gateway = ApiGateway::new("http://localhost:3001/api").unwrap();
        assert_eq!(gateway.endpoint().as_str(), "http://localhost:3001/api/");
        assert!(matches!(ApiGateway::new("not a url"), Err(GatewayError::InvalidEndpoint(_))));
    }

    #[test]
    fn message_prefers_envelope_error() {
        let err = GatewayError::Status {
            status: StatusCode::UNAUTHORIZED,
            body: r#"{"success":false,"error":"Invalid email or password."}"#.to_string(),
        };
        assert_eq!(err.message(), "Invalid email or password.");

        let err = GatewayError::Status {
            status: StatusCode::BAD_GATEWAY,
            body: "upstream timed out".to_string(),
        };
        assert_eq!(err.message(), "upstream timed out");
        assert_eq!(err.status(), Some(StatusCode::BAD_GATEWAY));
    }

    #[tokio::test]
    async fn success_is_decoded_into_envelope() {
        let (gateway, _state, _dir) = gateway().await;

        let envelope = gateway
            .call("getChairs", RequestBody::empty(), HeaderMap::new())
            .await
            .unwrap();
        assert!(envelope.is_success());
        assert_eq!(envelope.status(), StatusCode::OK);
        assert_eq!(envelope.payload().unwrap()["chairs"].as_array().unwrap().len(), 16);
    }

    #[tokio::test]
    async fn error_status_is_returned_not_raised() {
        let (gateway, state, _dir) = gateway().await;
        add_member(&state, "Sam", "Rivera", "sam@example.edu", "hunter22", MemberStatus::Initiate);

        let err = gateway
            .call(
                "login",
                json!({"email": "sam@example.edu", "password": "wrong"}).into(),
                HeaderMap::new(),
            )
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
        assert_eq!(err.message(), "Invalid email or password.");
    }

    #[tokio::test]
    async fn caller_headers_reach_the_server() {
        let (gateway, state, _dir) = gateway().await;
        let id = add_member(&state, "Sam", "Rivera", "sam@example.edu", "hunter22", MemberStatus::Initiate);
        let token = state.tokens.issue(&id).unwrap().token;

        let envelope = gateway
            .call("auth", RequestBody::empty(), bearer(&token).unwrap())
            .await
            .unwrap();
        assert_eq!(envelope.payload().unwrap()["memberId"], id.as_str());
    }

    #[tokio::test]
    async fn unreachable_server_is_network_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let gateway = ApiGateway::new(&format!("http://{addr}")).unwrap();
        let err = gateway
            .call("getEC", RequestBody::empty(), HeaderMap::new())
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Network(_)));
    }
}
