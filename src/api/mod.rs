// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Theta Omicron Chapter

//! HTTP API.
//!
//! Chapter endpoints are all `POST` and answer with the response envelope.
//! Health probes are plain `GET`s and Swagger UI is served at `/docs`.

use std::any::Any;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    envelope::Envelope,
    error::INTERNAL_ERROR_MESSAGE,
    models::{
        AddMemberResponse, AssignChairRequest, AssignChairResponse, Brother, BrothersResponse, Chair,
        ChairsResponse, CommitteeMember, CommitteeResponse, LoginRequest, MemberStatus,
        NewMemberRequest, Page, PageListResponse, PageRequest, PageResponse, Position,
        SessionResponse, SetPageRequest,
    },
    state::AppState,
};

pub mod health;
pub mod members;
pub mod pages;
pub mod reply;
pub mod session;

pub use reply::{Payload, Reply, RouteResult};

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/login", post(session::login))
        .route("/auth", post(session::check_session))
        .route("/getRush", post(members::get_rush))
        .route("/getEC", post(members::get_ec))
        .route("/getBros", post(members::get_bros))
        .route("/getChairs", post(members::get_chairs))
        .route("/addMember", post(members::add_member))
        .route("/assignChair", post(members::assign_chair))
        .route("/getPage", post(pages::get_page))
        .route("/listPages", post(pages::list_pages))
        .route("/setPage", post(pages::set_page))
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state);

    Router::new()
        .merge(api_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

async fn not_found() -> Envelope {
    Envelope::failure(StatusCode::NOT_FOUND, "Not Found")
}

async fn method_not_allowed() -> Envelope {
    Envelope::failure(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = panic.downcast_ref::<String>() {
        message.as_str()
    } else if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else {
        "unknown panic payload"
    };
    tracing::error!(panic = %detail, "Route handler panicked");
    Envelope::failure(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE).into_response()
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        session::login,
        session::check_session,
        members::get_rush,
        members::get_ec,
        members::get_bros,
        members::get_chairs,
        members::add_member,
        members::assign_chair,
        pages::get_page,
        pages::list_pages,
        pages::set_page,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            LoginRequest,
            SessionResponse,
            CommitteeMember,
            CommitteeResponse,
            Position,
            Brother,
            BrothersResponse,
            Chair,
            ChairsResponse,
            MemberStatus,
            NewMemberRequest,
            AddMemberResponse,
            AssignChairRequest,
            AssignChairResponse,
            Page,
            PageRequest,
            SetPageRequest,
            PageResponse,
            PageListResponse,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Session", description = "Login and session renewal"),
        (name = "Roster", description = "Members, committees and chairs"),
        (name = "Pages", description = "Editable site content"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;
