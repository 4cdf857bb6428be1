// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Theta Omicron Chapter

//! Editable page content for the public site.

use axum::extract::State;
use chrono::Utc;

use super::reply::{Payload, Reply, RouteResult};
use crate::{
    auth::Auth,
    error::{ApiError, RouteError},
    models::{Page, PageListResponse, PageRequest, PageResponse, SetPageRequest},
    state::AppState,
    validation::is_valid_slug,
};

fn checked_slug(slug: &str) -> Result<&str, RouteError> {
    let slug = slug.trim();
    if !is_valid_slug(slug) {
        return Err(ApiError::bad_request(format!("Invalid page slug `{slug}`")).into());
    }
    Ok(slug)
}

#[utoipa::path(
    post,
    path = "/getPage",
    request_body = PageRequest,
    tag = "Pages",
    responses(
        (status = 200, description = "Page content", body = PageResponse),
        (status = 400, description = "Invalid slug"),
        (status = 404, description = "No such page")
    )
)]
pub async fn get_page(
    State(state): State<AppState>,
    Payload(request): Payload<PageRequest>,
) -> RouteResult {
    let slug = checked_slug(&request.slug)?;
    let page: Page = state.documents.read(slug)?;
    Reply::ok(PageResponse { page })
}

#[utoipa::path(
    post,
    path = "/listPages",
    tag = "Pages",
    responses((status = 200, description = "Slugs of all pages", body = PageListResponse))
)]
pub async fn list_pages(State(state): State<AppState>) -> RouteResult {
    Reply::ok(PageListResponse {
        pages: state.documents.list()?,
    })
}

/// Create or replace a page.
#[utoipa::path(
    post,
    path = "/setPage",
    request_body = SetPageRequest,
    tag = "Pages",
    security(("bearer" = [])),
    responses(
        (status = 200, description = "Page stored", body = PageResponse),
        (status = 400, description = "Invalid slug or empty title"),
        (status = 401, description = "Not signed in")
    )
)]
pub async fn set_page(
    Auth(caller): Auth,
    State(state): State<AppState>,
    Payload(request): Payload<SetPageRequest>,
) -> RouteResult {
    let slug = checked_slug(&request.slug)?;
    let title = request.title.trim();
    if title.is_empty() {
        return Err(ApiError::bad_request("Page title is required.").into());
    }

    let page = Page {
        slug: slug.to_string(),
        title: title.to_string(),
        body: request.body,
        updated_at: Utc::now(),
        updated_by: caller.member_id,
    };
    state.documents.write(&page.slug, &page)?;

    tracing::info!(slug = %page.slug, updated_by = %page.updated_by, "Page saved");
    Reply::ok(PageResponse { page })
}
