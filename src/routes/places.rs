// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Public place routes backed by TourAPI.

use crate::error::{AppError, Result};
use crate::models::{AreaCode, ContentType, IntroDetail, Page, Place, PlaceImage, SortMode};
use crate::services::{PlaceFilter, PlaceOverview};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

/// Place routes (no authentication).
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/areas", get(get_areas))
        .route("/api/places", get(list_places))
        .route("/api/search", get(search_places))
        .route("/api/places/{content_id}", get(get_place))
        .route("/api/places/{content_id}/intro", get(get_place_intro))
        .route("/api/places/{content_id}/images", get(get_place_images))
}

// ─── Areas ───────────────────────────────────────────────────

#[derive(Deserialize, Validate)]
struct AreaQuery {
    #[validate(length(max = 10))]
    parent: Option<String>,
}

async fn get_areas(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AreaQuery>,
) -> Result<Json<Vec<AreaCode>>> {
    validate(&params)?;
    let areas = state.places.area_codes(params.parent.as_deref()).await?;
    Ok(Json(areas))
}

// ─── Lists & Search ──────────────────────────────────────────

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
struct PlaceQuery {
    #[validate(length(max = 100))]
    keyword: Option<String>,
    #[validate(length(max = 10))]
    area_code: Option<String>,
    #[validate(length(max = 10))]
    sigungu_code: Option<String>,
    content_type_id: Option<String>,
    #[serde(default = "default_page")]
    #[validate(range(min = 1, max = 10000))]
    page: u32,
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 100))]
    page_size: u32,
    arrange: Option<String>,
}

fn default_page() -> u32 {
    1
}
fn default_page_size() -> u32 {
    crate::services::places::DEFAULT_PAGE_SIZE
}

impl PlaceQuery {
    fn to_filter(&self) -> Result<PlaceFilter> {
        let content_type_id = blank_to_none(self.content_type_id.as_deref())
            .map(|id| {
                ContentType::from_id(id)
                    .map(|t| t.id().to_string())
                    .ok_or_else(|| AppError::BadRequest(format!("Unknown contentTypeId: {}", id)))
            })
            .transpose()?;

        let arrange = blank_to_none(self.arrange.as_deref())
            .map(|code| {
                SortMode::from_code(code)
                    .ok_or_else(|| AppError::BadRequest(format!("Unknown arrange: {}", code)))
            })
            .transpose()?;

        Ok(PlaceFilter {
            area_code: blank_to_none(self.area_code.as_deref()).map(str::to_string),
            sigungu_code: blank_to_none(self.sigungu_code.as_deref()).map(str::to_string),
            content_type_id,
            page: self.page,
            page_size: self.page_size,
            arrange,
        })
    }
}

async fn list_places(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PlaceQuery>,
) -> Result<Json<Page<Place>>> {
    validate(&params)?;
    let filter = params.to_filter()?;
    Ok(Json(state.places.area_based_list(&filter).await?))
}

async fn search_places(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PlaceQuery>,
) -> Result<Json<Page<Place>>> {
    validate(&params)?;
    let filter = params.to_filter()?;
    let keyword = params.keyword.as_deref().unwrap_or_default();

    tracing::debug!(keyword, page = filter.page, "Searching places");
    Ok(Json(state.places.search_keyword(keyword, &filter).await?))
}

// ─── Place Detail ────────────────────────────────────────────

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DetailQuery {
    content_type_id: Option<String>,
}

async fn get_place(
    State(state): State<Arc<AppState>>,
    Path(content_id): Path<String>,
    Query(params): Query<DetailQuery>,
) -> Result<Json<PlaceOverview>> {
    let overview = state
        .places
        .place_overview(&content_id, params.content_type_id.as_deref())
        .await?;
    Ok(Json(overview))
}

async fn get_place_intro(
    State(state): State<Arc<AppState>>,
    Path(content_id): Path<String>,
    Query(params): Query<DetailQuery>,
) -> Result<Json<IntroDetail>> {
    let content_type_id = params.content_type_id.unwrap_or_default();
    Ok(Json(
        state
            .places
            .detail_intro(&content_id, &content_type_id)
            .await?,
    ))
}

async fn get_place_images(
    State(state): State<Arc<AppState>>,
    Path(content_id): Path<String>,
) -> Result<Json<Vec<PlaceImage>>> {
    Ok(Json(state.places.detail_images(&content_id).await?))
}

fn validate<T: Validate>(params: &T) -> Result<()> {
    params
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

fn blank_to_none(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
