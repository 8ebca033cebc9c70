// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Place lookups on top of the TourAPI client.
//!
//! Converts raw TourAPI items into the models served by the API and
//! combines the detail endpoints for the place page.

use crate::error::AppError;
use crate::models::{
    AreaCode, CategoryCodes, ContentType, Coordinates, IntroDetail, Page, Place, PlaceDetail, PlaceImage,
    SortMode,
};
use crate::services::query::{Endpoint, Params};
use crate::services::tour_api::{RawAreaCode, RawImage, RawIntro, RawPlace, TourApiClient};
use serde::Serialize;

/// Largest page size passed to TourAPI.
pub const MAX_PAGE_SIZE: u32 = 100;
/// Page size used when the caller gives none.
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Filters shared by the list and search endpoints.
#[derive(Debug, Clone, Default)]
pub struct PlaceFilter {
    pub area_code: Option<String>,
    pub sigungu_code: Option<String>,
    pub content_type_id: Option<String>,
    /// 1-based; 0 is treated as 1
    pub page: u32,
    /// Clamped to `1..=MAX_PAGE_SIZE`; 0 means default
    pub page_size: u32,
    pub arrange: Option<SortMode>,
}

impl PlaceFilter {
    fn page(&self) -> u32 {
        self.page.max(1)
    }

    fn page_size(&self) -> u32 {
        match self.page_size {
            0 => DEFAULT_PAGE_SIZE,
            n => n.min(MAX_PAGE_SIZE),
        }
    }

    fn params(&self) -> Params {
        Params::new()
            .opt("areaCode", non_blank(self.area_code.as_deref()))
            .opt("sigunguCode", non_blank(self.sigungu_code.as_deref()))
            .opt("contentTypeId", non_blank(self.content_type_id.as_deref()))
            .set("pageNo", self.page())
            .set("numOfRows", self.page_size())
            .set("listYN", "Y")
            .opt("arrange", self.arrange.map(SortMode::code))
    }
}

/// Everything shown on a place page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceOverview {
    pub detail: PlaceDetail,
    /// `None` when the intro lookup failed or had no data
    pub intro: Option<IntroDetail>,
    /// Empty when the image lookup failed
    pub images: Vec<PlaceImage>,
}

/// Typed TourAPI operations.
#[derive(Clone)]
pub struct PlaceService {
    client: TourApiClient,
}

impl PlaceService {
    pub fn new(client: TourApiClient) -> Self {
        Self { client }
    }

    /// Provinces, or the districts of `parent` when given.
    pub async fn area_codes(&self, parent: Option<&str>) -> Result<Vec<AreaCode>, AppError> {
        let params = Params::new()
            .opt("areaCode", non_blank(parent))
            .set("numOfRows", MAX_PAGE_SIZE)
            .set("pageNo", 1);

        let (items, _) = self
            .client
            .fetch_items::<RawAreaCode>(Endpoint::AreaCode, &params)
            .await?;

        Ok(items
            .into_iter()
            .filter_map(|raw| {
                Some(AreaCode {
                    code: raw.code?,
                    name: raw.name.unwrap_or_default(),
                })
            })
            .collect())
    }

    /// Places by region and category.
    pub async fn area_based_list(&self, filter: &PlaceFilter) -> Result<Page<Place>, AppError> {
        self.list(Endpoint::AreaBasedList, filter.params(), filter)
            .await
    }

    /// Keyword search. The keyword must not be blank.
    pub async fn search_keyword(
        &self,
        keyword: &str,
        filter: &PlaceFilter,
    ) -> Result<Page<Place>, AppError> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(AppError::BadRequest("검색어를 입력해주세요.".to_string()));
        }

        let params = filter.params().set("keyword", keyword);
        self.list(Endpoint::SearchKeyword, params, filter).await
    }

    async fn list(
        &self,
        endpoint: Endpoint,
        params: Params,
        filter: &PlaceFilter,
    ) -> Result<Page<Place>, AppError> {
        let (items, info) = self
            .client
            .fetch_items::<RawPlace>(endpoint, &params)
            .await?;

        Ok(Page {
            items: items.into_iter().filter_map(place_from_raw).collect(),
            page: if info.page_no > 0 { info.page_no } else { filter.page() },
            page_size: if info.num_of_rows > 0 {
                info.num_of_rows
            } else {
                filter.page_size()
            },
            total_count: info.total_count,
        })
    }

    /// Common detail of one place.
    pub async fn detail_common(&self, content_id: &str) -> Result<PlaceDetail, AppError> {
        let content_id = require_content_id(content_id)?;
        let params = Params::new()
            .set("contentId", content_id)
            .set("defaultYN", "Y")
            .set("firstImageYN", "Y")
            .set("areacodeYN", "Y")
            .set("catcodeYN", "Y")
            .set("addrinfoYN", "Y")
            .set("mapinfoYN", "Y")
            .set("overviewYN", "Y");

        let (items, _) = self
            .client
            .fetch_items::<RawPlace>(Endpoint::DetailCommon, &params)
            .await?;

        items
            .into_iter()
            .next()
            .and_then(detail_from_raw)
            .ok_or_else(|| AppError::NotFound(format!("Place {}", content_id)))
    }

    /// Type-specific operational fields of one place.
    pub async fn detail_intro(
        &self,
        content_id: &str,
        content_type_id: &str,
    ) -> Result<IntroDetail, AppError> {
        let content_id = require_content_id(content_id)?;
        let content_type_id = content_type_id.trim();
        if content_type_id.is_empty() {
            return Err(AppError::BadRequest("contentTypeId is required".to_string()));
        }

        let params = Params::new()
            .set("contentId", content_id)
            .set("contentTypeId", content_type_id);

        let (items, _) = self
            .client
            .fetch_items::<RawIntro>(Endpoint::DetailIntro, &params)
            .await?;

        let fields = items
            .into_iter()
            .next()
            .map(RawIntro::into_fields)
            .ok_or_else(|| AppError::NotFound(format!("Intro for place {}", content_id)))?;

        Ok(IntroDetail {
            content_id: content_id.to_string(),
            content_type_id: Some(content_type_id.to_string()),
            fields,
        })
    }

    /// Images of one place, in serial order.
    pub async fn detail_images(&self, content_id: &str) -> Result<Vec<PlaceImage>, AppError> {
        let content_id = require_content_id(content_id)?;
        let params = Params::new()
            .set("contentId", content_id)
            .set("imageYN", "Y")
            .set("subImageYN", "Y")
            .set("numOfRows", MAX_PAGE_SIZE);

        let (items, _) = self
            .client
            .fetch_items::<RawImage>(Endpoint::DetailImage, &params)
            .await?;

        Ok(items
            .into_iter()
            .filter_map(|raw| {
                Some(PlaceImage {
                    content_id: raw.contentid.unwrap_or_else(|| content_id.to_string()),
                    origin_url: raw.originimgurl?,
                    thumbnail_url: raw.smallimageurl,
                    serial_num: raw.serialnum,
                    name: raw.imgname,
                })
            })
            .collect())
    }

    /// Detail, intro and images fetched concurrently.
    ///
    /// Only the detail is required; intro and image failures are logged and
    /// degrade to `None` / empty. Without `content_type_id` the intro waits
    /// for the detail to learn the type.
    pub async fn place_overview(
        &self,
        content_id: &str,
        content_type_id: Option<&str>,
    ) -> Result<PlaceOverview, AppError> {
        let (detail, intro, images) = match non_blank(content_type_id) {
            Some(type_id) => {
                let (detail, intro, images) = tokio::join!(
                    self.detail_common(content_id),
                    self.detail_intro(content_id, type_id),
                    self.detail_images(content_id),
                );
                (detail?, intro, images)
            }
            None => {
                let (detail, images) =
                    tokio::join!(self.detail_common(content_id), self.detail_images(content_id));
                let detail = detail?;
                let intro = match detail.place.content_type_id.as_deref() {
                    Some(type_id) => self.detail_intro(content_id, type_id).await,
                    None => Err(AppError::NotFound("content type unknown".to_string())),
                };
                (detail, intro, images)
            }
        };

        let intro = intro
            .map_err(|e| tracing::warn!(content_id, error = %e, "Intro lookup failed, omitting"))
            .ok();
        let images = images
            .map_err(|e| tracing::warn!(content_id, error = %e, "Image lookup failed, omitting"))
            .unwrap_or_default();

        Ok(PlaceOverview {
            detail,
            intro,
            images,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn require_content_id(content_id: &str) -> Result<&str, AppError> {
    non_blank(Some(content_id))
        .ok_or_else(|| AppError::BadRequest("contentId is required".to_string()))
}

/// Items without a content ID are dropped.
fn place_from_raw(raw: RawPlace) -> Option<Place> {
    Some(Place {
        location: Coordinates::from_map_xy(raw.mapx.as_deref(), raw.mapy.as_deref()),
        content_id: raw.contentid?,
        content_type_label: raw
            .contenttypeid
            .as_deref()
            .and_then(ContentType::from_id)
            .map(|t| t.label().to_string()),
        content_type_id: raw.contenttypeid,
        title: raw.title.unwrap_or_default(),
        addr1: raw.addr1,
        addr2: raw.addr2,
        category: CategoryCodes {
            cat1: raw.cat1,
            cat2: raw.cat2,
            cat3: raw.cat3,
        },
        area_code: raw.areacode,
        sigungu_code: raw.sigungucode,
        tel: raw.tel,
        image: raw.firstimage,
        thumbnail: raw.firstimage2,
        modified_time: raw.modifiedtime,
    })
}

fn detail_from_raw(mut raw: RawPlace) -> Option<PlaceDetail> {
    let overview = raw.overview.take();
    let homepage = raw.homepage.take();
    let zipcode = raw.zipcode.take();
    Some(PlaceDetail {
        place: place_from_raw(raw)?,
        overview,
        homepage,
        zipcode,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_defaults_and_clamping() {
        let filter = PlaceFilter {
            page_size: 500,
            ..Default::default()
        };
        assert_eq!(filter.page(), 1);
        assert_eq!(filter.page_size(), MAX_PAGE_SIZE);
        assert_eq!(PlaceFilter::default().page_size(), DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_place_conversion() {
        let raw = RawPlace {
            contentid: Some("126508".to_string()),
            contenttypeid: Some("12".to_string()),
            title: Some("경복궁".to_string()),
            mapx: Some("1269769930".to_string()),
            mapy: Some("375760000".to_string()),
            ..Default::default()
        };

        let place = place_from_raw(raw).unwrap();
        assert_eq!(place.content_id, "126508");
        assert_eq!(place.content_type_label.as_deref(), Some("관광지"));
        let location = place.location.unwrap();
        assert_eq!(location.longitude, 126.976993);
        assert_eq!(location.latitude, 37.576);
    }

    #[test]
    fn test_unknown_content_type_has_no_label() {
        let raw = RawPlace {
            contentid: Some("1".to_string()),
            contenttypeid: Some("99".to_string()),
            ..Default::default()
        };
        let place = place_from_raw(raw).unwrap();
        assert_eq!(place.content_type_id.as_deref(), Some("99"));
        assert!(place.content_type_label.is_none());
    }

    #[test]
    fn test_place_without_id_is_dropped() {
        assert!(place_from_raw(RawPlace::default()).is_none());
    }
}
