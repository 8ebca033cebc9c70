// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Place models returned by the API.
//!
//! These are read from TourAPI on every request and never persisted.

use serde::Serialize;
use std::collections::BTreeMap;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// TourAPI stores map coordinates as integers scaled by this factor.
pub const COORDINATE_SCALE: f64 = 10_000_000.0;

/// Convert a TourAPI coordinate string to decimal degrees.
///
/// Integer values are fixed-point and get divided by [`COORDINATE_SCALE`].
/// Values that already carry a decimal point are taken as degrees.
pub fn coordinate_to_degrees(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if raw.contains('.') {
        return raw.parse::<f64>().ok().filter(|v| v.is_finite());
    }

    raw.parse::<i64>()
        .ok()
        .map(|fixed| fixed as f64 / COORDINATE_SCALE)
}

/// Decimal-degree coordinates (WGS84).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Coordinates {
    pub longitude: f64,
    pub latitude: f64,
}

impl Coordinates {
    /// Build from TourAPI `mapx` (longitude) and `mapy` (latitude).
    pub fn from_map_xy(mapx: Option<&str>, mapy: Option<&str>) -> Option<Self> {
        Some(Self {
            longitude: coordinate_to_degrees(mapx?)?,
            latitude: coordinate_to_degrees(mapy?)?,
        })
    }
}

/// Place category (TourAPI `contentTypeId`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentType {
    Attraction,
    CulturalFacility,
    Festival,
    Course,
    LeisureSports,
    Lodging,
    Shopping,
    Restaurant,
}

impl ContentType {
    pub const ALL: [ContentType; 8] = [
        ContentType::Attraction,
        ContentType::CulturalFacility,
        ContentType::Festival,
        ContentType::Course,
        ContentType::LeisureSports,
        ContentType::Lodging,
        ContentType::Shopping,
        ContentType::Restaurant,
    ];

    pub fn id(self) -> &'static str {
        match self {
            ContentType::Attraction => "12",
            ContentType::CulturalFacility => "14",
            ContentType::Festival => "15",
            ContentType::Course => "25",
            ContentType::LeisureSports => "28",
            ContentType::Lodging => "32",
            ContentType::Shopping => "38",
            ContentType::Restaurant => "39",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.id() == id.trim())
    }

    /// Korean display label.
    pub fn label(self) -> &'static str {
        match self {
            ContentType::Attraction => "관광지",
            ContentType::CulturalFacility => "문화시설",
            ContentType::Festival => "축제공연행사",
            ContentType::Course => "여행코스",
            ContentType::LeisureSports => "레포츠",
            ContentType::Lodging => "숙박",
            ContentType::Shopping => "쇼핑",
            ContentType::Restaurant => "음식점",
        }
    }
}

/// Result ordering for list and search endpoints (TourAPI `arrange`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortMode {
    Title,
    Modified,
    Created,
    TitleWithImage,
    ModifiedWithImage,
    CreatedWithImage,
}

impl SortMode {
    pub fn code(self) -> &'static str {
        match self {
            SortMode::Title => "A",
            SortMode::Modified => "C",
            SortMode::Created => "D",
            SortMode::TitleWithImage => "O",
            SortMode::ModifiedWithImage => "Q",
            SortMode::CreatedWithImage => "R",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "A" => Some(SortMode::Title),
            "C" => Some(SortMode::Modified),
            "D" => Some(SortMode::Created),
            "O" => Some(SortMode::TitleWithImage),
            "Q" => Some(SortMode::ModifiedWithImage),
            "R" => Some(SortMode::CreatedWithImage),
            _ => None,
        }
    }
}

/// Region code entry (province, or district within a province).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AreaCode {
    pub code: String,
    pub name: String,
}

/// Three-level category codes (`cat1` > `cat2` > `cat3`).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct CategoryCodes {
    pub cat1: Option<String>,
    pub cat2: Option<String>,
    pub cat3: Option<String>,
}

/// Place summary as shown in lists and search results.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Place {
    pub content_id: String,
    pub content_type_id: Option<String>,
    /// Korean category name for known content types
    pub content_type_label: Option<String>,
    pub title: String,
    pub addr1: Option<String>,
    pub addr2: Option<String>,
    pub location: Option<Coordinates>,
    pub category: CategoryCodes,
    pub area_code: Option<String>,
    pub sigungu_code: Option<String>,
    pub tel: Option<String>,
    pub image: Option<String>,
    pub thumbnail: Option<String>,
    /// `YYYYMMDDhhmmss`, the "latest" sort key
    pub modified_time: Option<String>,
}

/// Full place information from the common-detail endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PlaceDetail {
    #[serde(flatten)]
    pub place: Place,
    pub overview: Option<String>,
    pub homepage: Option<String>,
    pub zipcode: Option<String>,
}

/// One image of a place.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct PlaceImage {
    pub content_id: String,
    pub origin_url: String,
    pub thumbnail_url: Option<String>,
    pub serial_num: Option<String>,
    pub name: Option<String>,
}

/// Operational fields whose key differs by content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntroField {
    OpeningHours,
    RestDate,
    UseFee,
    Parking,
    InfoCenter,
    EventPeriodStart,
    EventPeriodEnd,
    CheckIn,
    CheckOut,
    SignatureMenu,
}

/// Known keys per field, in lookup order.
const INTRO_FIELD_ALIASES: &[(IntroField, &[&str])] = &[
    (
        IntroField::OpeningHours,
        &[
            "usetime",
            "usetimeculture",
            "usetimeleports",
            "opentime",
            "opentimefood",
            "playtime",
        ],
    ),
    (
        IntroField::RestDate,
        &[
            "restdate",
            "restdateculture",
            "restdateleports",
            "restdateshopping",
            "restdatefood",
        ],
    ),
    (
        IntroField::UseFee,
        &["usefee", "usefeeleports", "usetimefestival"],
    ),
    (
        IntroField::Parking,
        &[
            "parking",
            "parkingculture",
            "parkingleports",
            "parkingshopping",
            "parkingfood",
            "parkinglodging",
        ],
    ),
    (
        IntroField::InfoCenter,
        &[
            "infocenter",
            "infocenterculture",
            "infocenterleports",
            "infocentershopping",
            "infocenterfood",
            "infocenterlodging",
            "sponsor1tel",
        ],
    ),
    (IntroField::EventPeriodStart, &["eventstartdate"]),
    (IntroField::EventPeriodEnd, &["eventenddate"]),
    (IntroField::CheckIn, &["checkintime"]),
    (IntroField::CheckOut, &["checkouttime"]),
    (IntroField::SignatureMenu, &["firstmenu", "treatmenu"]),
];

impl IntroField {
    pub fn aliases(self) -> &'static [&'static str] {
        INTRO_FIELD_ALIASES
            .iter()
            .find(|(field, _)| *field == self)
            .map(|(_, keys)| *keys)
            .unwrap_or(&[])
    }
}

/// Type-specific operational details, kept as an open key-value map.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct IntroDetail {
    pub content_id: String,
    pub content_type_id: Option<String>,
    pub fields: BTreeMap<String, String>,
}

impl IntroDetail {
    /// First non-empty value among the field's known keys.
    pub fn get(&self, field: IntroField) -> Option<&str> {
        field
            .aliases()
            .iter()
            .filter_map(|key| self.fields.get(*key))
            .map(|v| v.trim())
            .find(|v| !v.is_empty())
    }
}

/// One page of results from a list or search endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub page_size: u32,
    pub total_count: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_point_coordinate() {
        assert_eq!(coordinate_to_degrees("1270976969"), Some(127.0976969));
        assert_eq!(coordinate_to_degrees("375760000"), Some(37.576));
    }

    #[test]
    fn test_decimal_coordinate_passthrough() {
        assert_eq!(coordinate_to_degrees("126.9769930325"), Some(126.9769930325));
    }

    #[test]
    fn test_bad_coordinates() {
        assert_eq!(coordinate_to_degrees(""), None);
        assert_eq!(coordinate_to_degrees("abc"), None);
        assert!(Coordinates::from_map_xy(Some("1270976969"), None).is_none());
    }

    #[test]
    fn test_content_type_ids() {
        assert_eq!(ContentType::from_id("39"), Some(ContentType::Restaurant));
        assert_eq!(ContentType::Festival.id(), "15");
        assert_eq!(ContentType::from_id("99"), None);
    }

    #[test]
    fn test_intro_field_alias_lookup() {
        let mut fields = BTreeMap::new();
        fields.insert("usetime".to_string(), "  ".to_string());
        fields.insert("usetimeculture".to_string(), "09:00~18:00".to_string());
        fields.insert("restdatefood".to_string(), "매주 월요일".to_string());

        let intro = IntroDetail {
            content_id: "126508".to_string(),
            content_type_id: Some("14".to_string()),
            fields,
        };

        assert_eq!(intro.get(IntroField::OpeningHours), Some("09:00~18:00"));
        assert_eq!(intro.get(IntroField::RestDate), Some("매주 월요일"));
        assert_eq!(intro.get(IntroField::Parking), None);
    }
}
