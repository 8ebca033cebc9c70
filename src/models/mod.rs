// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod bookmark;
pub mod place;
pub mod user;

pub use bookmark::Bookmark;
pub use place::{
    AreaCode, CategoryCodes, ContentType, Coordinates, IntroDetail, IntroField, Page, Place,
    PlaceDetail, PlaceImage, SortMode,
};
pub use user::{User, UserIdentity};
