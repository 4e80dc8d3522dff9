//! Editorial content: stories, banners, highlights, news and research.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::document::{Document, Reference, SortOrder, default_true};
use crate::domain::entities::Attraction;

/// A community story shared on the portal.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Story {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub content: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub author: Option<String>,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub images: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Document for Story {
    const COLLECTION: &'static str = "stories";
    const LABEL: &'static str = "Story";
}

/// Hero banner shown on the landing page, ordered by `position`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Banner {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 300))]
    pub subtitle: Option<String>,
    #[validate(length(min = 1))]
    pub image: String,
    #[serde(default)]
    #[validate(url)]
    pub link_url: Option<String>,
    #[serde(default)]
    pub position: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Document for Banner {
    const COLLECTION: &'static str = "banners";
    const LABEL: &'static str = "Banner";
    const ORDER: SortOrder = SortOrder::Position;
}

/// Featured item, optionally pointing at an attraction.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Highlight {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[validate(length(min = 1))]
    pub image: String,
    #[serde(default)]
    pub attraction_id: Option<i64>,
    #[serde(default)]
    pub position: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Document for Highlight {
    const COLLECTION: &'static str = "highlights";
    const LABEL: &'static str = "Highlight";
    const ORDER: SortOrder = SortOrder::Position;
    const FILTER_FIELDS: &'static [&'static str] = &["attraction_id"];

    fn references(&self) -> Vec<Reference> {
        self.attraction_id
            .map(|id| Reference::one("attraction", Attraction::COLLECTION, id))
            .into_iter()
            .collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct News {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[validate(length(min = 1))]
    pub content: String,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub summary: Option<String>,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub images: Vec<String>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Document for News {
    const COLLECTION: &'static str = "news";
    const LABEL: &'static str = "News";
}

/// Published research about the region.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Research {
    #[validate(length(min = 1, max = 300))]
    pub title: String,
    #[validate(length(min = 1))]
    pub abstract_text: String,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    #[validate(range(min = 1900, max = 2100))]
    pub year: Option<i32>,
    #[serde(default)]
    #[validate(url)]
    pub document_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Document for Research {
    const COLLECTION: &'static str = "research";
    const LABEL: &'static str = "Research";
}
