//! Tourist attractions and restaurants listed on the portal.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::document::{Document, default_true};

/// A place of interest visitors can browse.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Attraction {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub category: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub images: Vec<String>,
    #[serde(default)]
    pub opening_hours: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0.0))]
    pub ticket_price: Option<f64>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Document for Attraction {
    const COLLECTION: &'static str = "attractions";
    const LABEL: &'static str = "Attraction";
    const FILTER_FIELDS: &'static [&'static str] = &["category"];
}

/// A place to eat; its dishes live in the `menus` collection.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Restaurant {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub cuisine: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub images: Vec<String>,
    #[serde(default)]
    pub opening_hours: Option<String>,
    #[serde(default)]
    #[validate(length(max = 50))]
    pub price_range: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Document for Restaurant {
    const COLLECTION: &'static str = "restaurants";
    const LABEL: &'static str = "Restaurant";
}
