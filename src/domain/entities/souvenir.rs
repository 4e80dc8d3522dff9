use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::document::{Document, default_true};

/// Local craft or product sold through the portal.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Souvenir {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub images: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Document for Souvenir {
    const COLLECTION: &'static str = "souvenirs";
    const LABEL: &'static str = "Souvenir";
}
