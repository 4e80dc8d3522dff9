//! Restaurant menu items.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::document::{Document, Reference, default_true};
use crate::domain::entities::Restaurant;

/// A dish or drink offered by a restaurant.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Menu {
    pub restaurant_id: i64,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub category: Option<String>,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub images: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Document for Menu {
    const COLLECTION: &'static str = "menus";
    const LABEL: &'static str = "Menu";
    const FILTER_FIELDS: &'static [&'static str] = &["restaurant_id", "category"];

    fn references(&self) -> Vec<Reference> {
        vec![Reference::one(
            "restaurant",
            Restaurant::COLLECTION,
            self.restaurant_id,
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::ReferenceTarget;
    use serde_json::json;

    #[test]
    fn test_menu_references_restaurant() {
        let menu: Menu = serde_json::from_value(json!({
            "restaurant_id": 12,
            "name": "Gudeg",
            "price": 25000.0
        }))
        .unwrap();

        let refs = menu.references();

        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].field, "restaurant");
        assert_eq!(refs[0].collection, "restaurants");
        assert_eq!(refs[0].target, ReferenceTarget::One(12));
    }

    #[test]
    fn test_menu_requires_restaurant_id() {
        let result = serde_json::from_value::<Menu>(json!({
            "name": "Gudeg",
            "price": 25000.0
        }));

        assert!(result.is_err());
    }
}
