use serde::{Deserialize, Serialize};

/// The closed set of product categories. Anything else fails validation.
pub const CATEGORIES: [&str; 3] = ["Casual Wear", "Printed Shirt", "Ladies Shirt"];

/// A sellable item as stored in the `products` collection. The store assigns
/// `_id` on insert; it is not part of the wire model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    pub description: String,
    pub price: f64,
    // Wire name kept from the existing product documents
    #[serde(rename = "Discounted_price", skip_serializing_if = "Option::is_none")]
    pub discounted_price: Option<f64>,
    pub category: String,
    pub picture: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratings: Option<f64>,
}

impl Product {
    /// Full-field validation, run before a new product document is persisted.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("name is required".to_string());
        }
        if self.description.trim().is_empty() {
            return Err("description is required".to_string());
        }
        validate_category(&self.category)?;
        validate_ratings(self.ratings)?;
        Ok(())
    }
}

pub fn validate_category(category: &str) -> Result<(), String> {
    if CATEGORIES.contains(&category) {
        Ok(())
    } else {
        Err(format!("`{}` is not a valid category", category))
    }
}

pub fn validate_ratings(ratings: Option<f64>) -> Result<(), String> {
    match ratings {
        Some(r) if !(0.0..=5.0).contains(&r) => {
            Err("ratings must be between 0 and 5".to_string())
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shirt() -> Product {
        Product {
            name: "Plain tee".to_string(),
            description: "A plain cotton tee".to_string(),
            price: 19.99,
            discounted_price: None,
            category: "Casual Wear".to_string(),
            picture: "/uploads/1700000000000.png".to_string(),
            ratings: None,
        }
    }

    #[test]
    fn valid_product_passes() {
        assert!(shirt().validate().is_ok());
    }

    #[test]
    fn every_listed_category_is_accepted() {
        for category in CATEGORIES {
            assert!(validate_category(category).is_ok());
        }
    }

    #[test]
    fn unknown_category_is_rejected() {
        let mut product = shirt();
        product.category = "Sportswear".to_string();
        let err = product.validate().unwrap_err();
        assert!(err.contains("not a valid category"), "got: {err}");
    }

    #[test]
    fn category_match_is_exact() {
        assert!(validate_category("casual wear").is_err());
        assert!(validate_category("Casual Wear ").is_err());
    }

    #[test]
    fn ratings_bounds_are_inclusive() {
        assert!(validate_ratings(Some(0.0)).is_ok());
        assert!(validate_ratings(Some(5.0)).is_ok());
        assert!(validate_ratings(Some(5.1)).is_err());
        assert!(validate_ratings(Some(-0.5)).is_err());
        assert!(validate_ratings(None).is_ok());
    }

    #[test]
    fn blank_required_fields_are_rejected() {
        let mut product = shirt();
        product.name = "  ".to_string();
        assert_eq!(product.validate().unwrap_err(), "name is required");

        let mut product = shirt();
        product.description = String::new();
        assert_eq!(product.validate().unwrap_err(), "description is required");
    }

    #[test]
    fn discounted_price_uses_original_wire_name() {
        let mut product = shirt();
        product.discounted_price = Some(9.99);
        let doc = mongodb::bson::to_document(&product).unwrap();
        assert!(doc.contains_key("Discounted_price"));
        assert!(!doc.contains_key("discounted_price"));
    }
}
