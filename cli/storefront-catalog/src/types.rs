//! Catalog data model.
//!
//! These types mirror the JSON documents served by the catalog API.
//! They are immutable once fetched; nothing here is validated beyond what
//! deserialization requires.

use std::str::FromStr;

use derive_more::{AsRef, Deref, Display, From};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::CatalogClientError;

/// Identifier assigned to a product by the catalog.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    From,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct ProductId(u64);

impl ProductId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> u64 {
        self.0
    }

    /// Parse an identifier from user input such as a route segment.
    ///
    /// Only positive decimal integers are identifiers.
    pub fn parse(s: impl AsRef<str>) -> Result<Self, CatalogClientError> {
        let s = s.as_ref();
        match s.trim().parse::<u64>() {
            Ok(id) if id > 0 => Ok(Self(id)),
            _ => Err(CatalogClientError::InvalidProductId(s.to_string())),
        }
    }
}

impl FromStr for ProductId {
    type Err = CatalogClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// A category label, used as a facet value for filtering.
///
/// Category names are compared exactly, including case.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    Deref,
    From,
    AsRef,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct Category(String);

impl From<&str> for Category {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Average review score and number of reviews.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub rate: f64,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: f64,
    pub description: String,
    pub category: Category,
    pub image: Url,
    pub rating: Rating,
}

/// Products and categories as fetched together at startup.
///
/// The category list is fetched independently of the products and is not
/// checked against the categories the products carry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
}

#[cfg(test)]
mod tests {
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn deserializes_catalog_product() {
        let json = indoc! {r#"
            {
              "id": 1,
              "title": "Fjallraven - Foldsack No. 1 Backpack, Fits 15 Laptops",
              "price": 109.95,
              "description": "Your perfect pack for everyday use and walks in the forest.",
              "category": "men's clothing",
              "image": "https://fakestoreapi.com/img/81fPKd-2AYL._AC_SL1500_.jpg",
              "rating": { "rate": 3.9, "count": 120 }
            }
        "#};

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.price, 109.95);
        assert_eq!(product.category, Category::from("men's clothing"));
        assert_eq!(product.rating, Rating {
            rate: 3.9,
            count: 120
        });
    }

    #[test]
    fn categories_are_plain_strings() {
        let categories: Vec<Category> =
            serde_json::from_str(r#"["electronics", "jewelery"]"#).unwrap();
        assert_eq!(categories, vec![
            Category::from("electronics"),
            Category::from("jewelery")
        ]);
        assert_eq!(serde_json::to_string(&categories).unwrap(), r#"["electronics","jewelery"]"#);
    }

    #[test]
    fn parse_product_id() {
        assert_eq!(ProductId::parse("5").unwrap(), ProductId::new(5));
        assert_eq!(" 12 ".parse::<ProductId>().unwrap(), ProductId::new(12));
        assert!(matches!(
            ProductId::parse("abc"),
            Err(CatalogClientError::InvalidProductId(s)) if s == "abc"
        ));
        assert!(ProductId::parse("0").is_err());
        assert!(ProductId::parse("-3").is_err());
        assert!(ProductId::parse("").is_err());
    }
}
