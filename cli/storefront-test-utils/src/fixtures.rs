//! Example catalog payloads

use indoc::indoc;
use storefront_catalog::{Category, Product};

/// Two products as served by `GET /products`.
pub const PRODUCTS_JSON: &str = indoc! {r#"
    [
      {
        "id": 1,
        "title": "Fjallraven - Foldsack No. 1 Backpack, Fits 15 Laptops",
        "price": 109.95,
        "description": "Your perfect pack for everyday use and walks in the forest.",
        "category": "men's clothing",
        "image": "https://fakestoreapi.com/img/81fPKd-2AYL._AC_SL1500_.jpg",
        "rating": { "rate": 3.9, "count": 120 }
      },
      {
        "id": 5,
        "title": "John Hardy Women's Legends Naga Gold & Silver Dragon Station Chain Bracelet",
        "price": 695,
        "description": "From our Legends Collection, the Naga was inspired by the mythical water dragon.",
        "category": "jewelery",
        "image": "https://fakestoreapi.com/img/71pWzhdJNwL._AC_UL640_QL65_ML3_.jpg",
        "rating": { "rate": 4.6, "count": 400 }
      }
    ]
"#};

/// The categories served by `GET /products/categories`.
pub const CATEGORIES_JSON: &str = indoc! {r#"
    ["electronics", "jewelery", "men's clothing", "women's clothing"]
"#};

/// The products of [PRODUCTS_JSON].
pub fn products() -> Vec<Product> {
    serde_json::from_str(PRODUCTS_JSON).expect("valid products fixture")
}

/// The categories of [CATEGORIES_JSON].
pub fn categories() -> Vec<Category> {
    serde_json::from_str(CATEGORIES_JSON).expect("valid categories fixture")
}
