use std::path::Path;
use std::sync::Once;

use storefront_catalog::{Category, Product, ProductId, Rating};
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

pub mod fixtures;
pub mod proptest;

/// Categories served by the public demo catalog.
pub const CATEGORIES: [&str; 4] = [
    "electronics",
    "jewelery",
    "men's clothing",
    "women's clothing",
];

/// A temporary data directory, removed on drop.
pub struct IsolatedDataDir {
    temp_dir: TempDir,
}

impl IsolatedDataDir {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temporary data directory");
        Self { temp_dir }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }
}

impl Default for IsolatedDataDir {
    fn default() -> Self {
        Self::new()
    }
}

/// Print logs of the code under test, filtered by `RUST_LOG`.
///
/// Safe to call from every test, only the first call installs a subscriber.
pub fn init_test_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn product(id: u64, title: &str, price: f64, category: &str) -> Product {
    Product {
        id: ProductId::new(id),
        title: title.to_string(),
        price,
        description: format!("Description of {title}"),
        category: Category::from(category),
        image: format!("https://fakestoreapi.com/img/{id}.jpg")
            .parse()
            .unwrap(),
        rating: Rating {
            rate: 4.0,
            count: 100,
        },
    }
}

/// `n` products with ids `1..=n`, cycling through [CATEGORIES].
pub fn products(n: u64) -> Vec<Product> {
    (1..=n)
        .map(|id| {
            let category = CATEGORIES[(id as usize - 1) % CATEGORIES.len()];
            product(id, &format!("Product {id}"), id as f64 * 1.5, category)
        })
        .collect()
}

pub fn categories() -> Vec<Category> {
    CATEGORIES.into_iter().map(Category::from).collect()
}
