use proptest::prelude::*;
use storefront_catalog::Product;

use crate::{CATEGORIES, product};

/// Produces titles of words made of letters and digits.
pub fn title_strategy(max_size: usize) -> impl Strategy<Value = String> {
    prop::string::string_regex(&format!("[a-zA-Z0-9]{{1,8}}( [a-zA-Z0-9]{{1,8}}){{0,{max_size}}}"))
        .expect("valid title regex")
}

/// Produces prices in whole cents below 1000.
pub fn price_strategy() -> impl Strategy<Value = f64> {
    (0..100_000_u32).prop_map(|cents| f64::from(cents) / 100.0)
}

/// Produces product lists of up to `max_len` products.
///
/// Ids are unique and follow list order.
/// Prices may repeat so sorting ties are exercised.
pub fn products_strategy(max_len: usize) -> impl Strategy<Value = Vec<Product>> {
    prop::collection::vec(
        (
            title_strategy(3),
            price_strategy(),
            prop::sample::select(CATEGORIES.to_vec()),
        ),
        0..=max_len,
    )
    .prop_map(|fields| {
        fields
            .into_iter()
            .enumerate()
            .map(|(i, (title, price, category))| product(i as u64 + 1, &title, price, category))
            .collect()
    })
}
