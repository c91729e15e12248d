//! Filter, sort and paginate pipeline over the fetched product list.
//!
//! [derive_view] is a pure function of the product list, a [ViewState] and
//! the current [FavoriteSet]; the result is recomputed for every render.

use std::fmt::Display;
use std::num::NonZeroUsize;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use storefront_catalog::{Category, Product};
use thiserror::Error;

use crate::favorites::FavoriteSet;

/// Number of products shown per page.
pub const PAGE_SIZE: usize = 12;

/// Maximum number of page numbers shown by [Pagination::links].
const MAX_VISIBLE_PAGES: usize = 5;

/// Sort order of the visible products.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortMode {
    /// Catalog order.
    #[default]
    #[serde(rename = "none")]
    Unsorted,
    #[serde(rename = "price-asc")]
    PriceAscending,
    #[serde(rename = "price-desc")]
    PriceDescending,
}

impl SortMode {
    fn as_str(&self) -> &'static str {
        match self {
            SortMode::Unsorted => "none",
            SortMode::PriceAscending => "price-asc",
            SortMode::PriceDescending => "price-desc",
        }
    }
}

impl Display for SortMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("unknown sort option '{0}', expected one of: none, price-asc, price-desc")]
pub struct UnknownSortMode(String);

impl FromStr for SortMode {
    type Err = UnknownSortMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(SortMode::Unsorted),
            "price-asc" => Ok(SortMode::PriceAscending),
            "price-desc" => Ok(SortMode::PriceDescending),
            other => Err(UnknownSortMode(other.to_string())),
        }
    }
}

/// User controlled search, filter, sort and page selections.
///
/// Changing the search query, category, favorites-only flag or sort mode
/// moves back to the first page, so a page number is never applied to a
/// result set it was not chosen for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    search_query: String,
    selected_category: Option<Category>,
    favorites_only: bool,
    sort_mode: SortMode,
    current_page: NonZeroUsize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            search_query: String::new(),
            selected_category: None,
            favorites_only: false,
            sort_mode: SortMode::default(),
            current_page: NonZeroUsize::MIN,
        }
    }
}

impl ViewState {
    pub fn search_query(&self) -> &str {
        &self.search_query
    }

    /// `None` selects all categories.
    pub fn selected_category(&self) -> Option<&Category> {
        self.selected_category.as_ref()
    }

    pub fn favorites_only(&self) -> bool {
        self.favorites_only
    }

    pub fn sort_mode(&self) -> SortMode {
        self.sort_mode
    }

    pub fn current_page(&self) -> usize {
        self.current_page.get()
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query != self.search_query {
            self.search_query = query;
            self.reset_page();
        }
    }

    pub fn select_category(&mut self, category: Option<Category>) {
        if category != self.selected_category {
            self.selected_category = category;
            self.reset_page();
        }
    }

    pub fn set_favorites_only(&mut self, favorites_only: bool) {
        if favorites_only != self.favorites_only {
            self.favorites_only = favorites_only;
            self.reset_page();
        }
    }

    pub fn toggle_favorites_only(&mut self) {
        self.set_favorites_only(!self.favorites_only);
    }

    pub fn set_sort_mode(&mut self, sort_mode: SortMode) {
        if sort_mode != self.sort_mode {
            self.sort_mode = sort_mode;
            self.reset_page();
        }
    }

    /// Go to a page.
    ///
    /// The page is not checked against the number of pages;
    /// a page past the end derives an empty slice.
    pub fn go_to_page(&mut self, page: NonZeroUsize) {
        self.current_page = page;
    }

    /// Advance one page unless already on the last of `total_pages`.
    pub fn next_page(&mut self, total_pages: usize) {
        if self.current_page.get() < total_pages {
            self.current_page = self.current_page.saturating_add(1);
        }
    }

    pub fn previous_page(&mut self) {
        if let Some(previous) = NonZeroUsize::new(self.current_page.get() - 1) {
            self.current_page = previous;
        }
    }

    /// Move onto the last page if the current page is past `total_pages`.
    pub(crate) fn clamp_page(&mut self, total_pages: usize) {
        if let Some(last) = NonZeroUsize::new(total_pages) {
            self.current_page = self.current_page.min(last);
        } else {
            self.reset_page();
        }
    }

    fn reset_page(&mut self) {
        self.current_page = NonZeroUsize::MIN;
    }
}

/// What to tell the user when no product matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    NoResults,
    NoFavorites,
}

/// The filtered and sorted products, and the slice for the current page.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedView<'a> {
    pub page_items: Vec<&'a Product>,
    pub total_pages: usize,
    pub total_count: usize,
    pub current_page: usize,
    favorites_only: bool,
}

impl DerivedView<'_> {
    /// `None` if at least one product matched.
    pub fn empty_state(&self) -> Option<EmptyState> {
        if self.total_count > 0 {
            None
        } else if self.favorites_only {
            Some(EmptyState::NoFavorites)
        } else {
            Some(EmptyState::NoResults)
        }
    }

    /// Page controls, or `None` if everything fits on a single page.
    pub fn pagination(&self) -> Option<Pagination> {
        if self.total_pages <= 1 {
            return None;
        }
        Some(Pagination {
            current_page: self.current_page,
            total_pages: self.total_pages,
            total_count: self.total_count,
        })
    }
}

/// Derive the visible products.
///
/// Filters by title search (case-insensitive substring), exact category
/// and favorites, then sorts by price if requested, then takes the
/// [PAGE_SIZE] products of the current page.
/// Sorting is stable: products with equal prices keep their catalog order.
pub fn derive_view<'a>(
    products: &'a [Product],
    state: &ViewState,
    favorites: &FavoriteSet,
) -> DerivedView<'a> {
    let query = state.search_query.to_lowercase();

    let mut filtered = products
        .iter()
        .filter(|product| query.is_empty() || product.title.to_lowercase().contains(&query))
        .filter(|product| {
            state
                .selected_category
                .as_ref()
                .is_none_or(|category| product.category == *category)
        })
        .filter(|product| !state.favorites_only || favorites.contains(product.id))
        .collect::<Vec<_>>();

    match state.sort_mode {
        SortMode::Unsorted => {},
        SortMode::PriceAscending => filtered.sort_by(|a, b| a.price.total_cmp(&b.price)),
        SortMode::PriceDescending => filtered.sort_by(|a, b| b.price.total_cmp(&a.price)),
    }

    let total_count = filtered.len();
    let total_pages = total_count.div_ceil(PAGE_SIZE);
    let current_page = state.current_page.get();

    // a page too far out to have an offset is past the end
    let page_items = match (current_page - 1).checked_mul(PAGE_SIZE) {
        Some(offset) => filtered.into_iter().skip(offset).take(PAGE_SIZE).collect(),
        None => Vec::new(),
    };

    DerivedView {
        page_items,
        total_pages,
        total_count,
        current_page,
        favorites_only: state.favorites_only,
    }
}

/// A page number or a gap in the page numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLink {
    Page(usize),
    Ellipsis,
}

/// Page controls for a view spanning more than one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    current_page: usize,
    total_pages: usize,
    total_count: usize,
}

impl Pagination {
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// 1-based positions of the first and last product on the current page.
    pub fn showing(&self) -> (usize, usize) {
        let first = (self.current_page - 1)
            .saturating_mul(PAGE_SIZE)
            .saturating_add(1);
        let last = self
            .current_page
            .saturating_mul(PAGE_SIZE)
            .min(self.total_count);
        (first, last)
    }

    /// Page numbers to offer, with gaps.
    ///
    /// Up to five pages are listed in full. Beyond that the first and last
    /// pages are always present, along with the neighbourhood of the
    /// current page.
    pub fn links(&self) -> Vec<PageLink> {
        let (current, last) = (self.current_page, self.total_pages);

        if last <= MAX_VISIBLE_PAGES {
            return (1..=last).map(PageLink::Page).collect();
        }

        let mut links = vec![PageLink::Page(1)];
        if current <= 3 {
            links.extend((2..=4).map(PageLink::Page));
            links.push(PageLink::Ellipsis);
            links.push(PageLink::Page(last));
        } else if current >= last - 2 {
            links.push(PageLink::Ellipsis);
            links.extend((last - 3..=last).map(PageLink::Page));
        } else {
            links.push(PageLink::Ellipsis);
            links.extend((current - 1..=current + 1).map(PageLink::Page));
            links.push(PageLink::Ellipsis);
            links.push(PageLink::Page(last));
        }
        links
    }
}
