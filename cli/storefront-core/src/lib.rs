//! Browsing logic on top of the catalog client.
//!
//! - [storage]: key-value persistence used for local state
//! - [favorites]: the persisted set of favorite products
//! - [view]: the filter, sort and paginate pipeline
//! - [models]: list and detail view models driven by the presentation layer

pub mod favorites;
pub mod models;
pub mod storage;
pub mod view;

pub use favorites::{FAVORITES_KEY, FavoriteSet, FavoritesStore};
pub use models::{CatalogViewModel, LoadState, ProductDetailModel};
pub use storage::{FileStore, KeyValueStore, MemoryStore, NoStorage, StorageError};
pub use view::{
    DerivedView,
    EmptyState,
    PAGE_SIZE,
    PageLink,
    Pagination,
    SortMode,
    ViewState,
    derive_view,
};
