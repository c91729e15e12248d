//! View models driven by the presentation layer.
//!
//! Each model owns its view's copy of the favorite set,
//! loaded from storage when the model is created.
//! Two models sharing one store see each other's toggles only after
//! [CatalogViewModel::reload_favorites] or [ProductDetailModel::reload_favorites].

use std::num::NonZeroUsize;

use storefront_catalog::{Catalog, CatalogApi, CatalogClientError, Category, Product, ProductId};
use tracing::{debug, instrument, warn};

use crate::favorites::{FavoriteSet, FavoritesStore};
use crate::storage::KeyValueStore;
use crate::view::{DerivedView, SortMode, ViewState, derive_view};

/// Progress of a model's remote retrieval.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Loading,
    /// The last retrieval failed, with a message for the user.
    Failed(String),
    Ready,
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Product list
// ---------------------------------------------------------------------------

/// State behind the product list: the loaded catalog, the user's view
/// selections and the favorite set.
#[derive(Debug)]
pub struct CatalogViewModel<C, S> {
    client: C,
    favorites_store: FavoritesStore<S>,
    favorites: FavoriteSet,
    catalog: Catalog,
    state: ViewState,
    load_state: LoadState,
}

impl<C: CatalogApi, S: KeyValueStore> CatalogViewModel<C, S> {
    /// Create a model with no catalog loaded yet and the persisted favorites.
    pub fn new(client: C, storage: S) -> Self {
        let favorites_store = FavoritesStore::new(storage);
        let favorites = favorites_store.load();
        Self {
            client,
            favorites_store,
            favorites,
            catalog: Catalog::default(),
            state: ViewState::default(),
            load_state: LoadState::Loading,
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Fetch products and categories.
    ///
    /// On failure the previously loaded catalog stays in place and the
    /// error message is kept in [Self::load_state].
    #[instrument(skip_all)]
    pub async fn load(&mut self) -> Result<(), CatalogClientError> {
        self.load_state = LoadState::Loading;
        match self.client.load_catalog().await {
            Ok(catalog) => {
                debug!(
                    n_products = catalog.products.len(),
                    n_categories = catalog.categories.len(),
                    "catalog loaded"
                );
                self.catalog = catalog;
                // the list may have shrunk under the current page
                let total_pages = self.view().total_pages;
                self.state.clamp_page(total_pages);
                self.load_state = LoadState::Ready;
                Ok(())
            },
            Err(e) => {
                warn!(error = %e, "failed to load catalog");
                self.load_state = LoadState::Failed(e.to_string());
                Err(e)
            },
        }
    }

    /// Run the same retrieval as [Self::load] again.
    pub async fn retry(&mut self) -> Result<(), CatalogClientError> {
        self.load().await
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn products(&self) -> &[Product] {
        &self.catalog.products
    }

    /// Categories offered for filtering, as served by the catalog.
    pub fn categories(&self) -> &[Category] {
        &self.catalog.categories
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// The products to show for the current selections.
    pub fn view(&self) -> DerivedView<'_> {
        derive_view(&self.catalog.products, &self.state, &self.favorites)
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.state.set_search_query(query);
    }

    pub fn select_category(&mut self, category: Option<Category>) {
        self.state.select_category(category);
    }

    pub fn toggle_favorites_only(&mut self) {
        self.state.toggle_favorites_only();
    }

    pub fn set_sort_mode(&mut self, sort_mode: SortMode) {
        self.state.set_sort_mode(sort_mode);
    }

    pub fn go_to_page(&mut self, page: NonZeroUsize) {
        self.state.go_to_page(page);
    }

    pub fn next_page(&mut self) {
        let total_pages = self.view().total_pages;
        self.state.next_page(total_pages);
    }

    pub fn previous_page(&mut self) {
        self.state.previous_page();
    }

    pub fn favorites(&self) -> &FavoriteSet {
        &self.favorites
    }

    pub fn is_favorite(&self, id: ProductId) -> bool {
        self.favorites.contains(id)
    }

    pub fn favorites_count(&self) -> usize {
        self.favorites.len()
    }

    /// Add or remove `id` from the favorites and persist the result.
    ///
    /// The page is left alone, even if the product leaves a
    /// favorites-only view.
    pub fn toggle_favorite(&mut self, id: ProductId) {
        self.favorites = self.favorites_store.toggle(id, &self.favorites);
    }

    /// Replace the favorite set with the persisted one.
    pub fn reload_favorites(&mut self) {
        self.favorites = self.favorites_store.load();
    }
}

// ---------------------------------------------------------------------------
// Product detail
// ---------------------------------------------------------------------------

/// State behind a single product page.
#[derive(Debug)]
pub struct ProductDetailModel<C, S> {
    client: C,
    favorites_store: FavoritesStore<S>,
    favorites: FavoriteSet,
    id: ProductId,
    product: Option<Product>,
    load_state: LoadState,
}

impl<C: CatalogApi, S: KeyValueStore> ProductDetailModel<C, S> {
    pub fn new(client: C, storage: S, id: ProductId) -> Self {
        let favorites_store = FavoritesStore::new(storage);
        let favorites = favorites_store.load();
        Self {
            client,
            favorites_store,
            favorites,
            id,
            product: None,
            load_state: LoadState::Loading,
        }
    }

    /// Create a model for the product named by a route segment such as `"7"`.
    pub fn for_route(client: C, storage: S, segment: &str) -> Result<Self, CatalogClientError> {
        let id = ProductId::parse(segment)?;
        Ok(Self::new(client, storage, id))
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn id(&self) -> ProductId {
        self.id
    }

    #[instrument(skip_all, fields(id = %self.id))]
    pub async fn load(&mut self) -> Result<(), CatalogClientError> {
        self.load_state = LoadState::Loading;
        match self.client.fetch_product(self.id).await {
            Ok(product) => {
                debug!("product loaded");
                self.product = Some(product);
                self.load_state = LoadState::Ready;
                Ok(())
            },
            Err(e) => {
                warn!(error = %e, "failed to load product");
                self.load_state = LoadState::Failed(e.to_string());
                Err(e)
            },
        }
    }

    pub async fn retry(&mut self) -> Result<(), CatalogClientError> {
        self.load().await
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn product(&self) -> Option<&Product> {
        self.product.as_ref()
    }

    pub fn is_favorite(&self) -> bool {
        self.favorites.contains(self.id)
    }

    pub fn favorites_count(&self) -> usize {
        self.favorites.len()
    }

    pub fn toggle_favorite(&mut self) {
        self.favorites = self.favorites_store.toggle(self.id, &self.favorites);
    }

    pub fn reload_favorites(&mut self) {
        self.favorites = self.favorites_store.load();
    }
}
