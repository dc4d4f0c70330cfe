use std::sync::Arc;

use foliocore_cart::{CartStore, Product};
use foliocore_config::Settings;
use foliocore_index::{CatalogEntry, CatalogSource, IndexError};
use foliocore_shell::{History, Navigator, Route};
use tokio::runtime::Handle;
use tracing::info;

pub mod aggregator;
pub mod catalog_client;
pub mod overlay;

pub use aggregator::SearchIndexAggregator;
pub use catalog_client::HttpCatalogClient;
pub use overlay::{Overlay, OverlayEffect, OverlayKey, OverlayResults, OverlayState};

pub const HOME_PATH: &str = "/";
pub const CART_PATH: &str = "/cart";

/// Session state shared by the front end: cart, overlay and navigation.
pub struct AppService {
    pub settings: Settings,
    pub cart: CartStore,
    pub overlay: Overlay,
    pub history: History,
}

impl Default for AppService {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl AppService {
    pub fn new(settings: Settings) -> Self {
        let overlay = Overlay::from_settings(&settings);
        Self {
            settings,
            cart: CartStore::new(),
            overlay,
            history: History::new(Route::Page(HOME_PATH.to_string())),
        }
    }

    /// Starts the search index against the configured listing service.
    pub fn mount_index(&self, runtime: &Handle) -> Result<SearchIndexAggregator, IndexError> {
        let client = HttpCatalogClient::new(&self.settings.catalog)?;
        info!(url = %client.listing_url(), "mounting search index");
        Ok(self.mount_catalog(runtime, Arc::new(client)))
    }

    pub fn mount_catalog<S>(&self, runtime: &Handle, source: Arc<S>) -> SearchIndexAggregator
    where
        S: CatalogSource + 'static,
    {
        SearchIndexAggregator::mount_on(runtime, source, self.settings.catalog.page_size)
    }

    pub fn current_route(&self) -> Option<&Route> {
        self.history.current()
    }

    pub fn navigate(&mut self, route: Route) {
        info!(path = %route, "navigate");
        self.history.navigate(route);
    }

    /// Carries out navigation effects. Returns `true` when the input should be
    /// focused.
    pub fn apply(&mut self, effect: Option<OverlayEffect>) -> bool {
        match effect {
            Some(OverlayEffect::FocusInput) => true,
            Some(OverlayEffect::Navigate(route)) => {
                self.navigate(route);
                false
            }
            None => false,
        }
    }

    pub fn add_to_cart(&mut self, entry: &CatalogEntry, quantity: i64) {
        self.cart.add_item(&product_from_entry(entry), quantity);
        info!(id = %entry.id, total_items = self.cart.total_items(), "added to cart");
    }
}

/// Cart payload for a catalog entry. The first tag stands in for the category.
pub fn product_from_entry(entry: &CatalogEntry) -> Product {
    Product {
        id: entry.id.clone(),
        title: entry.title.clone(),
        image: entry.thumbnail.clone().unwrap_or_default(),
        category: entry.tags.first().cloned().unwrap_or_default(),
        location: String::new(),
        price: entry.price,
    }
}
