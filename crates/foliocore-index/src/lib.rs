use std::future::Future;

use serde::{Deserialize, Serialize};

mod record;
mod snapshot;

pub use record::{CatalogResponse, ProductRecord};
pub use snapshot::{gallery_fallback, menu};

pub type PageId = String;
pub type EntryId = String;

/// A route known at build time, shown in the navigation bar and the overlay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigablePage {
    pub id: PageId,
    pub label: String,
    pub href: String,
}

/// Search-facing projection of one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub id: EntryId,
    pub title: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
}

/// Static pages plus the most recent catalog snapshot.
///
/// `pages` is fixed at construction. `catalog` only changes through
/// [`SearchIndex::replace_catalog`], which refuses empty snapshots, so the
/// catalog never becomes empty once it has been seeded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchIndex {
    pages: Vec<NavigablePage>,
    catalog: Vec<CatalogEntry>,
    is_loading: bool,
}

impl SearchIndex {
    pub fn new(pages: Vec<NavigablePage>, fallback: Vec<CatalogEntry>) -> Self {
        Self {
            pages,
            catalog: fallback,
            is_loading: false,
        }
    }

    /// The bundled menu and gallery fallback.
    pub fn bootstrap() -> Self {
        Self::new(menu(), gallery_fallback())
    }

    pub fn pages(&self) -> &[NavigablePage] {
        &self.pages
    }

    pub fn catalog(&self) -> &[CatalogEntry] {
        &self.catalog
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn catalog_entry(&self, id: &str) -> Option<&CatalogEntry> {
        self.catalog.iter().find(|entry| entry.id == id)
    }

    pub fn page_by_href(&self, href: &str) -> Option<&NavigablePage> {
        self.pages.iter().find(|page| page.href == href)
    }

    /// Swaps in `entries` wholesale. An empty snapshot is ignored and `false` is
    /// returned.
    pub fn replace_catalog(&mut self, entries: Vec<CatalogEntry>) -> bool {
        if entries.is_empty() {
            return false;
        }
        self.catalog = entries;
        true
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
    }
}

impl Default for SearchIndex {
    fn default() -> Self {
        Self::bootstrap()
    }
}

/// Parameters of the remote "list products for display" call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListRequest {
    pub page: u32,
    pub page_size: u32,
}

impl ListRequest {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
        }
    }

    pub fn first_page(page_size: u32) -> Self {
        Self::new(1, page_size)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("catalog request failed: {0}")]
    Transport(String),
    #[error("catalog service answered with status {status}")]
    Status { status: u16 },
    #[error("malformed catalog payload: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Where product records come from.
pub trait CatalogSource: Send + Sync {
    fn list_products(
        &self,
        request: ListRequest,
    ) -> impl Future<Output = Result<CatalogResponse, IndexError>> + Send;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, title: &str) -> CatalogEntry {
        CatalogEntry {
            id: id.to_string(),
            title: title.to_string(),
            tags: Vec::new(),
            thumbnail: None,
            price: None,
        }
    }

    #[test]
    fn bootstrap_seeds_menu_and_fallback() {
        let index = SearchIndex::bootstrap();
        assert_eq!(index.pages().len(), 5);
        assert_eq!(index.catalog().len(), 3);
        assert!(!index.is_loading());
        assert_eq!(index.page_by_href("/news").map(|p| p.id.as_str()), Some("2"));
    }

    #[test]
    fn empty_replacement_keeps_previous_catalog() {
        let mut index = SearchIndex::bootstrap();
        let before = index.catalog().to_vec();

        assert!(!index.replace_catalog(Vec::new()));
        assert_eq!(index.catalog(), before.as_slice());
    }

    #[test]
    fn replacement_is_wholesale() {
        let mut index = SearchIndex::bootstrap();
        assert!(index.replace_catalog(vec![entry("p9", "Night Harbor")]));

        assert_eq!(index.catalog(), &[entry("p9", "Night Harbor")]);
        assert!(index.catalog_entry("1").is_none());
        assert_eq!(
            index.catalog_entry("p9").map(|e| e.title.as_str()),
            Some("Night Harbor")
        );
        assert_eq!(index.pages().len(), 5);
    }

    #[test]
    fn list_request_floors_at_one() {
        assert_eq!(ListRequest::new(0, 0), ListRequest { page: 1, page_size: 1 });
        assert_eq!(
            ListRequest::first_page(50),
            ListRequest { page: 1, page_size: 50 }
        );
    }
}
