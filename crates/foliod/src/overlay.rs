use foliocore_config::Settings;
use foliocore_index::{CatalogEntry, NavigablePage, SearchIndex};
use foliocore_query::{filter_index, SearchRequest, FEATURED_LIMIT};
use foliocore_shell::Route;
use tracing::warn;

pub const NO_PAGE_MATCH: &str = "No page match.";
pub const NO_CATALOG_MATCH: &str = "No gallery match.";
pub const CANCEL_KEY_HINT: &str = "Esc";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayState {
    Closed,
    Open,
}

/// Keys the overlay reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayKey {
    Character(char),
    Escape,
    Enter,
}

/// Work the host must carry out after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayEffect {
    /// Focus the query input on the next frame.
    FocusInput,
    Navigate(Route),
}

/// One result column: its items in index order, or the empty-state copy.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSection<'a, T> {
    pub heading: String,
    pub items: Vec<&'a T>,
    pub empty_message: &'static str,
}

impl<T> ResultSection<'_, T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The no-match copy, only when there is nothing to list.
    pub fn placeholder(&self) -> Option<&'static str> {
        self.items.is_empty().then_some(self.empty_message)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayResults<'a> {
    pub pages: ResultSection<'a, NavigablePage>,
    pub catalog: ResultSection<'a, CatalogEntry>,
}

/// Open/closed search panel with its query text.
#[derive(Debug, Clone)]
pub struct Overlay {
    state: OverlayState,
    query: String,
    open_key: char,
    featured_limit: usize,
}

impl Default for Overlay {
    fn default() -> Self {
        Self::new('/', FEATURED_LIMIT)
    }
}

impl Overlay {
    pub fn new(open_key: char, featured_limit: usize) -> Self {
        Self {
            state: OverlayState::Closed,
            query: String::new(),
            open_key,
            featured_limit: featured_limit.max(1),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let open_key = settings.open_key_char().unwrap_or_else(|| {
            warn!(key = %settings.search.open_key, "open key must be one character, using '/'");
            '/'
        });
        Self::new(open_key, settings.search.featured_limit)
    }

    pub fn state(&self) -> OverlayState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == OverlayState::Open
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn open_key(&self) -> char {
        self.open_key
    }

    pub fn open(&mut self) -> Option<OverlayEffect> {
        if self.is_open() {
            return None;
        }
        self.state = OverlayState::Open;
        Some(OverlayEffect::FocusInput)
    }

    pub fn close(&mut self) {
        self.state = OverlayState::Closed;
        self.query.clear();
    }

    pub fn toggle(&mut self) -> Option<OverlayEffect> {
        if self.is_open() {
            self.close();
            None
        } else {
            self.open()
        }
    }

    /// Clicks on the backdrop close the panel.
    pub fn click_outside(&mut self) {
        self.close();
    }

    /// `in_text_field` tells whether keyboard focus sits in an editable element.
    pub fn handle_key(&mut self, key: OverlayKey, in_text_field: bool) -> Option<OverlayEffect> {
        match key {
            OverlayKey::Escape => {
                self.close();
                None
            }
            OverlayKey::Character(ch) if ch == self.open_key && !in_text_field => self.open(),
            OverlayKey::Enter if self.is_open() && in_text_field => self.submit(),
            _ => None,
        }
    }

    pub fn set_query(&mut self, text: impl Into<String>) {
        if self.is_open() {
            self.query = text.into();
        }
    }

    /// Empties the query and keeps the panel open.
    pub fn clear(&mut self) -> Option<OverlayEffect> {
        self.query.clear();
        self.is_open().then_some(OverlayEffect::FocusInput)
    }

    pub fn choose_page(&mut self, page: &NavigablePage) -> Option<OverlayEffect> {
        self.close();
        match Route::page(page.href.clone()) {
            Ok(route) => Some(OverlayEffect::Navigate(route)),
            Err(err) => {
                warn!(error = %err, page = %page.id, "page result has no usable route");
                None
            }
        }
    }

    pub fn choose_entry(&mut self, entry: &CatalogEntry) -> Option<OverlayEffect> {
        self.close();
        match Route::product(entry.id.clone()) {
            Ok(route) => Some(OverlayEffect::Navigate(route)),
            Err(err) => {
                warn!(error = %err, title = %entry.title, "catalog result has no usable route");
                None
            }
        }
    }

    /// Sends the raw query to the search results page. A blank query just closes.
    pub fn submit(&mut self) -> Option<OverlayEffect> {
        let route = Route::search(&self.query);
        self.close();
        route.map(OverlayEffect::Navigate)
    }

    pub fn results<'a>(&self, index: &'a SearchIndex) -> OverlayResults<'a> {
        let request =
            SearchRequest::new(self.query.as_str()).with_featured_limit(self.featured_limit);
        let filtered = filter_index(index, &request);

        let catalog_heading = if index.is_loading() {
            "Gallery (loading…)".to_string()
        } else {
            "Gallery".to_string()
        };

        OverlayResults {
            pages: ResultSection {
                heading: "Pages".to_string(),
                items: filtered.pages,
                empty_message: NO_PAGE_MATCH,
            },
            catalog: ResultSection {
                heading: catalog_heading,
                items: filtered.catalog,
                empty_message: NO_CATALOG_MATCH,
            },
        }
    }

    pub fn hint(&self) -> String {
        format!("Tip: “{}” opens, “{CANCEL_KEY_HINT}” closes", self.open_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opened() -> Overlay {
        let mut overlay = Overlay::default();
        overlay.open();
        overlay
    }

    #[test]
    fn open_key_outside_text_field_opens_and_requests_focus() {
        let mut overlay = Overlay::default();
        assert_eq!(
            overlay.handle_key(OverlayKey::Character('/'), false),
            Some(OverlayEffect::FocusInput)
        );
        assert!(overlay.is_open());
    }

    #[test]
    fn open_key_inside_text_field_is_ignored() {
        let mut overlay = Overlay::default();
        assert_eq!(overlay.handle_key(OverlayKey::Character('/'), true), None);
        assert_eq!(overlay.state(), OverlayState::Closed);
    }

    #[test]
    fn reopening_does_not_refocus() {
        let mut overlay = opened();
        assert_eq!(overlay.open(), None);
    }

    #[test]
    fn escape_closes_and_resets_query() {
        let mut overlay = opened();
        overlay.set_query("amber");

        assert_eq!(overlay.handle_key(OverlayKey::Escape, true), None);
        assert!(!overlay.is_open());
        assert_eq!(overlay.query(), "");
    }

    #[test]
    fn click_outside_and_toggle_close() {
        let mut overlay = opened();
        overlay.set_query("x");
        overlay.click_outside();
        assert_eq!(overlay.query(), "");
        assert!(!overlay.is_open());

        assert_eq!(overlay.toggle(), Some(OverlayEffect::FocusInput));
        assert_eq!(overlay.toggle(), None);
        assert!(!overlay.is_open());
    }

    #[test]
    fn typing_while_closed_is_dropped() {
        let mut overlay = Overlay::default();
        overlay.set_query("ghost");
        assert_eq!(overlay.query(), "");
    }

    #[test]
    fn clear_keeps_panel_open_and_refocuses() {
        let mut overlay = opened();
        overlay.set_query("snow");

        assert_eq!(overlay.clear(), Some(OverlayEffect::FocusInput));
        assert!(overlay.is_open());
        assert_eq!(overlay.query(), "");
    }

    #[test]
    fn enter_submits_encoded_search() {
        let mut overlay = opened();
        overlay.set_query("  fine art ");

        let effect = overlay.handle_key(OverlayKey::Enter, true);
        assert_eq!(
            effect,
            Some(OverlayEffect::Navigate(Route::Search("fine art".to_string())))
        );
        assert_eq!(
            Route::Search("fine art".to_string()).path(),
            "/search?q=fine%20art"
        );
        assert!(!overlay.is_open());
    }

    #[test]
    fn blank_submit_closes_without_navigating() {
        let mut overlay = opened();
        overlay.set_query("   ");
        assert_eq!(overlay.submit(), None);
        assert!(!overlay.is_open());
    }

    #[test]
    fn choosing_results_navigates_and_closes() {
        let index = SearchIndex::bootstrap();

        let mut overlay = opened();
        let page = &index.pages()[1];
        assert_eq!(
            overlay.choose_page(page),
            Some(OverlayEffect::Navigate(Route::Page("/news".to_string())))
        );
        assert!(!overlay.is_open());

        let mut overlay = opened();
        let entry = &index.catalog()[0];
        assert_eq!(
            overlay.choose_entry(entry),
            Some(OverlayEffect::Navigate(Route::Product("1".to_string())))
        );
        assert!(!overlay.is_open());
    }

    #[test]
    fn empty_categories_carry_placeholders() {
        let index = SearchIndex::new(
            vec![NavigablePage {
                id: "2".to_string(),
                label: "News".to_string(),
                href: "/news".to_string(),
            }],
            vec![CatalogEntry {
                id: "m1".to_string(),
                title: "Monochrome Mountains".to_string(),
                tags: vec!["fine art".to_string()],
                thumbnail: None,
                price: None,
            }],
        );
        let mut overlay = opened();
        overlay.set_query("mon");

        let results = overlay.results(&index);
        assert_eq!(results.pages.placeholder(), Some(NO_PAGE_MATCH));
        assert_eq!(results.catalog.placeholder(), None);
        assert_eq!(results.catalog.items[0].id, "m1");

        overlay.set_query("zzz");
        let results = overlay.results(&index);
        assert_eq!(results.catalog.placeholder(), Some(NO_CATALOG_MATCH));
    }

    #[test]
    fn catalog_heading_shows_loading() {
        let mut index = SearchIndex::bootstrap();
        let overlay = Overlay::default();
        assert_eq!(overlay.results(&index).catalog.heading, "Gallery");

        index.set_loading(true);
        assert_eq!(overlay.results(&index).catalog.heading, "Gallery (loading…)");
    }

    #[test]
    fn settings_drive_key_and_featured_limit() {
        let mut settings = Settings::default();
        settings.search.open_key = "k".to_string();
        settings.search.featured_limit = 1;

        let mut overlay = Overlay::from_settings(&settings);
        assert_eq!(overlay.handle_key(OverlayKey::Character('/'), false), None);
        assert!(overlay.handle_key(OverlayKey::Character('k'), false).is_some());
        assert_eq!(overlay.results(&SearchIndex::bootstrap()).catalog.items.len(), 1);
        assert_eq!(overlay.hint(), "Tip: “k” opens, “Esc” closes");
    }

    #[test]
    fn blank_query_always_features_an_entry() {
        let mut settings = Settings::default();
        settings.search.featured_limit = 0;

        let overlay = Overlay::from_settings(&settings);
        let index = SearchIndex::bootstrap();
        let results = overlay.results(&index);
        assert_eq!(results.catalog.items.len(), 1);
        assert_eq!(results.catalog.placeholder(), None);
    }
}
