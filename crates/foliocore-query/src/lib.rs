use foliocore_index::{CatalogEntry, NavigablePage, SearchIndex};
use serde::{Deserialize, Serialize};

/// Catalog entries listed while the query is blank.
pub const FEATURED_LIMIT: usize = 6;
pub const TAG_PREVIEW_LIMIT: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub featured_limit: usize,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            featured_limit: FEATURED_LIMIT,
        }
    }

    pub fn with_featured_limit(mut self, limit: usize) -> Self {
        self.featured_limit = limit;
        self
    }
}

/// Both result categories for one query, in index order.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterResults<'a> {
    pub pages: Vec<&'a NavigablePage>,
    pub catalog: Vec<&'a CatalogEntry>,
}

impl FilterResults<'_> {
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty() && self.catalog.is_empty()
    }
}

pub fn normalize(text: &str) -> String {
    text.to_lowercase().trim().to_string()
}

pub fn page_matches(page: &NavigablePage, normalized_query: &str) -> bool {
    normalize(&page.label).contains(normalized_query)
        || normalize(&page.href).contains(normalized_query)
}

pub fn entry_matches(entry: &CatalogEntry, normalized_query: &str) -> bool {
    normalize(&entry.title).contains(normalized_query)
        || entry
            .tags
            .iter()
            .any(|tag| normalize(tag).contains(normalized_query))
}

pub fn filter_index<'a>(index: &'a SearchIndex, request: &SearchRequest) -> FilterResults<'a> {
    let query = normalize(&request.query);

    if query.is_empty() {
        return FilterResults {
            pages: index.pages().iter().collect(),
            catalog: index.catalog().iter().take(request.featured_limit).collect(),
        };
    }

    FilterResults {
        pages: index
            .pages()
            .iter()
            .filter(|page| page_matches(page, &query))
            .collect(),
        catalog: index
            .catalog()
            .iter()
            .filter(|entry| entry_matches(entry, &query))
            .collect(),
    }
}

pub fn filter<'a>(index: &'a SearchIndex, query: &str) -> FilterResults<'a> {
    filter_index(index, &SearchRequest::new(query))
}

/// `a · b · c · d…` style summary of the leading tags.
pub fn tag_preview(tags: &[String]) -> Option<String> {
    if tags.is_empty() {
        return None;
    }

    let mut preview = tags
        .iter()
        .take(TAG_PREVIEW_LIMIT)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" · ");
    if tags.len() > TAG_PREVIEW_LIMIT {
        preview.push('…');
    }
    Some(preview)
}
