use std::fmt;

use serde::{Deserialize, Serialize};

pub const PRODUCTS_PREFIX: &str = "/products/";
pub const SEARCH_PATH: &str = "/search";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum Route {
    /// A static page path such as `/news`.
    Page(String),
    /// Product detail, keyed by catalog id.
    Product(String),
    /// Free-text search results.
    Search(String),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ShellError {
    #[error("page path must be absolute: {0:?}")]
    RelativePath(String),
    #[error("product id is empty")]
    EmptyProductId,
}

impl Route {
    pub fn page(href: impl Into<String>) -> Result<Self, ShellError> {
        let href = href.into();
        if !href.starts_with('/') {
            return Err(ShellError::RelativePath(href));
        }
        Ok(Self::Page(href))
    }

    pub fn product(id: impl Into<String>) -> Result<Self, ShellError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(ShellError::EmptyProductId);
        }
        Ok(Self::Product(id))
    }

    /// `None` when the trimmed query is empty.
    pub fn search(query: &str) -> Option<Self> {
        let query = query.trim();
        (!query.is_empty()).then(|| Self::Search(query.to_string()))
    }

    pub fn path(&self) -> String {
        match self {
            Self::Page(href) => href.clone(),
            Self::Product(id) => format!("{PRODUCTS_PREFIX}{}", urlencoding::encode(id)),
            Self::Search(query) => format!("{SEARCH_PATH}?q={}", urlencoding::encode(query)),
        }
    }

    /// Inverse of [`Route::path`]. Anything that is not a product or search path is
    /// treated as a page.
    pub fn parse(path: &str) -> Result<Self, ShellError> {
        if let Some(id) = path.strip_prefix(PRODUCTS_PREFIX) {
            return Self::product(decode(id));
        }

        if let Some(rest) = path.strip_prefix(SEARCH_PATH) {
            if rest.is_empty() || rest.starts_with('?') {
                let query = rest
                    .trim_start_matches('?')
                    .split('&')
                    .find_map(|pair| pair.strip_prefix("q="))
                    .map(|value| decode(&value.replace('+', " ")))
                    .unwrap_or_default();
                return Ok(Self::Search(query));
            }
        }

        Self::page(path)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

fn decode(value: &str) -> String {
    urlencoding::decode(value)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| value.to_string())
}

pub trait Navigator {
    fn navigate(&mut self, route: Route);
    fn current(&self) -> Option<&Route>;
}

/// In-memory navigation stack.
#[derive(Debug, Clone, Default)]
pub struct History {
    entries: Vec<Route>,
}

impl History {
    pub fn new(start: Route) -> Self {
        Self {
            entries: vec![start],
        }
    }

    pub fn back(&mut self) -> Option<&Route> {
        if self.entries.len() > 1 {
            self.entries.pop();
        }
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Navigator for History {
    fn navigate(&mut self, route: Route) {
        if self.entries.last() == Some(&route) {
            return;
        }
        self.entries.push(route);
    }

    fn current(&self) -> Option<&Route> {
        self.entries.last()
    }
}
