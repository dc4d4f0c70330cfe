use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const CATALOG_URL_ENV: &str = "FOLIO_CATALOG_URL";
pub const CONFIG_PATH_ENV: &str = "FOLIO_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub catalog: CatalogSettings,
    pub search: SearchSettings,
    pub theme: Theme,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    pub base_url: String,
    pub page_size: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Key that opens the overlay when focus is outside any text field.
    pub open_key: String,
    /// Catalog entries shown while the query is empty.
    pub featured_limit: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    GalleryDark,
    GalleryLight,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read settings from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed settings in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            catalog: CatalogSettings::default(),
            search: SearchSettings::default(),
            theme: Theme::GalleryDark,
        }
    }
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            page_size: 50,
        }
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            open_key: "/".to_string(),
            featured_limit: 6,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut settings: Settings =
            serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.sanitize();
        Ok(settings)
    }

    /// Loads `path`, falling back to defaults. A missing file is silent; any other
    /// failure is logged.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(ConfigError::Io { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                Self::default()
            }
            Err(err) => {
                tracing::warn!(error = %err, "using default settings");
                Self::default()
            }
        }
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| env::var(key).ok());
    }

    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(CATALOG_URL_ENV) {
            let url = url.trim();
            if !url.is_empty() {
                self.catalog.base_url = url.trim_end_matches('/').to_string();
            }
        }
    }

    /// The key as a single character, when it is one.
    pub fn open_key_char(&self) -> Option<char> {
        let mut chars = self.search.open_key.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Some(ch),
            _ => None,
        }
    }

    fn sanitize(&mut self) {
        self.catalog.base_url = self.catalog.base_url.trim_end_matches('/').to_string();
        if self.catalog.page_size == 0 {
            self.catalog.page_size = CatalogSettings::default().page_size;
        }
        if self.search.open_key.is_empty() {
            self.search.open_key = SearchSettings::default().open_key;
        }
        if self.search.featured_limit == 0 {
            self.search.featured_limit = SearchSettings::default().featured_limit;
        }
    }
}

pub fn settings_path() -> PathBuf {
    if let Ok(explicit) = env::var(CONFIG_PATH_ENV) {
        return PathBuf::from(explicit);
    }

    let base = env::var("XDG_CONFIG_HOME")
        .or_else(|_| env::var("APPDATA"))
        .unwrap_or_else(|_| ".".to_string());
    PathBuf::from(base).join("folio").join("settings.json")
}
