use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{CatalogEntry, IndexError};

/// Product as delivered by the listing service. Only `id` and `title` are
/// required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub main_image: Option<String>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub price: Option<f64>,
}

/// The listing endpoint answers either with a bare array or with an envelope
/// carrying `items`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CatalogResponse {
    Bare(Vec<ProductRecord>),
    Envelope {
        #[serde(default)]
        items: Vec<ProductRecord>,
    },
}

impl CatalogResponse {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, IndexError> {
        Ok(serde_json::from_slice(bytes)?)
    }

    pub fn records(&self) -> &[ProductRecord] {
        match self {
            Self::Bare(items) | Self::Envelope { items } => items,
        }
    }

    pub fn into_entries(self) -> Vec<CatalogEntry> {
        match self {
            Self::Bare(items) | Self::Envelope { items } => {
                items.into_iter().map(CatalogEntry::from).collect()
            }
        }
    }
}

impl ProductRecord {
    /// First non-blank image reference: `image`, then `mainImage`, then `images[0]`.
    pub fn display_image(&self) -> Option<&str> {
        let first_listed = self
            .images
            .as_ref()
            .and_then(|images| images.first())
            .map(String::as_str);

        [self.image.as_deref(), self.main_image.as_deref(), first_listed]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|candidate| !candidate.is_empty())
    }
}

impl From<ProductRecord> for CatalogEntry {
    fn from(record: ProductRecord) -> Self {
        let thumbnail = record.display_image().map(str::to_string);
        Self {
            id: record.id,
            title: record.title,
            tags: record.tags.unwrap_or_default(),
            thumbnail,
            price: record.price.filter(|price| price.is_finite() && *price >= 0.0),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        other => Err(de::Error::custom(format!(
            "expected string or number id, got {other}"
        ))),
    }
}

// Prices come through as numbers or as display strings ("$29", "Free"); only
// plain numbers are kept.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    })
}
