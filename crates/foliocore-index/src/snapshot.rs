use crate::{CatalogEntry, NavigablePage};

const MENU: &[(&str, &str, &str)] = &[
    ("1", "COLLECTIONS & THEMES", "/gallery"),
    ("2", "NEWS", "/news"),
    ("3", "CONTACT ME", "/contact"),
    ("4", "MUST HAVE", "/must-have"),
    ("5", "DIGITAL & WEB SERVICES", "/services"),
];

const GALLERY_FALLBACK: &[(&str, &str, &[&str], &str)] = &[
    (
        "1",
        "Final Amber",
        &["montenegro", "sunset", "durmitor", "landscape"],
        "https://images.unsplash.com/photo-1500530855697-b586d89ba3ee?q=80&w=400&auto=format&fit=crop",
    ),
    (
        "2",
        "Frozen Ridge",
        &["snow", "valley", "winter"],
        "https://images.unsplash.com/photo-1482192505345-5655af888cc4?q=80&w=400&auto=format&fit=crop",
    ),
    (
        "3",
        "Misty Path",
        &["morning", "haze", "hills"],
        "https://images.unsplash.com/photo-1500534314209-a25ddb2bd429?q=80&w=400&auto=format&fit=crop",
    ),
];

pub fn menu() -> Vec<NavigablePage> {
    MENU.iter()
        .map(|(id, label, href)| NavigablePage {
            id: id.to_string(),
            label: label.to_string(),
            href: href.to_string(),
        })
        .collect()
}

/// Shown until the first successful catalog load.
pub fn gallery_fallback() -> Vec<CatalogEntry> {
    GALLERY_FALLBACK
        .iter()
        .map(|(id, title, tags, thumb)| CatalogEntry {
            id: id.to_string(),
            title: title.to_string(),
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
            thumbnail: Some(thumb.to_string()),
            price: None,
        })
        .collect()
}
