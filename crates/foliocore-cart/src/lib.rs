use serde::{Deserialize, Serialize};
use tracing::debug;

pub type ProductId = String;

/// What an "add to cart" action hands the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: ProductId,
    pub title: String,
    pub image: String,
    pub category: String,
    pub location: String,
    pub unit_price: f64,
    pub quantity: u32,
}

impl CartLine {
    fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            id: product.id.clone(),
            title: product.title.clone(),
            image: product.image.clone(),
            category: product.category.clone(),
            location: product.location.clone(),
            unit_price: unit_price(product.price),
            quantity,
        }
    }

    pub fn line_total(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }
}

/// Session cart. Lines are unique by id and kept in insertion order; totals are
/// always folded from the lines.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CartStore {
    items: Vec<CartLine>,
}

impl CartStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CartLine] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn line(&self, id: &str) -> Option<&CartLine> {
        self.items.iter().find(|line| line.id == id)
    }

    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|line| u64::from(line.quantity)).sum()
    }

    pub fn subtotal(&self) -> f64 {
        self.items.iter().map(CartLine::line_total).sum()
    }

    /// Adds `quantity` (at least one) of `product`, merging into an existing line.
    pub fn add_item(&mut self, product: &Product, quantity: i64) {
        let quantity = clamp_quantity(quantity);
        match self.items.iter_mut().find(|line| line.id == product.id) {
            Some(line) => line.quantity = line.quantity.saturating_add(quantity),
            None => self.items.push(CartLine::from_product(product, quantity)),
        }
    }

    /// Sets the quantity of `id`, never below one. Returns `false` when no such
    /// line exists.
    pub fn update_quantity(&mut self, id: &str, quantity: i64) -> bool {
        let Some(line) = self.items.iter_mut().find(|line| line.id == id) else {
            debug!(id, "quantity update for unknown cart line ignored");
            return false;
        };
        line.quantity = clamp_quantity(quantity);
        true
    }

    pub fn remove_item(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|line| line.id != id);
        let removed = self.items.len() != before;
        if !removed {
            debug!(id, "removal of unknown cart line ignored");
        }
        removed
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

fn clamp_quantity(quantity: i64) -> u32 {
    quantity.clamp(1, i64::from(u32::MAX)) as u32
}

fn unit_price(price: Option<f64>) -> f64 {
    price
        .filter(|price| price.is_finite() && *price >= 0.0)
        .unwrap_or(0.0)
}

pub fn format_euros(amount: f64) -> String {
    format!("€{amount:.2}")
}
