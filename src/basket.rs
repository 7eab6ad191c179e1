//! Basket

use uuid::Uuid;

use crate::items::LineItem;

/// An owned set of line items keyed by product.
///
/// The standing invariant is product uniqueness: adding a product that is
/// already present increments the existing line instead of appending a
/// duplicate. Ordering of lines is not significant.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Basket {
    items: Vec<LineItem>,
}

impl Basket {
    /// Creates an empty basket.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a basket from already-validated lines.
    ///
    /// Lines sharing a product id are merged by summing their quantities, so
    /// the uniqueness invariant holds regardless of the input.
    pub fn from_items(items: impl IntoIterator<Item = LineItem>) -> Self {
        let mut basket = Self::new();

        for item in items {
            basket.add(item);
        }

        basket
    }

    /// Adds a line to the basket.
    ///
    /// When a line for the same product exists, its quantity is incremented
    /// by the incoming quantity and its stock snapshot refreshed; the stored
    /// name and prices are kept. Otherwise the line is appended as-is.
    pub fn add(&mut self, item: LineItem) {
        match self.find_mut(item.product_id) {
            Some(existing) => {
                existing.quantity += item.quantity;

                if item.available_stock.is_some() {
                    existing.available_stock = item.available_stock;
                }
            }
            None => self.items.push(item),
        }
    }

    /// Sets a line's quantity absolutely.
    ///
    /// A quantity of zero removes the line. An unknown product id is a
    /// no-op, so callers may treat "already removed" as success.
    pub fn set_quantity(&mut self, product_id: Uuid, quantity: u32) {
        if quantity == 0 {
            self.remove(product_id);
            return;
        }

        if let Some(existing) = self.find_mut(product_id) {
            existing.quantity = quantity;
        }
    }

    /// Removes a line if present; no-op otherwise.
    pub fn remove(&mut self, product_id: Uuid) {
        self.items.retain(|item| item.product_id != product_id);
    }

    /// Empties the basket.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// The quantity held for a product, zero when absent.
    pub fn quantity_of(&self, product_id: Uuid) -> u32 {
        self.find(product_id).map_or(0, |item| item.quantity)
    }

    /// The line for a product, when present.
    pub fn find(&self, product_id: Uuid) -> Option<&LineItem> {
        self.items.iter().find(|item| item.product_id == product_id)
    }

    fn find_mut(&mut self, product_id: Uuid) -> Option<&mut LineItem> {
        self.items
            .iter_mut()
            .find(|item| item.product_id == product_id)
    }

    /// All lines in the basket.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// The number of distinct lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the basket holds no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
