//! Cart Data

use bazaar::items::{ItemError, LineItem};
use rust_decimal::Decimal;
use uuid::Uuid;

/// Catalog snapshot handed to the cart when a product is added.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductSnapshot {
    pub uuid: Uuid,
    pub name: String,
    pub unit_price: Decimal,
    pub available_stock: Option<u32>,
    pub compare_price: Option<Decimal>,
}

impl ProductSnapshot {
    /// Turns the snapshot into a validated line of `quantity` units.
    ///
    /// # Errors
    ///
    /// Returns an [`ItemError`] when the quantity or price is malformed.
    pub fn into_line_item(self, quantity: u32) -> Result<LineItem, ItemError> {
        let mut item = LineItem::new(self.uuid, self.name, self.unit_price, quantity)?;

        item.available_stock = self.available_stock;
        item.compare_price = self.compare_price;

        Ok(item)
    }
}
