//! Line items

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors raised when constructing a line item from raw values.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ItemError {
    /// The quantity was zero; a line always carries at least one unit.
    #[error("quantity must be at least 1")]
    ZeroQuantity,

    /// The unit price was negative.
    #[error("unit price must not be negative")]
    NegativePrice,
}

/// A single line in a basket.
///
/// `product_id` is the line's identity: a basket never holds two lines for
/// the same product. See [`crate::basket::Basket::add`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: Uuid,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    /// Stock level reported by the catalog when the line was added.
    pub available_stock: Option<u32>,
    /// Pre-discount price shown struck through, when the product has one.
    pub compare_price: Option<Decimal>,
}

impl LineItem {
    /// Creates a validated line item.
    ///
    /// # Errors
    ///
    /// Returns an [`ItemError`] when `quantity` is zero or `unit_price` is
    /// negative.
    pub fn new(
        product_id: Uuid,
        name: impl Into<String>,
        unit_price: Decimal,
        quantity: u32,
    ) -> Result<Self, ItemError> {
        if quantity == 0 {
            return Err(ItemError::ZeroQuantity);
        }

        if unit_price.is_sign_negative() && !unit_price.is_zero() {
            return Err(ItemError::NegativePrice);
        }

        Ok(Self {
            product_id,
            name: name.into(),
            unit_price,
            quantity,
            available_stock: None,
            compare_price: None,
        })
    }

    /// Attaches a stock snapshot to the line.
    pub fn with_available_stock(mut self, available_stock: u32) -> Self {
        self.available_stock = Some(available_stock);
        self
    }

    /// Attaches a compare-at price to the line.
    pub fn with_compare_price(mut self, compare_price: Decimal) -> Self {
        self.compare_price = Some(compare_price);
        self
    }

    /// The extended price of the line: unit price times quantity.
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}
