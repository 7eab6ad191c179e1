//! Checkout pricing
//!
//! Totals are a pure function of the line items and a [`PricingPolicy`].
//! Arithmetic stays on unrounded decimals; rounding to presentation
//! precision happens only through [`Totals::rounded`].

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::items::LineItem;

fn default_tax_rate() -> Decimal {
    Decimal::new(10, 2)
}

fn default_free_shipping_threshold() -> Decimal {
    Decimal::ONE_HUNDRED
}

fn default_flat_shipping_fee() -> Decimal {
    Decimal::TEN
}

/// Tax and shipping policy applied at checkout.
///
/// Tax is a single flat rate with no jurisdiction model. Each field can be
/// overridden independently through configuration; missing fields keep
/// their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingPolicy {
    /// Fraction of the subtotal charged as tax.
    #[serde(default = "default_tax_rate")]
    pub tax_rate: Decimal,

    /// Subtotal above which shipping is free. The boundary is exclusive:
    /// a subtotal equal to the threshold still pays the flat fee.
    #[serde(default = "default_free_shipping_threshold")]
    pub free_shipping_threshold: Decimal,

    /// Shipping charged on orders at or below the threshold.
    #[serde(default = "default_flat_shipping_fee")]
    pub flat_shipping_fee: Decimal,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            tax_rate: default_tax_rate(),
            free_shipping_threshold: default_free_shipping_threshold(),
            flat_shipping_fee: default_flat_shipping_fee(),
        }
    }
}

/// Monetary breakdown of a basket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub shipping: Decimal,
    pub total: Decimal,
}

impl Totals {
    /// Totals for an empty basket.
    pub const ZERO: Self = Self {
        subtotal: Decimal::ZERO,
        tax: Decimal::ZERO,
        shipping: Decimal::ZERO,
        total: Decimal::ZERO,
    };

    /// Rounds every field to two decimal places, midpoints away from zero.
    pub fn rounded(&self) -> Self {
        Self {
            subtotal: round_currency(self.subtotal),
            tax: round_currency(self.tax),
            shipping: round_currency(self.shipping),
            total: round_currency(self.total),
        }
    }
}

fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Computes checkout totals for the given lines.
///
/// An empty list yields [`Totals::ZERO`]; no items means no shipping
/// charge either. Inputs are assumed validated (see
/// [`crate::items::LineItem::new`]); this function performs no I/O and no
/// validation of its own.
pub fn compute_totals(items: &[LineItem], policy: &PricingPolicy) -> Totals {
    if items.is_empty() {
        return Totals::ZERO;
    }

    let subtotal: Decimal = items.iter().map(LineItem::line_total).sum();
    let tax = subtotal * policy.tax_rate;

    let shipping = if subtotal > policy.free_shipping_threshold {
        Decimal::ZERO
    } else {
        policy.flat_shipping_fee
    };

    Totals {
        subtotal,
        tax,
        shipping,
        total: subtotal + tax + shipping,
    }
}
