//! Cart Models

use bazaar::{items::LineItem, pricing::Totals};

/// Which storage tier a cart session is pinned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartSource {
    /// The identity-scoped remote store; authoritative when reachable.
    Remote,
    /// The per-session fallback store.
    Local,
}

/// Non-fatal degradation surfaced alongside a successful cart operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartWarning {
    /// The remote tier could not be reached; this operation used the
    /// session store instead.
    RemoteUnavailable,
}

/// Cart Model
///
/// The monetary fields are derived from `items` on every operation and
/// never stored independently.
#[derive(Debug, Clone, PartialEq)]
pub struct Cart {
    pub items: Vec<LineItem>,
    pub totals: Totals,
    pub source: CartSource,
    pub warning: Option<CartWarning>,
}
