//! Cart service errors.

use bazaar::items::ItemError;
use thiserror::Error;

/// Failures surfaced by cart mutations.
///
/// Storage trouble is not listed here: the session store absorbs remote
/// write failures, so a mutation that validates cleanly always lands
/// somewhere. Degraded writes are reported through
/// [`crate::domain::carts::models::CartWarning`] instead.
#[derive(Debug, Error)]
pub enum CartSyncError {
    #[error(transparent)]
    Invalid(#[from] ItemError),

    #[error("only {available} in stock, {requested} requested")]
    InsufficientStock { available: u32, requested: u32 },
}
