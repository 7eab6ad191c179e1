//! Cart storage tiers.

pub mod local;
pub mod remote;

pub use local::{LocalCartStore, MockLocalCartStore, SessionCartStore};
pub use remote::{CartStore, CartStoreError, MockCartStore, PgCartStore};
