//! Carts

pub mod data;
pub mod errors;
pub mod models;
pub mod service;
pub mod stores;

pub use errors::CartSyncError;
pub use service::CartSyncService;
