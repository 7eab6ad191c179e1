//! Session-local cart store.

use std::sync::{Arc, Mutex, PoisonError};

use bazaar::items::LineItem;
use mockall::automock;

/// The fallback storage tier: always available, never fails.
///
/// Persistence is best-effort: contents live only as long as the session
/// does, which is acceptable for a guest cart.
#[automock]
pub trait LocalCartStore: Send + Sync {
    fn load(&self) -> Vec<LineItem>;

    fn save(&self, items: &[LineItem]);
}

impl<S: LocalCartStore> LocalCartStore for Arc<S> {
    fn load(&self) -> Vec<LineItem> {
        (**self).load()
    }

    fn save(&self, items: &[LineItem]) {
        (**self).save(items);
    }
}

/// In-process implementation backing one session.
#[derive(Debug, Default)]
pub struct SessionCartStore {
    items: Mutex<Vec<LineItem>>,
}

impl SessionCartStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_items(items: Vec<LineItem>) -> Self {
        Self {
            items: Mutex::new(items),
        }
    }
}

impl LocalCartStore for SessionCartStore {
    fn load(&self) -> Vec<LineItem> {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn save(&self, items: &[LineItem]) {
        *self.items.lock().unwrap_or_else(PoisonError::into_inner) = items.to_vec();
    }
}
