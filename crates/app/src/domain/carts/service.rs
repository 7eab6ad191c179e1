//! Carts service.

use std::{sync::Arc, time::Duration};

use bazaar::{
    basket::Basket,
    items::LineItem,
    pricing::{PricingPolicy, compute_totals},
};
use tokio::{sync::Mutex, time::timeout};
use tracing::warn;
use uuid::Uuid;

use crate::{
    domain::{
        carts::{
            data::ProductSnapshot,
            errors::CartSyncError,
            models::{Cart, CartSource, CartWarning},
            stores::{CartStore, CartStoreError, LocalCartStore},
        },
        users::models::UserUuid,
    },
    identity::{Identity, IdentitySession},
};

const DEFAULT_REMOTE_TIMEOUT: Duration = Duration::from_secs(3);

/// The storage tier a session resolved to on first load.
#[derive(Debug, Clone, Copy)]
enum CartTier {
    Remote(UserUuid),
    Local,
}

impl CartTier {
    fn source(self) -> CartSource {
        match self {
            Self::Remote(_) => CartSource::Remote,
            Self::Local => CartSource::Local,
        }
    }
}

#[derive(Debug)]
struct SessionCart {
    tier: CartTier,
    basket: Basket,
}

/// One logical cart over two storage tiers.
///
/// An instance belongs to a single session/request context and is built
/// with its stores injected. The first operation resolves which tier owns
/// the session (the remote store when the identity is recognised, the
/// session store otherwise) and the session stays pinned to that tier;
/// it never silently swaps mid-session.
///
/// Mutations validate first, then write through to the pinned tier, and
/// only then replace the in-memory basket, so a failed call leaves the
/// cart exactly as it was. Every successful call returns the cart with
/// totals freshly computed; callers never compute totals themselves.
///
/// Calls on one instance serialize through an internal lock. Two sessions
/// for the same identity can still interleave remote writes and lose an
/// increment; resolving that would need coordination in the remote store
/// and is out of scope here.
pub struct CartSyncService<R, L> {
    remote: R,
    local: L,
    identity: Arc<dyn IdentitySession>,
    policy: PricingPolicy,
    remote_timeout: Duration,
    state: Mutex<Option<SessionCart>>,
}

impl<R: CartStore, L: LocalCartStore> CartSyncService<R, L> {
    #[must_use]
    pub fn new(remote: R, local: L, identity: Arc<dyn IdentitySession>, policy: PricingPolicy) -> Self {
        Self {
            remote,
            local,
            identity,
            policy,
            remote_timeout: DEFAULT_REMOTE_TIMEOUT,
            state: Mutex::new(None),
        }
    }

    /// Overrides the bound on remote store calls.
    #[must_use]
    pub fn with_remote_timeout(mut self, remote_timeout: Duration) -> Self {
        self.remote_timeout = remote_timeout;
        self
    }

    /// Resolves the session's tier and hydrates the cart.
    ///
    /// Idempotent: once the session is pinned, further calls return the
    /// cached cart without touching either store, so concurrent UI
    /// triggers cost one fetch at most.
    #[tracing::instrument(name = "carts.service.load", skip(self))]
    pub async fn load(&self) -> Cart {
        let mut guard = self.state.lock().await;

        let (session, warning) = self.ready(&mut guard).await;

        self.view(&session.basket, session.tier.source(), warning)
    }

    /// Adds `quantity` units of a product.
    ///
    /// An existing line for the product is incremented, and the increment
    /// is computed against the basket as read inside this call. Callers
    /// should serialize calls touching the same product; interleaved adds
    /// from separate sessions can lose an increment.
    #[tracing::instrument(
        name = "carts.service.add_item",
        skip(self, product),
        fields(product_uuid = %product.uuid),
        err
    )]
    pub async fn add_item(
        &self,
        product: ProductSnapshot,
        quantity: u32,
    ) -> Result<Cart, CartSyncError> {
        let item = product.into_line_item(quantity)?;

        let mut guard = self.state.lock().await;
        let (session, load_warning) = self.ready(&mut guard).await;

        if let Some(available) = item.available_stock {
            let requested = session.basket.quantity_of(item.product_id) + item.quantity;

            if requested > available {
                return Err(CartSyncError::InsufficientStock {
                    available,
                    requested,
                });
            }
        }

        let mut candidate = session.basket.clone();
        candidate.add(item);

        let warning = self
            .write_through(session.tier, candidate.items())
            .await
            .or(load_warning);

        session.basket = candidate;

        Ok(self.view(&session.basket, session.tier.source(), warning))
    }

    /// Sets a line's quantity absolutely; zero removes the line.
    ///
    /// An unknown product succeeds without effect, so removing an
    /// already-removed line never surfaces an error.
    #[tracing::instrument(name = "carts.service.update_quantity", skip(self), err)]
    pub async fn update_quantity(
        &self,
        product_id: Uuid,
        quantity: u32,
    ) -> Result<Cart, CartSyncError> {
        let mut guard = self.state.lock().await;
        let (session, load_warning) = self.ready(&mut guard).await;

        if quantity > 0
            && let Some(line) = session.basket.find(product_id)
            && let Some(available) = line.available_stock
            && quantity > available
        {
            return Err(CartSyncError::InsufficientStock {
                available,
                requested: quantity,
            });
        }

        let mut candidate = session.basket.clone();
        candidate.set_quantity(product_id, quantity);

        let warning = self
            .write_through(session.tier, candidate.items())
            .await
            .or(load_warning);

        session.basket = candidate;

        Ok(self.view(&session.basket, session.tier.source(), warning))
    }

    /// Removes a line if present; no-op otherwise.
    #[tracing::instrument(name = "carts.service.remove_item", skip(self), err)]
    pub async fn remove_item(&self, product_id: Uuid) -> Result<Cart, CartSyncError> {
        self.update_quantity(product_id, 0).await
    }

    /// Empties the cart in the pinned tier.
    #[tracing::instrument(name = "carts.service.clear", skip(self), err)]
    pub async fn clear(&self) -> Result<Cart, CartSyncError> {
        let mut guard = self.state.lock().await;
        let (session, load_warning) = self.ready(&mut guard).await;

        let mut candidate = session.basket.clone();
        candidate.clear();

        let warning = self
            .write_through(session.tier, candidate.items())
            .await
            .or(load_warning);

        session.basket = candidate;

        Ok(self.view(&session.basket, session.tier.source(), warning))
    }

    async fn ready<'a>(
        &self,
        guard: &'a mut Option<SessionCart>,
    ) -> (&'a mut SessionCart, Option<CartWarning>) {
        let warning;

        let session = match guard.take() {
            Some(session) => {
                warning = None;
                guard.insert(session)
            }
            None => {
                let (session, hydrate_warning) = self.hydrate().await;
                warning = hydrate_warning;
                guard.insert(session)
            }
        };

        (session, warning)
    }

    async fn hydrate(&self) -> (SessionCart, Option<CartWarning>) {
        let Identity::Known { user, .. } = self.identity.current_user() else {
            return (self.local_session(), None);
        };

        match timeout(self.remote_timeout, self.remote.fetch(user)).await {
            Ok(Ok(items)) => (
                SessionCart {
                    tier: CartTier::Remote(user),
                    basket: Basket::from_items(items.unwrap_or_default()),
                },
                None,
            ),
            Ok(Err(CartStoreError::Unauthenticated)) => (self.local_session(), None),
            Ok(Err(CartStoreError::Unavailable(error))) => {
                warn!(error = %error, "remote cart unavailable, using session store");

                (self.local_session(), Some(CartWarning::RemoteUnavailable))
            }
            Err(_elapsed) => {
                warn!("remote cart fetch timed out, using session store");

                (self.local_session(), Some(CartWarning::RemoteUnavailable))
            }
        }
    }

    fn local_session(&self) -> SessionCart {
        SessionCart {
            tier: CartTier::Local,
            basket: Basket::from_items(self.local.load()),
        }
    }

    /// Persists `items` to the pinned tier.
    ///
    /// A failed remote write lands in the session store for this one
    /// operation. The session does not re-pin, so the next write tries
    /// the remote tier again.
    async fn write_through(&self, tier: CartTier, items: &[LineItem]) -> Option<CartWarning> {
        let user = match tier {
            CartTier::Local => {
                self.local.save(items);
                return None;
            }
            CartTier::Remote(user) => user,
        };

        match timeout(self.remote_timeout, self.remote.store(user, items)).await {
            Ok(Ok(())) => None,
            Ok(Err(CartStoreError::Unauthenticated)) => {
                self.local.save(items);

                None
            }
            Ok(Err(CartStoreError::Unavailable(error))) => {
                warn!(error = %error, "remote cart write failed, wrote session store instead");
                self.local.save(items);

                Some(CartWarning::RemoteUnavailable)
            }
            Err(_elapsed) => {
                warn!("remote cart write timed out, wrote session store instead");
                self.local.save(items);

                Some(CartWarning::RemoteUnavailable)
            }
        }
    }

    fn view(&self, basket: &Basket, source: CartSource, warning: Option<CartWarning>) -> Cart {
        Cart {
            items: basket.items().to_vec(),
            totals: compute_totals(basket.items(), &self.policy),
            source,
            warning,
        }
    }
}
