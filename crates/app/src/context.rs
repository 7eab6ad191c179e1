//! App Context

use std::sync::Arc;

use bazaar::pricing::PricingPolicy;
use thiserror::Error;

use crate::{
    database::{self, Db},
    domain::{
        carts::{
            CartSyncService,
            stores::{PgCartStore, SessionCartStore},
        },
        vendor_requests::{VendorApprovalWorkflow, VendorRequestsService, store::PgRequestStore},
    },
    identity::IdentitySession,
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),
}

#[derive(Clone)]
pub struct AppContext {
    pub vendor_requests: Arc<dyn VendorRequestsService>,
    pub pricing: PricingPolicy,
    db: Db,
}

impl AppContext {
    /// Build application context from a database URL.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection fails.
    pub async fn from_database_url(
        url: &str,
        pricing: PricingPolicy,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url).await.map_err(AppInitError::Database)?;

        let db = Db::new(pool);

        Ok(Self {
            vendor_requests: Arc::new(VendorApprovalWorkflow::new(PgRequestStore::new(
                db.clone(),
            ))),
            pricing,
            db,
        })
    }

    /// Builds the cart service for one session, wired to the remote store
    /// and a fresh session-local fallback.
    pub fn cart_session(
        &self,
        identity: Arc<dyn IdentitySession>,
    ) -> CartSyncService<PgCartStore, SessionCartStore> {
        CartSyncService::new(
            PgCartStore::new(self.db.clone()),
            SessionCartStore::new(),
            identity,
            self.pricing.clone(),
        )
    }
}
