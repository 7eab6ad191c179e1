//! Vendor request store.
//!
//! [`RequestStore`] is the transactional boundary the approval workflow
//! runs on: every operation takes an open transaction handle, and dropping
//! the handle without [`RequestStore::commit`] discards all staged writes.

use async_trait::async_trait;
use jiff::Timestamp;
use sqlx::{Postgres, Transaction};

use crate::{
    database::Db,
    domain::{
        notifications::{models::NewNotification, repository::PgNotificationsRepository},
        users::{models::UserUuid, repository::PgUsersRepository},
        vendor_requests::{
            data::NewVendorRequest,
            errors::RequestStoreError,
            models::{Decision, VendorProfile, VendorRequest, VendorRequestUuid},
            repository::PgVendorRequestsRepository,
        },
    },
};

#[async_trait]
pub trait RequestStore: Send + Sync {
    /// An open transaction. All writes staged through it become visible
    /// together at [`RequestStore::commit`], or not at all.
    type Tx: Send;

    async fn begin(&self) -> Result<Self::Tx, RequestStoreError>;

    async fn commit(&self, tx: Self::Tx) -> Result<(), RequestStoreError>;

    async fn insert_request(
        &self,
        tx: &mut Self::Tx,
        request: &NewVendorRequest,
    ) -> Result<VendorRequest, RequestStoreError>;

    async fn list_pending(&self, tx: &mut Self::Tx)
    -> Result<Vec<VendorRequest>, RequestStoreError>;

    /// Loads a request, holding it against concurrent decisions until the
    /// transaction ends.
    async fn find_request_for_update(
        &self,
        tx: &mut Self::Tx,
        request: VendorRequestUuid,
    ) -> Result<Option<VendorRequest>, RequestStoreError>;

    /// Conditionally moves a request out of `pending`, stamping the actor
    /// and time. Returns the number of rows updated: zero means the
    /// request was no longer pending when the write applied.
    async fn mark_processed(
        &self,
        tx: &mut Self::Tx,
        request: VendorRequestUuid,
        decision: Decision,
        actor: UserUuid,
        processed_at: Timestamp,
    ) -> Result<u64, RequestStoreError>;

    /// Promotes the user to vendor and copies the storefront profile onto
    /// them. Returns the number of rows updated.
    async fn promote_user(
        &self,
        tx: &mut Self::Tx,
        user: UserUuid,
        profile: &VendorProfile,
    ) -> Result<u64, RequestStoreError>;

    async fn insert_notification(
        &self,
        tx: &mut Self::Tx,
        notification: &NewNotification,
    ) -> Result<(), RequestStoreError>;
}

/// `PostgreSQL`-backed request store.
#[derive(Debug, Clone)]
pub struct PgRequestStore {
    db: Db,
    requests: PgVendorRequestsRepository,
    users: PgUsersRepository,
    notifications: PgNotificationsRepository,
}

impl PgRequestStore {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            requests: PgVendorRequestsRepository::new(),
            users: PgUsersRepository::new(),
            notifications: PgNotificationsRepository::new(),
        }
    }
}

#[async_trait]
impl RequestStore for PgRequestStore {
    type Tx = Transaction<'static, Postgres>;

    async fn begin(&self) -> Result<Self::Tx, RequestStoreError> {
        Ok(self.db.begin().await?)
    }

    async fn commit(&self, tx: Self::Tx) -> Result<(), RequestStoreError> {
        Ok(tx.commit().await?)
    }

    async fn insert_request(
        &self,
        tx: &mut Self::Tx,
        request: &NewVendorRequest,
    ) -> Result<VendorRequest, RequestStoreError> {
        Ok(self.requests.create_request(tx, request).await?)
    }

    async fn list_pending(
        &self,
        tx: &mut Self::Tx,
    ) -> Result<Vec<VendorRequest>, RequestStoreError> {
        Ok(self.requests.list_pending(tx).await?)
    }

    async fn find_request_for_update(
        &self,
        tx: &mut Self::Tx,
        request: VendorRequestUuid,
    ) -> Result<Option<VendorRequest>, RequestStoreError> {
        Ok(self.requests.find_for_update(tx, request).await?)
    }

    async fn mark_processed(
        &self,
        tx: &mut Self::Tx,
        request: VendorRequestUuid,
        decision: Decision,
        actor: UserUuid,
        processed_at: Timestamp,
    ) -> Result<u64, RequestStoreError> {
        Ok(self
            .requests
            .mark_processed(tx, request, decision, actor, processed_at)
            .await?)
    }

    async fn promote_user(
        &self,
        tx: &mut Self::Tx,
        user: UserUuid,
        profile: &VendorProfile,
    ) -> Result<u64, RequestStoreError> {
        Ok(self.users.promote_to_vendor(tx, user, profile).await?)
    }

    async fn insert_notification(
        &self,
        tx: &mut Self::Tx,
        notification: &NewNotification,
    ) -> Result<(), RequestStoreError> {
        Ok(self
            .notifications
            .create_notification(tx, notification)
            .await?)
    }
}
