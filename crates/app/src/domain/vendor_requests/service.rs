//! Vendor requests service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::info;

use crate::domain::{
    notifications::models::{NewNotification, NotificationKind, NotificationUuid},
    users::models::UserUuid,
    vendor_requests::{
        data::NewVendorRequest,
        errors::VendorRequestsError,
        models::{Decision, VendorRequest, VendorRequestUuid},
        store::RequestStore,
    },
};

/// Runs the vendor application lifecycle over a [`RequestStore`].
///
/// `transition` performs its whole effect (request status, user
/// promotion, notification) inside one store transaction, so a failure
/// anywhere leaves nothing behind.
#[derive(Debug, Clone)]
pub struct VendorApprovalWorkflow<S> {
    store: S,
}

impl<S: RequestStore> VendorApprovalWorkflow<S> {
    #[must_use]
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S: RequestStore> VendorRequestsService for VendorApprovalWorkflow<S> {
    #[tracing::instrument(
        name = "vendor_requests.service.submit",
        skip(self, request),
        fields(request_uuid = %request.uuid, user_uuid = %request.user_uuid),
        err
    )]
    async fn submit(
        &self,
        request: NewVendorRequest,
    ) -> Result<VendorRequest, VendorRequestsError> {
        let mut tx = self.store.begin().await?;

        let created = self.store.insert_request(&mut tx, &request).await?;

        self.store.commit(tx).await?;

        info!(request_uuid = %created.uuid, "submitted vendor request");

        Ok(created)
    }

    async fn list_pending(&self) -> Result<Vec<VendorRequest>, VendorRequestsError> {
        let mut tx = self.store.begin().await?;

        let pending = self.store.list_pending(&mut tx).await?;

        self.store.commit(tx).await?;

        Ok(pending)
    }

    #[tracing::instrument(
        name = "vendor_requests.service.transition",
        skip(self),
        fields(request_uuid = %request, decision = decision.as_str(), actor_uuid = %actor),
        err
    )]
    async fn transition(
        &self,
        request: VendorRequestUuid,
        decision: Decision,
        actor: UserUuid,
    ) -> Result<VendorRequest, VendorRequestsError> {
        let mut tx = self.store.begin().await?;

        let Some(found) = self.store.find_request_for_update(&mut tx, request).await? else {
            return Err(VendorRequestsError::NotFound);
        };

        if !found.status.is_pending() {
            return Err(VendorRequestsError::AlreadyProcessed);
        }

        let processed_at = Timestamp::now();

        let updated = self
            .store
            .mark_processed(&mut tx, request, decision, actor, processed_at)
            .await?;

        // The row lock makes this unreachable in the Pg store, but any
        // store without lock-on-read can still lose the race here.
        if updated == 0 {
            return Err(VendorRequestsError::AlreadyProcessed);
        }

        if decision == Decision::Approve {
            let promoted = self
                .store
                .promote_user(&mut tx, found.user_uuid, &found.profile)
                .await?;

            if promoted == 0 {
                return Err(VendorRequestsError::UserNotFound);
            }
        }

        let notification = decision_notification(&found, decision);

        self.store
            .insert_notification(&mut tx, &notification)
            .await?;

        self.store.commit(tx).await?;

        info!(request_uuid = %found.uuid, decision = decision.as_str(), "processed vendor request");

        Ok(VendorRequest {
            status: decision.target_status(),
            processed_by: Some(actor),
            processed_at: Some(processed_at),
            updated_at: processed_at,
            ..found
        })
    }
}

#[automock]
#[async_trait]
/// Vendor application operations.
pub trait VendorRequestsService: Send + Sync {
    /// Files a new application, which starts out pending.
    async fn submit(&self, request: NewVendorRequest)
    -> Result<VendorRequest, VendorRequestsError>;

    /// The moderation queue, oldest application first.
    async fn list_pending(&self) -> Result<Vec<VendorRequest>, VendorRequestsError>;

    /// Applies a moderator's decision to a pending application.
    async fn transition(
        &self,
        request: VendorRequestUuid,
        decision: Decision,
        actor: UserUuid,
    ) -> Result<VendorRequest, VendorRequestsError>;
}

/// The notification announcing a decision to the applicant.
fn decision_notification(request: &VendorRequest, decision: Decision) -> NewNotification {
    let (kind, title, message) = match decision {
        Decision::Approve => (
            NotificationKind::VendorApproved,
            "Vendor application approved".to_string(),
            format!(
                "Congratulations! Your store \"{}\" has been approved and your vendor account is now active.",
                request.profile.store_name
            ),
        ),
        Decision::Reject => (
            NotificationKind::VendorRejected,
            "Vendor application rejected".to_string(),
            format!(
                "Your vendor application for \"{}\" was not approved. You can contact support for details.",
                request.profile.store_name
            ),
        ),
    };

    NewNotification {
        uuid: NotificationUuid::new(),
        user_uuid: request.user_uuid,
        kind,
        title,
        message,
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::{
            users::models::Role,
            vendor_requests::models::{RequestStatus, VendorProfile},
        },
        test::fakes::InMemoryRequestStore,
    };

    use super::*;

    fn profile() -> VendorProfile {
        VendorProfile {
            store_name: "North Quay Ceramics".to_string(),
            store_description: "Hand-thrown tableware".to_string(),
            business_type: "sole_trader".to_string(),
            registration_number: "NQ-4471".to_string(),
            tax_id: "GB-882910".to_string(),
        }
    }

    fn new_request(user: UserUuid) -> NewVendorRequest {
        NewVendorRequest {
            uuid: VendorRequestUuid::new(),
            user_uuid: user,
            profile: profile(),
            documents: Vec::new(),
        }
    }

    #[tokio::test]
    async fn approve_promotes_user_and_notifies() -> TestResult {
        let store = InMemoryRequestStore::new();
        let user = store.seed_user(Role::User);
        let request = store.seed_pending_request(user, profile());
        let actor = store.seed_user(Role::Admin);

        let service = VendorApprovalWorkflow::new(store.clone());

        let processed = service.transition(request, Decision::Approve, actor).await?;

        assert_eq!(processed.status, RequestStatus::Approved);
        assert_eq!(processed.processed_by, Some(actor));
        assert!(processed.processed_at.is_some(), "processed_at must be set");

        let stored = store.request(request);
        assert_eq!(stored.map(|r| r.status), Some(RequestStatus::Approved));

        let promoted = store.user(user);
        assert_eq!(promoted.as_ref().map(|u| u.role), Some(Role::Vendor));
        assert_eq!(promoted.as_ref().map(|u| u.is_verified), Some(true));
        assert_eq!(promoted.as_ref().map(|u| u.is_active), Some(true));
        assert_eq!(
            promoted.and_then(|u| u.vendor),
            Some(profile()),
            "storefront profile should be copied onto the user"
        );

        let notifications = store.notifications_for(user);
        assert_eq!(notifications.len(), 1);
        assert_eq!(
            notifications.first().map(|n| n.kind),
            Some(NotificationKind::VendorApproved)
        );

        Ok(())
    }

    #[tokio::test]
    async fn second_decision_returns_already_processed() -> TestResult {
        let store = InMemoryRequestStore::new();
        let user = store.seed_user(Role::User);
        let request = store.seed_pending_request(user, profile());
        let actor = store.seed_user(Role::Admin);

        let service = VendorApprovalWorkflow::new(store.clone());

        service.transition(request, Decision::Approve, actor).await?;

        let result = service.transition(request, Decision::Approve, actor).await;

        assert!(
            matches!(result, Err(VendorRequestsError::AlreadyProcessed)),
            "expected AlreadyProcessed, got {result:?}"
        );

        // The retry must leave no trace: still exactly one notification.
        assert_eq!(store.notifications_for(user).len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn reject_does_not_promote() -> TestResult {
        let store = InMemoryRequestStore::new();
        let user = store.seed_user(Role::User);
        let request = store.seed_pending_request(user, profile());
        let actor = store.seed_user(Role::Admin);

        let service = VendorApprovalWorkflow::new(store.clone());

        let processed = service.transition(request, Decision::Reject, actor).await?;

        assert_eq!(processed.status, RequestStatus::Rejected);

        let unchanged = store.user(user);
        assert_eq!(unchanged.as_ref().map(|u| u.role), Some(Role::User));
        assert_eq!(unchanged.and_then(|u| u.vendor), None);

        let notifications = store.notifications_for(user);
        assert_eq!(
            notifications.first().map(|n| n.kind),
            Some(NotificationKind::VendorRejected)
        );

        Ok(())
    }

    #[tokio::test]
    async fn rejected_request_cannot_be_approved_later() -> TestResult {
        let store = InMemoryRequestStore::new();
        let user = store.seed_user(Role::User);
        let request = store.seed_pending_request(user, profile());
        let actor = store.seed_user(Role::Admin);

        let service = VendorApprovalWorkflow::new(store.clone());

        service.transition(request, Decision::Reject, actor).await?;

        let result = service.transition(request, Decision::Approve, actor).await;

        assert!(
            matches!(result, Err(VendorRequestsError::AlreadyProcessed)),
            "expected AlreadyProcessed, got {result:?}"
        );
        assert_eq!(
            store.user(user).map(|u| u.role),
            Some(Role::User),
            "a rejected request must never promote"
        );

        Ok(())
    }

    #[tokio::test]
    async fn unknown_request_is_not_found() {
        let store = InMemoryRequestStore::new();
        let actor = store.seed_user(Role::Admin);

        let service = VendorApprovalWorkflow::new(store);

        let result = service
            .transition(VendorRequestUuid::new(), Decision::Approve, actor)
            .await;

        assert!(
            matches!(result, Err(VendorRequestsError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn notification_failure_rolls_back_everything() -> TestResult {
        let store = InMemoryRequestStore::new();
        let user = store.seed_user(Role::User);
        let request = store.seed_pending_request(user, profile());
        let actor = store.seed_user(Role::Admin);

        store.fail_notification_inserts(true);

        let service = VendorApprovalWorkflow::new(store.clone());

        let result = service.transition(request, Decision::Approve, actor).await;

        assert!(
            matches!(result, Err(VendorRequestsError::Store(_))),
            "expected a store failure, got {result:?}"
        );

        let untouched = store.request(request);
        assert_eq!(
            untouched.map(|r| r.status),
            Some(RequestStatus::Pending),
            "a failed transition must leave the request pending"
        );
        assert_eq!(store.user(user).map(|u| u.role), Some(Role::User));
        assert!(store.notifications_for(user).is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn submit_creates_a_pending_request() -> TestResult {
        let store = InMemoryRequestStore::new();
        let user = store.seed_user(Role::User);

        let service = VendorApprovalWorkflow::new(store.clone());

        let created = service.submit(new_request(user)).await?;

        assert_eq!(created.status, RequestStatus::Pending);
        assert_eq!(created.processed_by, None);
        assert_eq!(created.processed_at, None);
        assert_eq!(
            store.request(created.uuid).map(|r| r.status),
            Some(RequestStatus::Pending)
        );

        Ok(())
    }

    #[tokio::test]
    async fn second_pending_request_for_same_user_is_rejected() -> TestResult {
        let store = InMemoryRequestStore::new();
        let user = store.seed_user(Role::User);

        let service = VendorApprovalWorkflow::new(store.clone());

        service.submit(new_request(user)).await?;

        let result = service.submit(new_request(user)).await;

        assert!(
            matches!(result, Err(VendorRequestsError::AlreadyPending)),
            "expected AlreadyPending, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn submit_for_unknown_user_is_rejected() {
        let store = InMemoryRequestStore::new();

        let service = VendorApprovalWorkflow::new(store);

        let result = service.submit(new_request(UserUuid::new())).await;

        assert!(
            matches!(result, Err(VendorRequestsError::UserNotFound)),
            "expected UserNotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn list_pending_excludes_processed_requests() -> TestResult {
        let store = InMemoryRequestStore::new();
        let user_a = store.seed_user(Role::User);
        let user_b = store.seed_user(Role::User);
        let request_a = store.seed_pending_request(user_a, profile());
        let request_b = store.seed_pending_request(user_b, profile());
        let actor = store.seed_user(Role::Admin);

        let service = VendorApprovalWorkflow::new(store.clone());

        service
            .transition(request_a, Decision::Reject, actor)
            .await?;

        let pending = service.list_pending().await?;

        let uuids: Vec<VendorRequestUuid> = pending.iter().map(|r| r.uuid).collect();

        assert!(!uuids.contains(&request_a), "processed request listed");
        assert!(uuids.contains(&request_b), "pending request missing");

        Ok(())
    }

    #[test]
    fn notification_content_differs_by_decision() {
        let store = InMemoryRequestStore::new();
        let user = store.seed_user(Role::User);
        let uuid = store.seed_pending_request(user, profile());

        let Some(request) = store.request(uuid) else {
            panic!("seeded request should exist");
        };

        let approved = decision_notification(&request, Decision::Approve);
        let rejected = decision_notification(&request, Decision::Reject);

        assert_ne!(approved.title, rejected.title);
        assert_ne!(approved.message, rejected.message);
        assert!(
            approved.message.contains("North Quay Ceramics"),
            "message should name the store"
        );
        assert_eq!(approved.user_uuid, user);
    }
}
