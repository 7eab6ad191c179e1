//! Notification models.

use jiff::Timestamp;

use crate::{domain::users::models::UserUuid, uuids::TypedUuid};

/// Notification UUID
pub type NotificationUuid = TypedUuid<Notification>;

/// What a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    VendorApproved,
    VendorRejected,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::VendorApproved => "vendor_approved",
            Self::VendorRejected => "vendor_rejected",
        }
    }
}

/// Notification Model
///
/// Notifications are append-only: the workflow that creates one never
/// touches it again. `is_read` belongs to the inbox surface, not here.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub uuid: NotificationUuid,
    pub user_uuid: UserUuid,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: Timestamp,
}

/// New Notification Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    pub uuid: NotificationUuid,
    pub user_uuid: UserUuid,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
}
