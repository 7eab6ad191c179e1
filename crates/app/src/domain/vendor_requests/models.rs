//! Vendor request models.

use std::str::FromStr;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{domain::users::models::UserUuid, uuids::TypedUuid};

/// Vendor Request UUID
pub type VendorRequestUuid = TypedUuid<VendorRequest>;

/// Lifecycle state of a vendor request.
///
/// `Pending` is the only state a request can leave; `Approved` and
/// `Rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn is_pending(self) -> bool {
        matches!(self, Self::Pending)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown request status: {0}")]
pub struct ParseRequestStatusError(String);

impl FromStr for RequestStatus {
    type Err = ParseRequestStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            other => Err(ParseRequestStatusError(other.to_string())),
        }
    }
}

/// A moderator's verdict on a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    /// The terminal status this decision moves the request to.
    pub fn target_status(self) -> RequestStatus {
        match self {
            Self::Approve => RequestStatus::Approved,
            Self::Reject => RequestStatus::Rejected,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }
}

/// Storefront details supplied with a vendor application and copied onto
/// the user profile on approval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorProfile {
    pub store_name: String,
    pub store_description: String,
    pub business_type: String,
    pub registration_number: String,
    pub tax_id: String,
}

/// A supporting document attached to an application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VendorDocument {
    pub kind: String,
    pub url: String,
}

/// Vendor Request Model
///
/// `user_uuid` never changes after submission. `processed_by` and
/// `processed_at` are set exactly once, on the transition out of
/// `Pending`.
#[derive(Debug, Clone, PartialEq)]
pub struct VendorRequest {
    pub uuid: VendorRequestUuid,
    pub user_uuid: UserUuid,
    pub profile: VendorProfile,
    pub documents: Vec<VendorDocument>,
    pub status: RequestStatus,
    pub processed_by: Option<UserUuid>,
    pub processed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
