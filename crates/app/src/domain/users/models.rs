//! User models.

use std::str::FromStr;

use jiff::Timestamp;
use thiserror::Error;

use crate::{domain::vendor_requests::models::VendorProfile, uuids::TypedUuid};

/// User UUID
pub type UserUuid = TypedUuid<UserProfile>;

/// The role a user acts under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Vendor,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Vendor => "VENDOR",
            Self::Admin => "ADMIN",
        }
    }
}

#[derive(Debug, Error)]
#[error("unknown role: {0}")]
pub struct ParseRoleError(String);

impl FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "USER" => Ok(Self::User),
            "VENDOR" => Ok(Self::Vendor),
            "ADMIN" => Ok(Self::Admin),
            other => Err(ParseRoleError(other.to_string())),
        }
    }
}

/// User Profile Model
///
/// `vendor` holds the storefront fields copied from an approved vendor
/// request; it stays `None` for plain users and admins.
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub uuid: UserUuid,
    pub role: Role,
    pub is_verified: bool,
    pub is_active: bool,
    pub vendor: Option<VendorProfile>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
