//! Vendor Request Data

use crate::domain::{
    users::models::UserUuid,
    vendor_requests::models::{VendorDocument, VendorProfile, VendorRequestUuid},
};

/// New Vendor Request Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewVendorRequest {
    pub uuid: VendorRequestUuid,
    pub user_uuid: UserUuid,
    pub profile: VendorProfile,
    pub documents: Vec<VendorDocument>,
}
