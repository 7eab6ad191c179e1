//! Users Repository

use sqlx::{Postgres, Transaction, query};

use crate::domain::{users::models::UserUuid, vendor_requests::models::VendorProfile};

const PROMOTE_USER_TO_VENDOR_SQL: &str = include_str!("sql/promote_user_to_vendor.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgUsersRepository;

impl PgUsersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Promotes a user to vendor and copies the storefront profile onto the
    /// user row. Returns the number of rows touched; zero means the user
    /// does not exist.
    pub(crate) async fn promote_to_vendor(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        profile: &VendorProfile,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(PROMOTE_USER_TO_VENDOR_SQL)
            .bind(user.into_uuid())
            .bind(&profile.store_name)
            .bind(&profile.store_description)
            .bind(&profile.business_type)
            .bind(&profile.registration_number)
            .bind(&profile.tax_id)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}
