//! Vendor Requests Repository

use std::str::FromStr;

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};
use uuid::Uuid;

use crate::domain::{
    users::models::UserUuid,
    vendor_requests::{
        data::NewVendorRequest,
        models::{Decision, RequestStatus, VendorProfile, VendorRequest, VendorRequestUuid},
    },
};

const CREATE_VENDOR_REQUEST_SQL: &str = include_str!("sql/create_vendor_request.sql");
const GET_VENDOR_REQUEST_FOR_UPDATE_SQL: &str =
    include_str!("sql/get_vendor_request_for_update.sql");
const LIST_PENDING_VENDOR_REQUESTS_SQL: &str =
    include_str!("sql/list_pending_vendor_requests.sql");
const MARK_VENDOR_REQUEST_PROCESSED_SQL: &str =
    include_str!("sql/mark_vendor_request_processed.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgVendorRequestsRepository;

impl PgVendorRequestsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_request(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        request: &NewVendorRequest,
    ) -> Result<VendorRequest, sqlx::Error> {
        let documents = serde_json::to_value(&request.documents)
            .map_err(|e| sqlx::Error::Encode(Box::new(e)))?;

        query_as::<Postgres, VendorRequest>(CREATE_VENDOR_REQUEST_SQL)
            .bind(request.uuid.into_uuid())
            .bind(request.user_uuid.into_uuid())
            .bind(&request.profile.store_name)
            .bind(&request.profile.store_description)
            .bind(&request.profile.business_type)
            .bind(&request.profile.registration_number)
            .bind(&request.profile.tax_id)
            .bind(documents)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_pending(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<VendorRequest>, sqlx::Error> {
        query_as::<Postgres, VendorRequest>(LIST_PENDING_VENDOR_REQUESTS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    /// Loads a request and locks its row for the rest of the transaction.
    pub(crate) async fn find_for_update(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        request: VendorRequestUuid,
    ) -> Result<Option<VendorRequest>, sqlx::Error> {
        query_as::<Postgres, VendorRequest>(GET_VENDOR_REQUEST_FOR_UPDATE_SQL)
            .bind(request.into_uuid())
            .fetch_optional(&mut **tx)
            .await
    }

    /// Moves a request out of `pending`. The `WHERE status = 'pending'`
    /// guard means a concurrent decision that committed first leaves this
    /// update with zero affected rows.
    pub(crate) async fn mark_processed(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        request: VendorRequestUuid,
        decision: Decision,
        actor: UserUuid,
        processed_at: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(MARK_VENDOR_REQUEST_PROCESSED_SQL)
            .bind(request.into_uuid())
            .bind(decision.target_status().as_str())
            .bind(actor.into_uuid())
            .bind(SqlxTimestamp::from(processed_at))
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for VendorRequest {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let status = RequestStatus::from_str(row.try_get("status")?).map_err(|e| {
            sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(e),
            }
        })?;

        let documents = serde_json::from_value(row.try_get("documents")?).map_err(|e| {
            sqlx::Error::ColumnDecode {
                index: "documents".to_string(),
                source: Box::new(e),
            }
        })?;

        Ok(Self {
            uuid: VendorRequestUuid::from_uuid(row.try_get("uuid")?),
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            profile: VendorProfile {
                store_name: row.try_get("store_name")?,
                store_description: row.try_get("store_description")?,
                business_type: row.try_get("business_type")?,
                registration_number: row.try_get("registration_number")?,
                tax_id: row.try_get("tax_id")?,
            },
            documents,
            status,
            processed_by: row
                .try_get::<Option<Uuid>, _>("processed_by")?
                .map(UserUuid::from_uuid),
            processed_at: row
                .try_get::<Option<SqlxTimestamp>, _>("processed_at")?
                .map(SqlxTimestamp::to_jiff),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
