//! Remote cart store.

use async_trait::async_trait;
use bazaar::items::LineItem;
use mockall::automock;
use rust_decimal::Decimal;
use sqlx::{Row, postgres::PgRow, query};
use thiserror::Error;
use uuid::Uuid;

use crate::{database::Db, domain::users::models::UserUuid};

const GET_CART_ITEMS_SQL: &str = include_str!("../sql/get_cart_items.sql");
const DELETE_CART_ITEMS_SQL: &str = include_str!("../sql/delete_cart_items.sql");
const CREATE_CART_ITEM_SQL: &str = include_str!("../sql/create_cart_item.sql");

/// Failures from the remote tier.
#[derive(Debug, Error)]
pub enum CartStoreError {
    /// The store did not recognise the caller's identity. Expected for
    /// expired or anonymous sessions; callers fall back rather than fail.
    #[error("not authenticated")]
    Unauthenticated,

    #[error("cart storage unavailable")]
    Unavailable(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<sqlx::Error> for CartStoreError {
    fn from(error: sqlx::Error) -> Self {
        Self::Unavailable(Box::new(error))
    }
}

/// The identity-scoped storage tier, authoritative when reachable.
#[automock]
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Fetches the user's persisted lines; `None` when no cart exists yet.
    async fn fetch(&self, user: UserUuid) -> Result<Option<Vec<LineItem>>, CartStoreError>;

    /// Replaces the user's persisted lines with `items`.
    async fn store(&self, user: UserUuid, items: &[LineItem]) -> Result<(), CartStoreError>;
}

/// `PostgreSQL`-backed remote tier. Lines are stored as catalog snapshots,
/// so a cart stays renderable even when a product changes after the add.
#[derive(Debug, Clone)]
pub struct PgCartStore {
    db: Db,
}

impl PgCartStore {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CartStore for PgCartStore {
    async fn fetch(&self, user: UserUuid) -> Result<Option<Vec<LineItem>>, CartStoreError> {
        let mut tx = self.db.begin().await?;

        let rows = query(GET_CART_ITEMS_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;

        if rows.is_empty() {
            return Ok(None);
        }

        let items = rows
            .iter()
            .map(line_item_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(items))
    }

    async fn store(&self, user: UserUuid, items: &[LineItem]) -> Result<(), CartStoreError> {
        let mut tx = self.db.begin().await?;

        query(DELETE_CART_ITEMS_SQL)
            .bind(user.into_uuid())
            .execute(&mut *tx)
            .await?;

        for item in items {
            query(CREATE_CART_ITEM_SQL)
                .bind(user.into_uuid())
                .bind(item.product_id)
                .bind(&item.name)
                .bind(item.unit_price)
                .bind(i64::from(item.quantity))
                .bind(item.available_stock.map(i64::from))
                .bind(item.compare_price)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;

        Ok(())
    }
}

fn line_item_from_row(row: &PgRow) -> Result<LineItem, sqlx::Error> {
    Ok(LineItem {
        product_id: row.try_get::<Uuid, _>("product_uuid")?,
        name: row.try_get("name")?,
        unit_price: row.try_get::<Decimal, _>("unit_price")?,
        quantity: try_get_count(row, "quantity")?,
        available_stock: row
            .try_get::<Option<i64>, _>("available_stock")?
            .map(|stock| try_from_count(stock, "available_stock"))
            .transpose()?,
        compare_price: row.try_get::<Option<Decimal>, _>("compare_price")?,
    })
}

fn try_get_count(row: &PgRow, col: &str) -> Result<u32, sqlx::Error> {
    try_from_count(row.try_get::<i64, _>(col)?, col)
}

fn try_from_count(value: i64, col: &str) -> Result<u32, sqlx::Error> {
    u32::try_from(value).map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}
