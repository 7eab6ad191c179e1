//! Notifications Repository

use sqlx::{Postgres, Transaction, query};

use crate::domain::notifications::models::NewNotification;

const CREATE_NOTIFICATION_SQL: &str = include_str!("sql/create_notification.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgNotificationsRepository;

impl PgNotificationsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_notification(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        notification: &NewNotification,
    ) -> Result<(), sqlx::Error> {
        query(CREATE_NOTIFICATION_SQL)
            .bind(notification.uuid.into_uuid())
            .bind(notification.user_uuid.into_uuid())
            .bind(notification.kind.as_str())
            .bind(&notification.title)
            .bind(&notification.message)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }
}
