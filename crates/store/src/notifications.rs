//! Persisted email notifications.
//!
//! Product and location enrichment joins are LEFT joins: both columns are
//! nullable on the row (a completed-order notification carries no product,
//! a test notification may carry neither).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use aquaflow_core::{DomainError, DomainResult, LocationId, NotificationId, OrgId};
use aquaflow_notify::{NewNotification, NotificationLog};

use crate::store_err;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NotificationRow {
    pub notification_id: i64,
    pub org_id: i64,
    pub location_id: Option<i64>,
    pub product_id: Option<i64>,
    pub subject: String,
    pub message: String,
    pub sent_to: String,
    pub sent_date: DateTime<Utc>,
    pub read_flag: bool,
    pub container_type: Option<String>,
    pub location_name: Option<String>,
}

const NOTIFICATION_COLUMNS: &str = r#"
    en.notification_id, en.org_id, en.location_id, en.product_id,
    en.subject, en.message, en.sent_to, en.sent_date, en.read_flag,
    p.container_type, ol.location_name
"#;

#[derive(Clone)]
pub struct NotificationStore {
    pool: PgPool,
}

impl NotificationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn for_org(&self, org_id: OrgId) -> DomainResult<Vec<NotificationRow>> {
        sqlx::query_as::<_, NotificationRow>(&format!(
            r#"
            SELECT {NOTIFICATION_COLUMNS}
            FROM email_notifications en
            LEFT JOIN products p ON en.product_id = p.product_id
            LEFT JOIN org_locations ol ON en.location_id = ol.location_id
            WHERE en.org_id = $1
            ORDER BY en.sent_date DESC
            "#
        ))
        .bind(org_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(store_err("failed to get organization notifications"))
    }

    pub async fn for_location(&self, location_id: LocationId) -> DomainResult<Vec<NotificationRow>> {
        sqlx::query_as::<_, NotificationRow>(&format!(
            r#"
            SELECT {NOTIFICATION_COLUMNS}
            FROM email_notifications en
            LEFT JOIN products p ON en.product_id = p.product_id
            LEFT JOIN org_locations ol ON en.location_id = ol.location_id
            WHERE en.location_id = $1
            ORDER BY en.sent_date DESC
            "#
        ))
        .bind(location_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(store_err("failed to get location notifications"))
    }

    pub async fn get(&self, notification_id: NotificationId) -> DomainResult<Option<NotificationRow>> {
        sqlx::query_as::<_, NotificationRow>(&format!(
            r#"
            SELECT {NOTIFICATION_COLUMNS}
            FROM email_notifications en
            LEFT JOIN products p ON en.product_id = p.product_id
            LEFT JOIN org_locations ol ON en.location_id = ol.location_id
            WHERE en.notification_id = $1
            "#
        ))
        .bind(notification_id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(store_err("failed to get notification"))
    }

    pub async fn mark_read(&self, notification_id: NotificationId) -> DomainResult<()> {
        let result = sqlx::query(
            "UPDATE email_notifications SET read_flag = TRUE WHERE notification_id = $1",
        )
        .bind(notification_id.as_i64())
        .execute(&self.pool)
        .await
        .map_err(store_err("failed to mark notification as read"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound);
        }
        Ok(())
    }

    /// Mark everything addressed to this email as read; returns the number
    /// of rows flipped.
    pub async fn mark_all_read(&self, sent_to: &str) -> DomainResult<u64> {
        let result = sqlx::query(
            "UPDATE email_notifications SET read_flag = TRUE WHERE sent_to = $1 AND read_flag = FALSE",
        )
        .bind(sent_to)
        .execute(&self.pool)
        .await
        .map_err(store_err("failed to mark notifications as read"))?;

        Ok(result.rows_affected())
    }

    pub async fn unread_count(&self, sent_to: &str) -> DomainResult<i64> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM email_notifications WHERE sent_to = $1 AND read_flag = FALSE",
        )
        .bind(sent_to)
        .fetch_one(&self.pool)
        .await
        .map_err(store_err("failed to get unread count"))?;

        Ok(count)
    }

    pub async fn delete(&self, notification_id: NotificationId) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM email_notifications WHERE notification_id = $1")
            .bind(notification_id.as_i64())
            .execute(&self.pool)
            .await
            .map_err(store_err("failed to delete notification"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl NotificationLog for NotificationStore {
    async fn record(&self, notification: &NewNotification) -> DomainResult<NotificationId> {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO email_notifications
                (org_id, location_id, product_id, subject, message, sent_to)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING notification_id
            "#,
        )
        .bind(notification.org_id.as_i64())
        .bind(notification.location_id.map(|l| l.as_i64()))
        .bind(notification.product_id.map(|p| p.as_i64()))
        .bind(&notification.subject)
        .bind(&notification.message)
        .bind(&notification.sent_to)
        .fetch_one(&self.pool)
        .await
        .map_err(store_err("failed to create email notification"))?;

        Ok(NotificationId::new(id))
    }
}
