use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::BillingRecord;
use crate::lifecycle::store::{BillingStore, StoreError};

pub struct BillingService {
    pool: PgPool,
}

impl BillingService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BillingStore for BillingService {
    async fn most_recent_subscription(
        &self,
        workspace_id: Uuid,
    ) -> Result<Option<BillingRecord>, StoreError> {
        let record = sqlx::query_as::<_, BillingRecord>(
            r#"
            SELECT workspace_id, updated_at
            FROM billing_subscriptions
            WHERE workspace_id = $1
            ORDER BY updated_at DESC
            LIMIT 1
            "#,
        )
        .bind(workspace_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }
}
