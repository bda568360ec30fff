use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::lifecycle::store::{StoreError, VariableStore};

/// Key/value store in `user_workspace_variables`, one row per (member, workspace, key)
pub struct VariableService {
    pool: PgPool,
}

impl VariableService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VariableStore for VariableService {
    async fn get(
        &self,
        member_id: Uuid,
        workspace_id: Uuid,
        key: &str,
    ) -> Result<Option<Value>, StoreError> {
        let row: Option<(Value,)> = sqlx::query_as(
            "SELECT value FROM user_workspace_variables WHERE member_id = $1 AND workspace_id = $2 AND key = $3",
        )
        .bind(member_id)
        .bind(workspace_id)
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(value,)| value))
    }

    async fn set(
        &self,
        member_id: Uuid,
        workspace_id: Uuid,
        key: &str,
        value: Value,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO user_workspace_variables (member_id, workspace_id, key, value)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (member_id, workspace_id, key)
            DO UPDATE SET value = EXCLUDED.value, updated_at = now()
            "#,
        )
        .bind(member_id)
        .bind(workspace_id)
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, member_id: Uuid, workspace_id: Uuid, key: &str) -> Result<(), StoreError> {
        sqlx::query(
            "DELETE FROM user_workspace_variables WHERE member_id = $1 AND workspace_id = $2 AND key = $3",
        )
        .bind(member_id)
        .bind(workspace_id)
        .bind(key)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
