use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::{ActivationStatus, Member, Workspace, WorkspaceRow};
use crate::lifecycle::store::{MemberDirectory, StoreError, WorkspaceStore};

pub struct WorkspaceService {
    pool: PgPool,
}

impl WorkspaceService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn into_workspaces(rows: Vec<WorkspaceRow>) -> Result<Vec<Workspace>, StoreError> {
        rows.into_iter()
            .map(|row| Workspace::try_from(row).map_err(|e| StoreError::InvalidData(e.to_string())))
            .collect()
    }
}

#[async_trait]
impl WorkspaceStore for WorkspaceService {
    /// Suspended workspaces that are not soft deleted, oldest first
    async fn find_suspended(&self) -> Result<Vec<Workspace>, StoreError> {
        let rows: Vec<WorkspaceRow> = sqlx::query_as(
            r#"
            SELECT id, display_name, activation_status, created_at, deleted_at
            FROM workspaces
            WHERE activation_status = $1 AND deleted_at IS NULL
            ORDER BY created_at ASC
            "#,
        )
        .bind(ActivationStatus::Suspended.as_str())
        .fetch_all(&self.pool)
        .await?;

        Self::into_workspaces(rows)
    }

    async fn find(&self, workspace_id: Uuid) -> Result<Option<Workspace>, StoreError> {
        let row: Option<WorkspaceRow> = sqlx::query_as(
            r#"
            SELECT id, display_name, activation_status, created_at, deleted_at
            FROM workspaces
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(workspace_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| Workspace::try_from(r).map_err(|e| StoreError::InvalidData(e.to_string())))
            .transpose()
    }

    /// Soft delete: the row is kept with `deleted_at` set
    async fn delete(&self, workspace_id: Uuid) -> Result<(), StoreError> {
        let result = sqlx::query(
            "UPDATE workspaces SET deleted_at = now(), updated_at = now() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(workspace_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(format!("workspace {}", workspace_id)));
        }

        tracing::debug!("Soft deleted workspace {}", workspace_id);
        Ok(())
    }
}

#[async_trait]
impl MemberDirectory for WorkspaceService {
    async fn members_of(&self, workspace: &Workspace) -> Result<Vec<Member>, StoreError> {
        let members = sqlx::query_as::<_, Member>(
            r#"
            SELECT id, workspace_id
            FROM workspace_members
            WHERE workspace_id = $1 AND deleted_at IS NULL
            ORDER BY created_at ASC
            "#,
        )
        .bind(workspace.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(members)
    }
}
