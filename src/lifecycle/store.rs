// Collaborator contracts consumed by the cleanup core.
// Postgres implementations live in `crate::services`, in-memory ones in `crate::testing`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{BillingRecord, Member, Workspace};

/// Failures reported by any collaborator store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Database(DatabaseError::Sqlx(err))
    }
}

#[async_trait]
pub trait WorkspaceStore: Send + Sync {
    /// All workspaces whose activation status is SUSPENDED
    async fn find_suspended(&self) -> Result<Vec<Workspace>, StoreError>;

    async fn find(&self, workspace_id: Uuid) -> Result<Option<Workspace>, StoreError>;

    async fn delete(&self, workspace_id: Uuid) -> Result<(), StoreError>;
}

#[async_trait]
pub trait BillingStore: Send + Sync {
    /// Most recently updated billing record, `None` when the workspace has no billing history
    async fn most_recent_subscription(
        &self,
        workspace_id: Uuid,
    ) -> Result<Option<BillingRecord>, StoreError>;
}

#[async_trait]
pub trait MemberDirectory: Send + Sync {
    async fn members_of(&self, workspace: &Workspace) -> Result<Vec<Member>, StoreError>;
}

/// Per-(member, workspace, key) variable store
#[async_trait]
pub trait VariableStore: Send + Sync {
    async fn get(
        &self,
        member_id: Uuid,
        workspace_id: Uuid,
        key: &str,
    ) -> Result<Option<Value>, StoreError>;

    async fn set(
        &self,
        member_id: Uuid,
        workspace_id: Uuid,
        key: &str,
        value: Value,
    ) -> Result<(), StoreError>;

    async fn delete(&self, member_id: Uuid, workspace_id: Uuid, key: &str) -> Result<(), StoreError>;
}

/// Source of wall-clock time for inactivity calculations
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
