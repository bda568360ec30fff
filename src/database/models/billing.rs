use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Most recent billing subscription for a workspace.
/// `updated_at` is the last billing activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct BillingRecord {
    pub workspace_id: Uuid,
    pub updated_at: DateTime<Utc>,
}
