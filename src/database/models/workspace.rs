use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Activation status of a tenant workspace.
/// Only `Suspended` workspaces enter the cleanup pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivationStatus {
    OngoingCreation,
    PendingCreation,
    Active,
    Inactive,
    Suspended,
}

impl ActivationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivationStatus::OngoingCreation => "ONGOING_CREATION",
            ActivationStatus::PendingCreation => "PENDING_CREATION",
            ActivationStatus::Active => "ACTIVE",
            ActivationStatus::Inactive => "INACTIVE",
            ActivationStatus::Suspended => "SUSPENDED",
        }
    }
}

impl fmt::Display for ActivationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown activation status: {0}")]
pub struct UnknownActivationStatus(pub String);

impl FromStr for ActivationStatus {
    type Err = UnknownActivationStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ONGOING_CREATION" => Ok(ActivationStatus::OngoingCreation),
            "PENDING_CREATION" => Ok(ActivationStatus::PendingCreation),
            "ACTIVE" => Ok(ActivationStatus::Active),
            "INACTIVE" => Ok(ActivationStatus::Inactive),
            "SUSPENDED" => Ok(ActivationStatus::Suspended),
            other => Err(UnknownActivationStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workspace {
    pub id: Uuid,
    pub display_name: String,
    pub activation_status: ActivationStatus,
}

impl Workspace {
    pub fn is_suspended(&self) -> bool {
        self.activation_status == ActivationStatus::Suspended
    }
}

/// Raw `workspaces` row; status is stored as text.
#[derive(Debug, Clone, FromRow)]
pub struct WorkspaceRow {
    pub id: Uuid,
    pub display_name: Option<String>,
    pub activation_status: String,
    pub created_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl TryFrom<WorkspaceRow> for Workspace {
    type Error = UnknownActivationStatus;

    fn try_from(row: WorkspaceRow) -> Result<Self, Self::Error> {
        Ok(Workspace {
            id: row.id,
            display_name: row.display_name.unwrap_or_default(),
            activation_status: row.activation_status.parse()?,
        })
    }
}
