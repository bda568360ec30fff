// Lifecycle error types
use thiserror::Error;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::lifecycle::notifier::NotifyError;
use crate::lifecycle::store::StoreError;

/// Errors surfaced by a cleanup run or by a single workspace within it
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// The suspended workspace list could not be loaded; the run is aborted
    #[error("Failed to fetch suspended workspaces: {0}")]
    FetchFailed(#[source] StoreError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Notify(#[from] NotifyError),

    #[error("Could not record deletion warning for any of the {members} members of workspace {workspace_id}")]
    LedgerWriteFailed { workspace_id: Uuid, members: usize },

    #[error("Workspace not found: {0}")]
    WorkspaceNotFound(Uuid),
}

impl LifecycleError {
    /// Short machine-readable code for summaries and JSON output
    pub fn error_code(&self) -> &'static str {
        match self {
            LifecycleError::FetchFailed(_) => "FETCH_FAILED",
            LifecycleError::Store(StoreError::NotFound(_)) => "NOT_FOUND",
            LifecycleError::Store(_) => "STORE_ERROR",
            LifecycleError::Notify(_) => "NOTIFY_FAILED",
            LifecycleError::LedgerWriteFailed { .. } => "LEDGER_WRITE_FAILED",
            LifecycleError::WorkspaceNotFound(_) => "WORKSPACE_NOT_FOUND",
        }
    }
}

impl From<DatabaseError> for LifecycleError {
    fn from(err: DatabaseError) -> Self {
        LifecycleError::Store(StoreError::Database(err))
    }
}
