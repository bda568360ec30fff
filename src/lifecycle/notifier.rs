use async_trait::async_trait;
use thiserror::Error;

use crate::database::models::Workspace;

#[derive(Debug, Error)]
#[error("Notification failed: {0}")]
pub struct NotifyError(pub String);

/// Delivers the pending-deletion warning to a workspace's members.
/// Called at most once per workspace per first-warn transition.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_deletion_warning(
        &self,
        workspace: &Workspace,
        days_until_deletion: i64,
    ) -> Result<(), NotifyError>;
}

/// Default notifier: records the warning in the log only
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingNotifier;

#[async_trait]
impl Notifier for LoggingNotifier {
    async fn send_deletion_warning(
        &self,
        workspace: &Workspace,
        days_until_deletion: i64,
    ) -> Result<(), NotifyError> {
        tracing::info!(
            workspace_id = %workspace.id,
            display_name = %workspace.display_name,
            days_until_deletion,
            "Deletion warning issued"
        );
        Ok(())
    }
}
