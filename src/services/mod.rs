pub mod billing_service;
pub mod variable_service;
pub mod workspace_service;

pub use billing_service::BillingService;
pub use variable_service::VariableService;
pub use workspace_service::WorkspaceService;

use std::sync::Arc;

use sqlx::PgPool;

use crate::lifecycle::notifier::Notifier;
use crate::lifecycle::orchestrator::Collaborators;
use crate::lifecycle::store::SystemClock;

/// Wire the Postgres-backed services into orchestrator collaborators
pub fn postgres_collaborators(pool: PgPool, notifier: Arc<dyn Notifier>) -> Collaborators {
    let workspaces = Arc::new(WorkspaceService::new(pool.clone()));
    Collaborators {
        workspaces: workspaces.clone(),
        members: workspaces,
        billing: Arc::new(BillingService::new(pool.clone())),
        variables: Arc::new(VariableService::new(pool)),
        notifier,
        clock: Arc::new(SystemClock),
    }
}
