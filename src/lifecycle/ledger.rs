//! Idempotency record for deletion warnings.
//!
//! Flags are stored per (member, workspace) under a fixed key. The workspace
//! counts as warned as soon as any one member carries the flag.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::database::models::Member;
use crate::lifecycle::runner::run_chunked;
use crate::lifecycle::store::{StoreError, VariableStore};

pub const WARNING_FLAG_KEY: &str = "deletion-warning-sent";

/// Workspace-level lifecycle state derived from the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleState {
    Active,
    Warned,
}

/// Per-member outcome of a chunked ledger write
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LedgerReport {
    pub succeeded: Vec<Uuid>,
    pub failed: Vec<(Uuid, String)>,
}

impl LedgerReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// Every attempted write failed
    pub fn is_total_failure(&self) -> bool {
        self.succeeded.is_empty() && !self.failed.is_empty()
    }

    fn from_results(results: Vec<(Uuid, Result<(), StoreError>)>) -> Self {
        let mut report = LedgerReport::default();
        for (member_id, result) in results {
            match result {
                Ok(()) => report.succeeded.push(member_id),
                Err(e) => report.failed.push((member_id, e.to_string())),
            }
        }
        report
    }
}

pub struct WarningLedger {
    variables: Arc<dyn VariableStore>,
    chunk_size: usize,
}

impl WarningLedger {
    pub fn new(variables: Arc<dyn VariableStore>, chunk_size: usize) -> Self {
        Self { variables, chunk_size }
    }

    /// True if any member holds the flag. Stops at the first one found.
    pub async fn is_warned(&self, workspace_id: Uuid, members: &[Member]) -> Result<bool, StoreError> {
        for member in members {
            let value = self.variables.get(member.id, workspace_id, WARNING_FLAG_KEY).await?;
            if is_set(value.as_ref()) {
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub async fn state(&self, workspace_id: Uuid, members: &[Member]) -> Result<LifecycleState, StoreError> {
        Ok(if self.is_warned(workspace_id, members).await? {
            LifecycleState::Warned
        } else {
            LifecycleState::Active
        })
    }

    /// Set the flag for every member; failures are reported, not raised
    pub async fn mark_warned(&self, workspace_id: Uuid, members: &[Member]) -> LedgerReport {
        let ids: Vec<Uuid> = members.iter().map(|m| m.id).collect();
        let results = run_chunked(ids, self.chunk_size, |member_id| async move {
            let result = self
                .variables
                .set(member_id, workspace_id, WARNING_FLAG_KEY, Value::Bool(true))
                .await;
            (member_id, result)
        })
        .await;

        let report = LedgerReport::from_results(results);
        log_partial("mark", workspace_id, &report);
        report
    }

    /// Remove the flag for every member; failures are reported, not raised
    pub async fn clear_warned(&self, workspace_id: Uuid, members: &[Member]) -> LedgerReport {
        let ids: Vec<Uuid> = members.iter().map(|m| m.id).collect();
        let results = run_chunked(ids, self.chunk_size, |member_id| async move {
            let result = self
                .variables
                .delete(member_id, workspace_id, WARNING_FLAG_KEY)
                .await;
            (member_id, result)
        })
        .await;

        let report = LedgerReport::from_results(results);
        log_partial("clear", workspace_id, &report);
        report
    }
}

fn is_set(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Null) | None => false,
        Some(_) => true,
    }
}

fn log_partial(op: &str, workspace_id: Uuid, report: &LedgerReport) {
    for (member_id, error) in &report.failed {
        tracing::warn!(
            "Failed to {} deletion warning for member {} in workspace {}: {}",
            op, member_id, workspace_id, error
        );
    }
}
