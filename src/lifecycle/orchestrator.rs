//! Cleanup orchestration for suspended workspaces.
//!
//! A run is recomputed from scratch every time:
//! 1. Fetch every SUSPENDED workspace (failure aborts the run)
//! 2. Process them in chunks of `workspace_chunk_size`, concurrently within a chunk
//! 3. Per workspace: compute inactivity, classify, then warn or delete
//! 4. Tally a `CleanupRunResult`
//!
//! Per-workspace failures are recorded in the result and never abort the run.
//! Deletions are capped by a `DeletionBudget` shared by the whole run.

use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use uuid::Uuid;

use crate::config::CleanupPolicy;
use crate::database::models::Workspace;
use crate::error::LifecycleError;
use crate::lifecycle::budget::DeletionBudget;
use crate::lifecycle::classifier::{classify, LifecycleAction};
use crate::lifecycle::inactivity::{Inactivity, InactivityCalculator};
use crate::lifecycle::ledger::{LedgerReport, LifecycleState, WarningLedger};
use crate::lifecycle::notifier::Notifier;
use crate::lifecycle::runner::run_chunked;
use crate::lifecycle::store::{BillingStore, Clock, MemberDirectory, VariableStore, WorkspaceStore};

/// External capabilities the orchestrator drives
#[derive(Clone)]
pub struct Collaborators {
    pub workspaces: Arc<dyn WorkspaceStore>,
    pub billing: Arc<dyn BillingStore>,
    pub members: Arc<dyn MemberDirectory>,
    pub variables: Arc<dyn VariableStore>,
    pub notifier: Arc<dyn Notifier>,
    pub clock: Arc<dyn Clock>,
}

/// What happened to a single workspace during a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum WorkspaceOutcome {
    /// Status changed since the fetch; left alone
    NotSuspended,
    SkippedNoBilling,
    SkippedNoMembers { days: i64 },
    Ignored { days: i64 },
    Warned { days: i64, members_flagged: usize, members_failed: usize },
    AlreadyWarned { days: i64 },
    Deleted { days: i64, flags_cleared: usize },
    DeletionCapped { days: i64 },
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkspaceReport {
    pub workspace_id: Uuid,
    pub display_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<WorkspaceOutcome>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<&'static str>,
}

/// Results from a single cleanup run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleanupRunResult {
    pub workspaces_scanned: u64,
    pub ignored: u64,
    pub skipped_no_billing: u64,
    pub skipped_no_members: u64,
    pub warned: u64,
    pub already_warned: u64,
    /// In dry-run mode: workspaces that would have been deleted
    pub deleted: u64,
    pub deletion_capped: u64,
    pub failed: u64,
    pub duration_ms: u64,
    pub dry_run: bool,
    pub workspaces: Vec<WorkspaceReport>,
}

impl CleanupRunResult {
    pub fn has_changes(&self) -> bool {
        self.warned > 0 || self.deleted > 0
    }

    fn record(&mut self, workspace: Workspace, result: Result<WorkspaceOutcome, LifecycleError>) {
        self.workspaces_scanned += 1;

        let report = match result {
            Ok(outcome) => {
                match &outcome {
                    WorkspaceOutcome::NotSuspended | WorkspaceOutcome::Ignored { .. } => self.ignored += 1,
                    WorkspaceOutcome::SkippedNoBilling => self.skipped_no_billing += 1,
                    WorkspaceOutcome::SkippedNoMembers { .. } => self.skipped_no_members += 1,
                    WorkspaceOutcome::Warned { .. } => self.warned += 1,
                    WorkspaceOutcome::AlreadyWarned { .. } => self.already_warned += 1,
                    WorkspaceOutcome::Deleted { .. } => self.deleted += 1,
                    WorkspaceOutcome::DeletionCapped { .. } => self.deletion_capped += 1,
                }
                WorkspaceReport {
                    workspace_id: workspace.id,
                    display_name: workspace.display_name,
                    outcome: Some(outcome),
                    error: None,
                    error_code: None,
                }
            }
            Err(e) => {
                self.failed += 1;
                tracing::error!("Cleanup failed for workspace {}: {}", workspace.id, e);
                WorkspaceReport {
                    workspace_id: workspace.id,
                    display_name: workspace.display_name,
                    outcome: None,
                    error_code: Some(e.error_code()),
                    error: Some(e.to_string()),
                }
            }
        };

        self.workspaces.push(report);
    }
}

/// Read-only view of where one workspace stands
#[derive(Debug, Clone, Serialize)]
pub struct WorkspaceInspection {
    pub workspace: Workspace,
    pub inactivity: Inactivity,
    pub action: LifecycleAction,
    pub state: LifecycleState,
    pub member_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_until_deletion: Option<i64>,
}

pub struct CleanupOrchestrator {
    workspaces: Arc<dyn WorkspaceStore>,
    members: Arc<dyn MemberDirectory>,
    notifier: Arc<dyn Notifier>,
    calculator: InactivityCalculator,
    ledger: WarningLedger,
    policy: CleanupPolicy,
}

impl CleanupOrchestrator {
    pub fn new(collaborators: Collaborators, policy: CleanupPolicy) -> Self {
        Self {
            calculator: InactivityCalculator::new(collaborators.billing, collaborators.clock),
            ledger: WarningLedger::new(collaborators.variables, policy.member_chunk_size),
            workspaces: collaborators.workspaces,
            members: collaborators.members,
            notifier: collaborators.notifier,
            policy,
        }
    }

    pub fn policy(&self) -> &CleanupPolicy {
        &self.policy
    }

    /// Execute one full cleanup pass
    pub async fn run(&self) -> Result<CleanupRunResult, LifecycleError> {
        let start = Instant::now();
        let dry_run_msg = if self.policy.dry_run { " (DRY RUN)" } else { "" };

        tracing::info!(
            days_before_warning = self.policy.days_before_warning,
            days_before_deletion = self.policy.days_before_deletion,
            max_deletions_per_run = self.policy.max_deletions_per_run,
            chunk_size = self.policy.workspace_chunk_size,
            "Starting workspace cleanup run{}",
            dry_run_msg
        );

        let suspended = self
            .workspaces
            .find_suspended()
            .await
            .map_err(LifecycleError::FetchFailed)?;

        tracing::info!("Found {} suspended workspaces", suspended.len());

        let budget = &DeletionBudget::new(self.policy.max_deletions_per_run);
        let results = run_chunked(suspended, self.policy.workspace_chunk_size, |workspace| async move {
            let result = self.process_workspace(&workspace, budget).await;
            (workspace, result)
        })
        .await;

        let mut summary = CleanupRunResult {
            dry_run: self.policy.dry_run,
            ..Default::default()
        };
        for (workspace, result) in results {
            summary.record(workspace, result);
        }
        summary.duration_ms = start.elapsed().as_millis() as u64;

        tracing::info!(
            scanned = summary.workspaces_scanned,
            warned = summary.warned,
            already_warned = summary.already_warned,
            deleted = summary.deleted,
            deletion_capped = summary.deletion_capped,
            skipped_no_billing = summary.skipped_no_billing,
            failed = summary.failed,
            duration_ms = summary.duration_ms,
            "Workspace cleanup run complete{}",
            dry_run_msg
        );

        Ok(summary)
    }

    async fn process_workspace(
        &self,
        workspace: &Workspace,
        budget: &DeletionBudget,
    ) -> Result<WorkspaceOutcome, LifecycleError> {
        if !workspace.is_suspended() {
            tracing::debug!(
                "Workspace {} is {}, not a cleanup candidate",
                workspace.id, workspace.activation_status
            );
            return Ok(WorkspaceOutcome::NotSuspended);
        }

        let inactivity = self.calculator.inactivity(workspace.id).await?;
        let days = match inactivity {
            Inactivity::Unknown => {
                tracing::warn!("Skipping workspace {}: no billing history", workspace.id);
                return Ok(WorkspaceOutcome::SkippedNoBilling);
            }
            Inactivity::Days(days) => days,
        };

        let action = classify(
            inactivity,
            self.policy.days_before_warning,
            self.policy.days_before_deletion,
        );
        tracing::debug!("Workspace {} inactive for {} days: {}", workspace.id, days, action);

        match action {
            LifecycleAction::None => Ok(WorkspaceOutcome::Ignored { days }),
            LifecycleAction::Warn => self.warn_workspace(workspace, days).await,
            LifecycleAction::Delete => self.delete_workspace(workspace, days, budget).await,
        }
    }

    async fn warn_workspace(&self, workspace: &Workspace, days: i64) -> Result<WorkspaceOutcome, LifecycleError> {
        let members = self.members.members_of(workspace).await?;
        if members.is_empty() {
            tracing::warn!("Workspace {} has no members to warn", workspace.id);
            return Ok(WorkspaceOutcome::SkippedNoMembers { days });
        }

        if self.ledger.state(workspace.id, &members).await? == LifecycleState::Warned {
            tracing::debug!("Workspace {} already warned", workspace.id);
            return Ok(WorkspaceOutcome::AlreadyWarned { days });
        }

        let days_until_deletion = self.policy.days_until_deletion(days);

        if self.policy.dry_run {
            tracing::info!(
                "DRY RUN: Would warn {} members of workspace {} ({} days until deletion)",
                members.len(), workspace.id, days_until_deletion
            );
            return Ok(WorkspaceOutcome::Warned {
                days,
                members_flagged: members.len(),
                members_failed: 0,
            });
        }

        let report = self.ledger.mark_warned(workspace.id, &members).await;
        if report.is_total_failure() {
            return Err(LifecycleError::LedgerWriteFailed {
                workspace_id: workspace.id,
                members: members.len(),
            });
        }

        self.notifier
            .send_deletion_warning(workspace, days_until_deletion)
            .await?;

        tracing::info!(
            "Warned workspace {} ({} days inactive, {} days until deletion)",
            workspace.id, days, days_until_deletion
        );

        Ok(WorkspaceOutcome::Warned {
            days,
            members_flagged: report.succeeded.len(),
            members_failed: report.failed.len(),
        })
    }

    async fn delete_workspace(
        &self,
        workspace: &Workspace,
        days: i64,
        budget: &DeletionBudget,
    ) -> Result<WorkspaceOutcome, LifecycleError> {
        // Waits while another deletion is in flight; a failed one hands its slot on
        let Some(permit) = budget.reserve().await else {
            tracing::info!(
                "Deletion cap of {} reached ({} committed), deferring workspace {} to next run",
                budget.max(), budget.committed(), workspace.id
            );
            return Ok(WorkspaceOutcome::DeletionCapped { days });
        };

        if self.policy.dry_run {
            tracing::info!("DRY RUN: Would delete workspace {} ({} days inactive)", workspace.id, days);
            permit.commit();
            return Ok(WorkspaceOutcome::Deleted { days, flags_cleared: 0 });
        }

        // An early return drops the permit and hands the slot back
        let members = self.members.members_of(workspace).await?;
        let report = self.ledger.clear_warned(workspace.id, &members).await;
        self.workspaces.delete(workspace.id).await?;
        permit.commit();

        tracing::info!(
            "Deleted workspace {} ({} days inactive, {} warning flags cleared)",
            workspace.id, days, report.succeeded.len()
        );

        Ok(WorkspaceOutcome::Deleted {
            days,
            flags_cleared: report.succeeded.len(),
        })
    }

    /// Compute where a workspace stands without changing anything
    pub async fn inspect(&self, workspace_id: Uuid) -> Result<WorkspaceInspection, LifecycleError> {
        let workspace = self
            .workspaces
            .find(workspace_id)
            .await?
            .ok_or(LifecycleError::WorkspaceNotFound(workspace_id))?;

        let inactivity = self.calculator.inactivity(workspace_id).await?;
        let action = if workspace.is_suspended() {
            classify(
                inactivity,
                self.policy.days_before_warning,
                self.policy.days_before_deletion,
            )
        } else {
            LifecycleAction::None
        };

        let members = self.members.members_of(&workspace).await?;
        let state = self.ledger.state(workspace_id, &members).await?;
        let days_until_deletion = inactivity
            .days()
            .filter(|_| workspace.is_suspended())
            .map(|days| self.policy.days_until_deletion(days));

        Ok(WorkspaceInspection {
            workspace,
            inactivity,
            action,
            state,
            member_count: members.len(),
            days_until_deletion,
        })
    }

    /// Clear warning flags, e.g. after the workspace is reactivated
    pub async fn reset_warning(&self, workspace_id: Uuid) -> Result<LedgerReport, LifecycleError> {
        let workspace = self
            .workspaces
            .find(workspace_id)
            .await?
            .ok_or(LifecycleError::WorkspaceNotFound(workspace_id))?;

        let members = self.members.members_of(&workspace).await?;
        let report = self.ledger.clear_warned(workspace_id, &members).await;

        tracing::info!(
            "Cleared deletion warning for {} of {} members of workspace {}",
            report.succeeded.len(), members.len(), workspace_id
        );

        Ok(report)
    }
}
