mod common;

use anyhow::Result;
use serde_json::Value;

use common::Fixture;
use workspace_lifecycle::database::models::ActivationStatus;
use workspace_lifecycle::lifecycle::{
    Inactivity, LifecycleAction, LifecycleState, WorkspaceOutcome, WARNING_FLAG_KEY,
};
use workspace_lifecycle::testing::policy;

#[tokio::test]
async fn billed_forty_days_ago_is_deleted() -> Result<()> {
    let fx = Fixture::new();
    let workspace = fx.suspended("forty", 40, 2);
    let orchestrator = fx.orchestrator(policy(15, 30, 5));

    let inspection = orchestrator.inspect(workspace.id).await?;
    assert_eq!(inspection.inactivity, Inactivity::Days(40));
    assert_eq!(inspection.action, LifecycleAction::Delete);

    let result = orchestrator.run().await?;
    assert_eq!(result.deleted, 1);
    assert_eq!(fx.store.deleted_ids(), vec![workspace.id]);
    assert_eq!(fx.notifier.count(), 0);
    Ok(())
}

#[tokio::test]
async fn billed_twenty_days_ago_is_warned_exactly_once() -> Result<()> {
    let fx = Fixture::new();
    let workspace = fx.suspended("twenty", 20, 3);
    let orchestrator = fx.orchestrator(policy(15, 30, 5));

    assert_eq!(orchestrator.inspect(workspace.id).await?.action, LifecycleAction::Warn);

    let first = orchestrator.run().await?;
    assert_eq!(first.warned, 1);
    for member in fx.store.members(workspace.id) {
        assert_eq!(
            fx.store.variable(member.id, workspace.id, WARNING_FLAG_KEY),
            Some(Value::Bool(true))
        );
    }
    assert_eq!(fx.notifier.calls(), vec![(workspace.id, 11)]);

    let second = orchestrator.run().await?;
    assert_eq!(second.warned, 0);
    assert_eq!(second.already_warned, 1);
    assert_eq!(fx.notifier.calls_for(workspace.id), 1);
    Ok(())
}

#[tokio::test]
async fn no_billing_history_is_never_acted_on() -> Result<()> {
    let fx = Fixture::new();
    let workspace = fx.unbilled("unbilled", 2);
    let orchestrator = fx.orchestrator(policy(15, 30, 5));

    let inspection = orchestrator.inspect(workspace.id).await?;
    assert_eq!(inspection.inactivity, Inactivity::Unknown);
    assert_eq!(inspection.action, LifecycleAction::None);
    assert_eq!(inspection.days_until_deletion, None);

    let result = orchestrator.run().await?;
    assert_eq!(result.skipped_no_billing, 1);
    assert_eq!(
        result.workspaces[0].outcome,
        Some(WorkspaceOutcome::SkippedNoBilling)
    );
    assert!(fx.store.workspace_exists(workspace.id));
    assert_eq!(fx.store.variable_count(), 0);
    assert_eq!(fx.notifier.count(), 0);
    Ok(())
}

#[tokio::test]
async fn cap_defers_the_rest_to_the_next_run() -> Result<()> {
    let fx = Fixture::new();
    for i in 0..5 {
        fx.suspended(&format!("stale-{}", i), 45, 1);
    }
    let orchestrator = fx.orchestrator(policy(15, 30, 3));

    let first = orchestrator.run().await?;
    assert_eq!(first.deleted, 3);
    assert_eq!(first.deletion_capped, 2);
    assert_eq!(fx.store.deleted_ids().len(), 3);

    let second = orchestrator.run().await?;
    assert_eq!(second.workspaces_scanned, 2);
    assert_eq!(second.deleted, 2);
    assert_eq!(fx.store.deleted_ids().len(), 5);
    Ok(())
}

#[tokio::test]
async fn exact_delete_threshold_stays_in_warning_for_one_more_day() -> Result<()> {
    let fx = Fixture::new();
    let workspace = fx.suspended("edge", 30, 1);
    let orchestrator = fx.orchestrator(policy(15, 30, 5));

    let result = orchestrator.run().await?;
    assert_eq!(result.warned, 1);
    assert_eq!(fx.notifier.calls(), vec![(workspace.id, 1)]);

    fx.clock.advance_days(1);
    let result = orchestrator.run().await?;
    assert_eq!(result.deleted, 1);
    Ok(())
}

#[tokio::test]
async fn warning_then_deletion_as_inactivity_grows() -> Result<()> {
    let fx = Fixture::new();
    let workspace = fx.suspended("ageing", 10, 4);
    let orchestrator = fx.orchestrator(policy(15, 30, 5));

    let mut seen = Vec::new();
    for _ in 0..5 {
        let result = orchestrator.run().await?;
        seen.push(result.workspaces.first().and_then(|w| w.outcome.clone()));
        fx.clock.advance_days(7);
    }

    assert_eq!(
        seen,
        vec![
            Some(WorkspaceOutcome::Ignored { days: 10 }),
            Some(WorkspaceOutcome::Warned { days: 17, members_flagged: 4, members_failed: 0 }),
            Some(WorkspaceOutcome::AlreadyWarned { days: 24 }),
            Some(WorkspaceOutcome::Deleted { days: 31, flags_cleared: 4 }),
            None,
        ]
    );
    assert_eq!(fx.notifier.calls_for(workspace.id), 1);
    assert_eq!(fx.store.variable_count(), 0);
    Ok(())
}

#[tokio::test]
async fn one_flagged_member_suppresses_the_whole_warning() -> Result<()> {
    let fx = Fixture::new();
    let workspace = fx.suspended("partial", 20, 3);
    let first_member = fx.store.members(workspace.id)[0].clone();
    fx.store
        .set_variable(first_member.id, workspace.id, WARNING_FLAG_KEY, Value::Bool(true));

    let orchestrator = fx.orchestrator(policy(15, 30, 5));
    let result = orchestrator.run().await?;

    assert_eq!(result.already_warned, 1);
    assert_eq!(fx.notifier.count(), 0);
    assert_eq!(fx.store.variable_count(), 1);
    assert_eq!(
        orchestrator.inspect(workspace.id).await?.state,
        LifecycleState::Warned
    );
    Ok(())
}

#[tokio::test]
async fn only_suspended_workspaces_are_candidates() -> Result<()> {
    let fx = Fixture::new();
    let active = fx.store.add_workspace("active", ActivationStatus::Active);
    fx.store.add_billing_record(active.id, fx.clock.days_ago(365));
    fx.store.add_members(active.id, 2);

    let orchestrator = fx.orchestrator(policy(15, 30, 5));
    let result = orchestrator.run().await?;

    assert_eq!(result.workspaces_scanned, 0);
    assert!(fx.store.workspace_exists(active.id));
    assert_eq!(
        orchestrator.inspect(active.id).await?.action,
        LifecycleAction::None
    );
    Ok(())
}

#[tokio::test]
async fn mixed_population_is_tallied() -> Result<()> {
    let fx = Fixture::new();
    fx.suspended("fresh", 2, 1);
    fx.suspended("warn-a", 16, 2);
    fx.suspended("warn-b", 29, 6);
    fx.suspended("delete", 90, 1);
    fx.unbilled("unbilled", 1);
    fx.suspended("lonely", 20, 0);

    let result = fx.orchestrator(policy(15, 30, 5)).run().await?;

    assert_eq!(result.workspaces_scanned, 6);
    assert_eq!(result.ignored, 1);
    assert_eq!(result.warned, 2);
    assert_eq!(result.deleted, 1);
    assert_eq!(result.skipped_no_billing, 1);
    assert_eq!(result.skipped_no_members, 1);
    assert_eq!(result.failed, 0);
    assert_eq!(fx.notifier.count(), 2);
    assert_eq!(fx.store.variable_count(), 8);
    Ok(())
}
