mod common;

use anyhow::Result;

use common::Fixture;
use workspace_lifecycle::testing::policy;

// Workspaces in the same chunk run concurrently. With store calls yielding,
// several deletes are in flight at once; the cap must still hold exactly.

#[tokio::test]
async fn concurrent_chunk_never_exceeds_cap() -> Result<()> {
    let fx = Fixture::interleaved();
    for i in 0..5 {
        fx.suspended(&format!("stale-{}", i), 60, 2);
    }

    let result = fx.orchestrator(policy(15, 30, 3)).run().await?;

    assert_eq!(result.deleted, 3);
    assert_eq!(result.deletion_capped, 2);
    assert_eq!(fx.store.deleted_ids().len(), 3);
    assert!(
        fx.store.peak_concurrent_deletes() > 1,
        "deletes did not overlap, so the cap was never contended"
    );
    Ok(())
}

#[tokio::test]
async fn cap_holds_across_chunk_sizes() -> Result<()> {
    for chunk_size in 1..=12 {
        let fx = Fixture::interleaved();
        for i in 0..12 {
            fx.suspended(&format!("stale-{}", i), 60, 1);
        }
        let mut p = policy(15, 30, 4);
        p.workspace_chunk_size = chunk_size;

        let result = fx.orchestrator(p).run().await?;

        assert_eq!(result.workspaces_scanned, 12, "chunk_size={}", chunk_size);
        assert_eq!(result.deleted, 4, "chunk_size={}", chunk_size);
        assert_eq!(result.deletion_capped, 8, "chunk_size={}", chunk_size);
    }
    Ok(())
}

#[tokio::test]
async fn zero_cap_deletes_nothing_but_still_warns() -> Result<()> {
    let fx = Fixture::new();
    let doomed = fx.suspended("doomed", 60, 1);
    fx.suspended("warned", 20, 1);

    let result = fx.orchestrator(policy(15, 30, 0)).run().await?;

    assert_eq!(result.deleted, 0);
    assert_eq!(result.deletion_capped, 1);
    assert_eq!(result.warned, 1);
    assert!(fx.store.workspace_exists(doomed.id));
    Ok(())
}

#[tokio::test]
async fn failed_deletes_do_not_consume_the_cap() -> Result<()> {
    let fx = Fixture::interleaved();
    let broken = fx.suspended("broken", 60, 1);
    fx.store.fail_delete_for(broken.id);
    for i in 0..4 {
        fx.suspended(&format!("stale-{}", i), 60, 1);
    }

    // All five share one chunk; the broken one reserves first
    let result = fx.orchestrator(policy(15, 30, 2)).run().await?;

    assert_eq!(result.failed, 1);
    assert_eq!(result.deleted, 2);
    assert_eq!(result.deletion_capped, 2);
    Ok(())
}

#[tokio::test]
async fn sibling_takes_the_slot_of_a_failed_delete_in_the_same_chunk() -> Result<()> {
    let fx = Fixture::interleaved();
    let broken = fx.suspended("broken", 60, 1);
    fx.store.fail_delete_for(broken.id);
    let healthy = fx.suspended("healthy", 60, 1);

    let result = fx.orchestrator(policy(15, 30, 1)).run().await?;

    assert_eq!(result.failed, 1);
    assert_eq!(result.deleted, 1);
    assert_eq!(result.deletion_capped, 0);
    assert_eq!(fx.store.deleted_ids(), vec![healthy.id]);
    Ok(())
}

#[tokio::test]
async fn sibling_is_capped_once_the_in_flight_delete_succeeds() -> Result<()> {
    let fx = Fixture::interleaved();
    let first = fx.suspended("first", 60, 1);
    fx.suspended("second", 60, 1);

    let result = fx.orchestrator(policy(15, 30, 1)).run().await?;

    assert_eq!(result.deleted, 1);
    assert_eq!(result.deletion_capped, 1);
    assert_eq!(fx.store.deleted_ids(), vec![first.id]);
    Ok(())
}
