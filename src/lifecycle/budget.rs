use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Notify;

/// Run-scoped deletion cap shared by concurrently processed workspaces.
///
/// A slot is reserved with a compare-and-increment before the delete is
/// attempted, so at most `max` deletions are ever in flight or committed in
/// one run. A reserved slot that is not committed is handed back on drop, and
/// callers waiting in [`DeletionBudget::reserve`] get another chance at it.
#[derive(Debug)]
pub struct DeletionBudget {
    max: usize,
    reserved: AtomicUsize,
    committed: AtomicUsize,
    settled: Notify,
}

impl DeletionBudget {
    pub fn new(max: usize) -> Self {
        Self {
            max,
            reserved: AtomicUsize::new(0),
            committed: AtomicUsize::new(0),
            settled: Notify::new(),
        }
    }

    pub fn max(&self) -> usize {
        self.max
    }

    /// Slots currently reserved or committed
    pub fn used(&self) -> usize {
        self.reserved.load(Ordering::Acquire)
    }

    /// Deletions that went through
    pub fn committed(&self) -> usize {
        self.committed.load(Ordering::Acquire)
    }

    /// Reserve a slot without waiting. `None` if every slot is taken,
    /// including slots whose deletion is still in flight.
    pub fn try_reserve(&self) -> Option<DeletionPermit<'_>> {
        self.reserved
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |used| {
                (used < self.max).then_some(used + 1)
            })
            .ok()
            .map(|_| DeletionPermit {
                budget: self,
                committed: false,
            })
    }

    /// Reserve a slot, waiting on in-flight permits when the budget is full.
    ///
    /// Returns `None` only once `max` deletions have actually been committed.
    pub async fn reserve(&self) -> Option<DeletionPermit<'_>> {
        loop {
            let settled = self.settled.notified();
            tokio::pin!(settled);
            // Register before checking so a release in between is not missed
            settled.as_mut().enable();

            if let Some(permit) = self.try_reserve() {
                return Some(permit);
            }
            if self.committed() >= self.max {
                return None;
            }
            settled.await;
        }
    }
}

/// A reserved deletion slot.
#[derive(Debug)]
#[must_use = "an uncommitted permit releases its slot when dropped"]
pub struct DeletionPermit<'a> {
    budget: &'a DeletionBudget,
    committed: bool,
}

impl DeletionPermit<'_> {
    /// Keep the slot: the deletion went through
    pub fn commit(mut self) {
        self.committed = true;
        self.budget.committed.fetch_add(1, Ordering::AcqRel);
        self.budget.settled.notify_waiters();
    }
}

impl Drop for DeletionPermit<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.budget.reserved.fetch_sub(1, Ordering::AcqRel);
            self.budget.settled.notify_waiters();
        }
    }
}
