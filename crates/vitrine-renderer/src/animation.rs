//! Swap animation bookkeeping and deferred pool returns.
//!
//! When a tombstone slot receives data, the swap is not an instant replace:
//! the incoming content node settles into place while the outgoing
//! tombstone shrinks and fades over the animation duration. The outgoing
//! node must stay visually present for its own fade-out, so its return to
//! the tombstone pool is a delayed task keyed by slot index. Keying by slot
//! lets a full reset cancel every pending return atomically instead of
//! letting stale timers fire against discarded state.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use web_time::Instant;

/// Inline capacity for one batch of due releases. Swaps arrive in page-size
/// bursts but fall due together, so most batches stay on the stack.
pub type DueReleases<N> = SmallVec<[(usize, N); 8]>;

/// A pending tombstone-to-content swap recorded by the generate step.
///
/// `node` is the outgoing tombstone; `delta` is its last committed top
/// relative to the anchor scroll top at the moment of the swap, so the
/// animate step can restate the old position after offsets are recomputed.
#[derive(Debug)]
pub struct SwapAnimation<N> {
    pub node: N,
    pub delta: f32,
}

/// Map of pending swaps for one render pass, keyed by slot index.
pub type AnimationMap<N> = FxHashMap<usize, SwapAnimation<N>>;

/// Delayed pool returns for outgoing swap nodes.
#[derive(Debug)]
pub struct DeferredReleases<N> {
    pending: FxHashMap<usize, PendingRelease<N>>,
}

#[derive(Debug)]
struct PendingRelease<N> {
    node: N,
    due: Instant,
}

impl<N> Default for DeferredReleases<N> {
    fn default() -> Self {
        Self {
            pending: FxHashMap::default(),
        }
    }
}

impl<N> DeferredReleases<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `node` for release once `due` passes.
    ///
    /// If the same slot swaps again before its earlier release fell due,
    /// the displaced node is returned so the caller can release it
    /// immediately.
    pub fn schedule(&mut self, slot: usize, node: N, due: Instant) -> Option<N> {
        self.pending
            .insert(slot, PendingRelease { node, due })
            .map(|previous| previous.node)
    }

    /// Removes and returns every release that has fallen due at `now`.
    pub fn take_due(&mut self, now: Instant) -> DueReleases<N> {
        let due_slots: SmallVec<[usize; 8]> = self
            .pending
            .iter()
            .filter(|(_, release)| release.due <= now)
            .map(|(&slot, _)| slot)
            .collect();
        due_slots
            .into_iter()
            .filter_map(|slot| self.pending.remove(&slot).map(|release| (slot, release.node)))
            .collect()
    }

    /// Cancels every pending release (full reset), handing the nodes back.
    pub fn cancel_all(&mut self) -> Vec<N> {
        self.pending
            .drain()
            .map(|(_, release)| release.node)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use web_time::Duration;

    #[test]
    fn test_release_not_due_before_deadline() {
        let mut releases: DeferredReleases<u32> = DeferredReleases::new();
        let now = Instant::now();
        releases.schedule(3, 30, now + Duration::from_millis(200));

        assert!(releases.take_due(now).is_empty());
        assert_eq!(releases.len(), 1);
    }

    #[test]
    fn test_release_falls_due() {
        let mut releases: DeferredReleases<u32> = DeferredReleases::new();
        let now = Instant::now();
        releases.schedule(3, 30, now + Duration::from_millis(200));
        releases.schedule(5, 50, now + Duration::from_millis(400));

        let due = releases.take_due(now + Duration::from_millis(250));
        assert_eq!(due.as_slice(), &[(3, 30)]);
        assert_eq!(releases.len(), 1);

        let due = releases.take_due(now + Duration::from_millis(500));
        assert_eq!(due.as_slice(), &[(5, 50)]);
        assert!(releases.is_empty());
    }

    #[test]
    fn test_reschedule_displaces_previous_node() {
        let mut releases: DeferredReleases<u32> = DeferredReleases::new();
        let now = Instant::now();
        assert_eq!(releases.schedule(3, 30, now), None);
        assert_eq!(releases.schedule(3, 31, now), Some(30));
        assert_eq!(releases.len(), 1);
    }

    #[test]
    fn test_cancel_all_hands_back_nodes() {
        let mut releases: DeferredReleases<u32> = DeferredReleases::new();
        let now = Instant::now();
        releases.schedule(1, 10, now + Duration::from_millis(200));
        releases.schedule(2, 20, now + Duration::from_millis(200));

        let mut nodes = releases.cancel_all();
        nodes.sort_unstable();
        assert_eq!(nodes, vec![10, 20]);
        assert!(releases.is_empty());
        // Nothing left to fire afterwards.
        assert!(releases.take_due(now + Duration::from_secs(1)).is_empty());
    }
}
