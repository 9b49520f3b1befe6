//! The window model: sparse slot sequence + scroll anchor.
//!
//! Translates between scroll-offset space and index space using per-slot
//! measured heights, falling back to the shared tombstone estimate for
//! slots whose real geometry is not known yet. All walks are bounded
//! iterative loops over the slot vector; the unmeasured remainder of a walk
//! is covered by whole tombstone-height steps.

use crate::anchor::ScrollAnchor;
use crate::slot::Slot;
use crate::tombstone::TombstoneLayout;

/// Slot and anchor bookkeeping for one virtual scroller session.
///
/// `R` is the data record type, `N` the host's node handle type. The model
/// never touches nodes beyond owning them inside slots; rendering and
/// measurement are the renderer's job.
pub struct WindowModel<R, N> {
    slots: Vec<Slot<R, N>>,
    anchor: ScrollAnchor,
    tombstone: TombstoneLayout,
    /// Total record count reported by the data collaborator. May be refined
    /// over the session.
    known_record_count: usize,
    /// Hard upper bound on how many logical slots this model will address.
    max_records: usize,
    /// Number of leading slots that hold data.
    loaded_count: usize,
}

impl<R, N> WindowModel<R, N> {
    /// Creates an empty model addressing at most `max_records` slots.
    pub fn new(max_records: usize) -> Self {
        Self {
            slots: Vec::new(),
            anchor: ScrollAnchor::ZERO,
            tombstone: TombstoneLayout::default(),
            known_record_count: 0,
            max_records,
            loaded_count: 0,
        }
    }

    /// Current anchor.
    pub fn anchor(&self) -> ScrollAnchor {
        self.anchor
    }

    /// Commits a resolved anchor.
    pub fn set_anchor(&mut self, anchor: ScrollAnchor) {
        self.anchor = anchor;
    }

    /// Current tombstone geometry estimate.
    pub fn tombstone(&self) -> TombstoneLayout {
        self.tombstone
    }

    /// Replaces the tombstone estimate (initial mount or resize remeasure).
    pub fn set_tombstone_layout(&mut self, layout: TombstoneLayout) {
        self.tombstone = layout;
    }

    /// Updates the known total record count.
    pub fn set_known_record_count(&mut self, count: usize) {
        self.known_record_count = count;
    }

    /// Known total record count as last reported.
    pub fn known_record_count(&self) -> usize {
        self.known_record_count
    }

    /// Number of leading slots holding data.
    pub fn loaded_count(&self) -> usize {
        self.loaded_count
    }

    /// Number of slots created so far.
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Borrows the slot at `index`, if it has been created.
    pub fn slot(&self, index: usize) -> Option<&Slot<R, N>> {
        self.slots.get(index)
    }

    /// Mutably borrows the slot at `index`, if it has been created.
    pub fn slot_mut(&mut self, index: usize) -> Option<&mut Slot<R, N>> {
        self.slots.get_mut(index)
    }

    /// Lazily extends the slot vector so `index` is addressable, returning
    /// the slot. Indices at or past `max_records` are never created.
    pub fn ensure_slot(&mut self, index: usize) -> Option<&mut Slot<R, N>> {
        if index >= self.max_records {
            return None;
        }
        while self.slots.len() <= index {
            self.slots.push(Slot::new());
        }
        self.slots.get_mut(index)
    }

    /// Appends the next record in logical order.
    ///
    /// Returns the index the record landed in, or `None` once the
    /// addressing bound is reached (the record is dropped).
    pub fn push_record(&mut self, record: R) -> Option<usize> {
        let index = self.loaded_count;
        let slot = self.ensure_slot(index)?;
        slot.data = Some(record);
        self.loaded_count += 1;
        Some(index)
    }

    /// Clamps a candidate index to the known record count and the
    /// addressing bound. Never render past the end of the collection,
    /// even speculatively.
    pub fn cap_to_known_count(&self, index: usize) -> usize {
        index.min(self.known_record_count).min(self.max_records)
    }

    /// Resolves the anchor after a signed pixel scroll `delta`.
    ///
    /// `delta == 0` is a no-op fast path; this runs on every scroll tick.
    /// Otherwise the delta is folded into the anchor offset and walked
    /// across slots with known heights; whatever distance remains when the
    /// walk runs off known geometry is covered by whole tombstone-height
    /// steps, `ceil`ed backward / `floor`ed forward so the walk never
    /// overshoots into an index that would need re-walking. Both loops are
    /// bounded by the slot vector, never recursive.
    pub fn resolve_anchor(&self, delta: f32) -> ScrollAnchor {
        if delta == 0.0 {
            return self.anchor;
        }

        let tombstone_height = self.tombstone.height;
        let mut index = self.anchor.index;
        let mut remainder = delta + self.anchor.offset;
        let mut tombstones: isize = 0;

        if remainder < 0.0 {
            while remainder < 0.0 && index > 0 {
                match self.slots.get(index - 1).and_then(|slot| slot.height) {
                    Some(height) => {
                        remainder += height;
                        index -= 1;
                    }
                    None => break,
                }
            }
            tombstones = ((remainder.min(0.0) / tombstone_height).ceil() as isize)
                .max(-(index as isize));
        } else {
            while index < self.slots.len() {
                match self.slots[index].height {
                    Some(height) if height < remainder => {
                        remainder -= height;
                        index += 1;
                    }
                    _ => break,
                }
            }
            if index >= self.slots.len() || self.slots[index].height.is_none() {
                tombstones = (remainder.max(0.0) / tombstone_height).floor() as isize;
            }
        }

        let index = (index as isize + tombstones).max(0) as usize;
        let offset = remainder - tombstones as f32 * tombstone_height;
        ScrollAnchor::new(index, offset)
    }

    /// Cumulative extent of every slot before `index`, substituting the
    /// tombstone estimate for unknown heights. Indices beyond the created
    /// slots are covered entirely by tombstone steps.
    pub fn offset_of_index(&self, index: usize) -> f32 {
        let tombstone_height = self.tombstone.height;
        let measured: f32 = self
            .slots
            .iter()
            .take(index)
            .map(|slot| slot.height.unwrap_or(tombstone_height))
            .sum();
        if index > self.slots.len() {
            measured + (index - self.slots.len()) as f32 * tombstone_height
        } else {
            measured
        }
    }

    /// Absolute scroll-space offset of the current anchor.
    pub fn anchor_scroll_top(&self) -> f32 {
        self.offset_of_index(self.anchor.index) + self.anchor.offset
    }

    /// Drops all cached slot geometry (resize invalidation). Data, node
    /// ownership, and the anchor survive.
    pub fn invalidate_geometry(&mut self) {
        for slot in &mut self.slots {
            slot.clear_geometry();
        }
    }

    /// Discards every slot and resets the anchor, handing back all owned
    /// nodes so the caller can detach them.
    pub fn reset(&mut self) -> Vec<N> {
        let nodes = self
            .slots
            .drain(..)
            .filter_map(|mut slot| slot.take_node().map(|(_, node)| node))
            .collect();
        self.anchor = ScrollAnchor::ZERO;
        self.known_record_count = 0;
        self.loaded_count = 0;
        nodes
    }
}
