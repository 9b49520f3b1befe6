//! The per-event render pass.
//!
//! Each pass is a strictly ordered pipeline: resolve the anchor from the
//! scroll delta, compute the render window with direction-biased overscan,
//! recycle off-window nodes, generate or promote nodes for every in-window
//! slot, measure newly rendered content, recompute absolute offsets from
//! the anchor outward, sequence swap animations, size the scroll runway,
//! and finally gate a content request. Every step feeds the next; none of
//! them suspends.

use vitrine_window::{NodeKind, ScrollAnchor, TombstoneLayout, WindowModel};
use web_time::Instant;

use crate::animation::{AnimationMap, DeferredReleases, SwapAnimation};
use crate::config::RendererConfig;
use crate::fetch::ContentRequester;
use crate::host::{ContentSource, ItemHost, NodeTransform, Viewport};
use crate::pool::{NodePool, WindowStats};

/// Virtualized viewport renderer over an [`ItemHost`].
///
/// Single-threaded and event-driven: the host forwards mount, scroll,
/// resize, and data-arrival events, and the renderer reconciles its node
/// window synchronously inside each call.
pub struct ViewportRenderer<H: ItemHost> {
    config: RendererConfig,
    window: WindowModel<H::Record, H::Node>,
    pool: NodePool<H::Node>,
    deferred: DeferredReleases<H::Node>,
    requester: ContentRequester,
    viewport: Viewport,
    /// Latest scroll offset reported by the host.
    scroll_top: f32,
    /// Absolute offset of the anchor as of the last committed pass.
    anchor_scroll_top: f32,
    /// Monotonic scrollable extent within one session.
    runway_end: f32,
    first_item: usize,
    last_item: usize,
}

impl<H: ItemHost> ViewportRenderer<H> {
    pub fn new(config: RendererConfig) -> Self {
        let window = WindowModel::new(config.max_records);
        let requester = ContentRequester::new(config.min_request, config.max_request);
        Self {
            config,
            window,
            pool: NodePool::new(),
            deferred: DeferredReleases::new(),
            requester,
            viewport: Viewport::new(0.0, 0.0),
            scroll_top: 0.0,
            anchor_scroll_top: 0.0,
            runway_end: 0.0,
            first_item: 0,
            last_item: 0,
        }
    }

    /// Initial mount: measures the representative tombstone and runs the
    /// first pass.
    pub fn mount(&mut self, host: &mut H, source: &mut dyn ContentSource, viewport: Viewport) {
        self.viewport = viewport;
        self.measure_tombstone(host);
        self.render(host, source);
    }

    /// Viewport resize: all cached geometry is stale, remeasure everything.
    pub fn handle_resize(&mut self, host: &mut H, source: &mut dyn ContentSource, viewport: Viewport) {
        self.viewport = viewport;
        self.window.invalidate_geometry();
        self.measure_tombstone(host);
        self.render(host, source);
    }

    /// Scroll notification. Idempotent: a pass only runs if the offset
    /// actually changed since the last one.
    pub fn handle_scroll(&mut self, host: &mut H, source: &mut dyn ContentSource, scroll_top: f32) {
        if scroll_top == self.scroll_top {
            return;
        }
        self.scroll_top = scroll_top;
        self.render(host, source);
    }

    /// Data arrival from the fetch collaborator, in logical order.
    ///
    /// Clears the in-flight flag unconditionally; a short delivery simply
    /// leaves trailing slots tombstoned.
    pub fn records_arrived(
        &mut self,
        host: &mut H,
        source: &mut dyn ContentSource,
        records: Vec<H::Record>,
    ) {
        let delivered = records.len();
        for record in records {
            self.window.push_record(record);
        }
        self.requester.delivered(delivered);
        self.render(host, source);
    }

    /// Returns any outgoing swap nodes whose fade has finished to the
    /// tombstone pool. Also runs at the start of every pass; hosts may call
    /// it from an animation tick when no other event is due.
    pub fn flush_animations(&mut self, host: &mut H) {
        for (_, mut node) in self.deferred.take_due(Instant::now()) {
            host.set_visible(&mut node, false);
            self.pool.release_tombstone(node);
        }
    }

    /// Full reset (new query): discards all slot, anchor, pool, animation,
    /// and fetch state, detaching every owned node.
    pub fn reset(&mut self, host: &mut H) {
        for node in self.window.reset() {
            host.detach(node);
        }
        for node in self.pool.drain_all() {
            host.detach(node);
        }
        for node in self.deferred.cancel_all() {
            host.detach(node);
        }
        self.requester.reset();
        self.scroll_top = 0.0;
        self.anchor_scroll_top = 0.0;
        self.runway_end = 0.0;
        self.first_item = 0;
        self.last_item = 0;
        host.set_runway_extent(0.0);
        host.set_scroll_top(0.0);
    }

    /// Current render window, `[first_item, last_item)`.
    pub fn render_window(&self) -> (usize, usize) {
        (self.first_item, self.last_item)
    }

    /// Absolute anchor offset as of the last pass.
    pub fn anchor_scroll_top(&self) -> f32 {
        self.anchor_scroll_top
    }

    /// Read-only view of the window model.
    pub fn window(&self) -> &WindowModel<H::Record, H::Node> {
        &self.window
    }

    /// True while a content request is outstanding.
    pub fn fetch_in_flight(&self) -> bool {
        self.requester.in_flight()
    }

    /// Node lifecycle statistics.
    pub fn stats(&self) -> WindowStats {
        let nodes_in_use = (self.first_item..self.last_item)
            .filter(|&i| self.window.slot(i).is_some_and(|slot| slot.has_node()))
            .count();
        WindowStats {
            nodes_in_use,
            tombstones_pooled: self.pool.tombstone_count(),
            content_pooled: self.pool.content_count(),
            total_created: self.pool.total_created(),
            reuse_count: self.pool.reuse_count(),
        }
    }

    /// Mounts and measures a representative tombstone, recording the shared
    /// geometry estimate. The node is parked in the pool afterwards.
    fn measure_tombstone(&mut self, host: &mut H) {
        let mut node = match self.pool.take_tombstone() {
            Some(mut node) => {
                host.set_visible(&mut node, true);
                node
            }
            None => {
                let mut node = host.create_tombstone();
                self.pool.note_created();
                host.attach(&mut node);
                node
            }
        };
        let node_box = host.measure(&node);
        self.window
            .set_tombstone_layout(TombstoneLayout::from_measured(
                node_box.height,
                node_box.width,
            ));
        host.set_visible(&mut node, false);
        self.pool.release_tombstone(node);
    }

    /// One full reconciliation pass.
    fn render(&mut self, host: &mut H, source: &mut dyn ContentSource) {
        self.flush_animations(host);
        self.window.set_known_record_count(source.known_record_count());

        // 1. Anchor resolution.
        let delta = self.scroll_top - self.anchor_scroll_top;
        if self.scroll_top == 0.0 {
            self.window.set_anchor(ScrollAnchor::ZERO);
        } else {
            let anchor = self.window.resolve_anchor(delta);
            self.window.set_anchor(anchor);
        }
        self.anchor_scroll_top = self.scroll_top;

        // 2. Window computation: overscan is biased toward the direction of
        // travel so fast scrolling does not thrash node creation behind it.
        let anchor = self.window.anchor();
        let last_screen = self.window.resolve_anchor(self.viewport.height);
        let (first_item, last_item) = if delta < 0.0 {
            (
                anchor.index.saturating_sub(self.config.overscan_below),
                self.window
                    .cap_to_known_count(last_screen.index + self.config.overscan_above),
            )
        } else {
            (
                anchor.index.saturating_sub(self.config.overscan_above),
                self.window
                    .cap_to_known_count(last_screen.index + self.config.overscan_below),
            )
        };
        self.first_item = first_item.min(last_item);
        self.last_item = last_item;

        // 3. Recycle every node owned by a slot outside the window.
        self.collect_unused(host);

        // 5. Generate or promote nodes for every in-window slot. Runs
        // before the surplus drop so promotions can reuse released content
        // nodes (step 4 only detaches what nothing reused).
        let mut animations = self.generate_nodes(host);

        // 4. Detach surplus content nodes left in the scratch pool.
        for node in self.pool.drain_content() {
            host.detach(node);
        }

        // 6. Measure freshly rendered content, strictly after insertion.
        self.measure_nodes(host);

        // 7 + 8. Absolute offsets from the anchor outward, then placement
        // and swap transitions.
        let content_end = self.place_and_animate(host, &mut animations);

        // 9. Runway sizing (monotonic) and scroll drift correction.
        self.runway_end = self
            .runway_end
            .max(content_end + self.config.runway_length);
        host.set_runway_extent(self.runway_end);
        host.set_scroll_top(self.anchor_scroll_top);
        self.scroll_top = self.anchor_scroll_top;

        // Outgoing swap nodes stay visible for their own fade-out.
        self.schedule_releases(host, animations);

        // 10. Content request.
        self.requester.maybe_request(
            self.last_item,
            self.window.known_record_count(),
            self.window.loaded_count(),
            source,
        );
    }

    fn collect_unused(&mut self, host: &mut H) {
        for i in 0..self.window.slot_count() {
            if i >= self.first_item && i < self.last_item {
                continue;
            }
            let Some(slot) = self.window.slot_mut(i) else {
                continue;
            };
            if let Some((kind, mut node)) = slot.take_node() {
                match kind {
                    NodeKind::Tombstone => {
                        host.set_visible(&mut node, false);
                        self.pool.release_tombstone(node);
                    }
                    NodeKind::Content => self.pool.release_content(node),
                }
            }
        }
    }

    /// Ensures every in-window slot owns a node of the right kind.
    ///
    /// Tombstone slots that received data swap to content nodes; the
    /// outgoing tombstone is recorded as a pending animation rather than
    /// replaced instantly.
    fn generate_nodes(&mut self, host: &mut H) -> AnimationMap<H::Node> {
        let mut animations = AnimationMap::default();
        for i in self.first_item..self.last_item {
            let Some(slot) = self.window.ensure_slot(i) else {
                break;
            };
            let has_data = slot.data.is_some();

            if let Some((kind, node)) = slot.take_node() {
                if kind == NodeKind::Tombstone && has_data {
                    // Swap: remember where the outgoing tombstone sat,
                    // relative to the anchor offset in force when it was
                    // placed, so the animation survives the offset
                    // recompute later in this pass.
                    let delta = slot.top.unwrap_or(self.anchor_scroll_top) - self.anchor_scroll_top;
                    animations.insert(i, SwapAnimation { node, delta });
                } else {
                    // Kind already matches the data state.
                    slot.put_node(kind, node);
                    continue;
                }
            }

            let (kind, node) = if has_data {
                let reuse = self.pool.take_content();
                let fresh = reuse.is_none();
                let Some(record) = self.window.slot(i).and_then(|slot| slot.data.as_ref()) else {
                    continue;
                };
                let mut node = host.render_item(record, reuse);
                if fresh {
                    self.pool.note_created();
                    host.attach(&mut node);
                }
                (NodeKind::Content, node)
            } else {
                let node = match self.pool.take_tombstone() {
                    Some(mut node) => {
                        host.set_visible(&mut node, true);
                        node
                    }
                    None => {
                        let mut node = host.create_tombstone();
                        self.pool.note_created();
                        host.attach(&mut node);
                        node
                    }
                };
                (NodeKind::Tombstone, node)
            };

            if let Some(slot) = self.window.slot_mut(i) {
                slot.top = None;
                slot.put_node(kind, node);
            }
        }
        animations
    }

    /// Reads the rendered box of every in-window content slot whose height
    /// is still unknown. Idempotent: measured slots are never re-read.
    fn measure_nodes(&mut self, host: &mut H) {
        for i in self.first_item..self.last_item {
            let Some(slot) = self.window.slot_mut(i) else {
                continue;
            };
            if slot.data.is_some() && slot.height.is_none() {
                if let Some(node) = slot.node() {
                    let node_box = host.measure(node);
                    slot.record_box(node_box.height, node_box.width);
                }
            }
        }
    }

    /// Recomputes absolute offsets from the anchor outward and applies
    /// placement transforms; swap participants get the shrink/fade
    /// sequence keyed to the outgoing tombstone's old box.
    ///
    /// Returns the offset just past the last rendered item.
    fn place_and_animate(&mut self, host: &mut H, animations: &mut AnimationMap<H::Node>) -> f32 {
        let anchor = self.window.anchor();
        self.anchor_scroll_top = self.window.anchor_scroll_top();
        let tombstone = self.window.tombstone();
        let duration = self.config.animation_duration;

        // Pre-position incoming swap nodes over the outgoing tombstone's
        // box: translated to the old spot, scaled down to tombstone size.
        for (&i, swap) in animations.iter() {
            let Some(slot) = self.window.slot_mut(i) else {
                continue;
            };
            let height = slot.height.unwrap_or(tombstone.height);
            let width = slot.width.unwrap_or(tombstone.width);
            let transform = NodeTransform {
                translate_y: self.anchor_scroll_top + swap.delta,
                scale: (safe_ratio(tombstone.width, width), safe_ratio(tombstone.height, height)),
                opacity: 1.0,
                transition: None,
            };
            if let Some(node) = slot.node_mut() {
                host.apply_transform(node, &transform);
            }
        }

        // Walk from the anchor back to the window start.
        let mut current = self.anchor_scroll_top - anchor.offset;
        let tombstone_height = tombstone.height;
        let mut index = anchor.index;
        while index > self.first_item {
            index -= 1;
            current -= self.slot_height(index, tombstone_height);
        }
        while index < self.first_item {
            current += self.slot_height(index, tombstone_height);
            index += 1;
        }

        for i in self.first_item..self.last_item {
            let Some(slot) = self.window.slot_mut(i) else {
                break;
            };
            let height = slot.height.unwrap_or(tombstone_height);
            let width = slot.width.unwrap_or(tombstone.width);

            if let Some(swap) = animations.get_mut(&i) {
                // Outgoing tombstone slides to the new spot while scaling
                // up to the content's box and fading out.
                let outgoing = NodeTransform {
                    translate_y: current,
                    scale: (
                        safe_ratio(width, tombstone.width),
                        safe_ratio(height, tombstone_height),
                    ),
                    opacity: 0.0,
                    transition: Some(duration),
                };
                host.apply_transform(&mut swap.node, &outgoing);
                // Incoming content settles into place.
                if let Some(node) = slot.node_mut() {
                    host.apply_transform(node, &NodeTransform::slide(current, duration));
                }
                slot.top = Some(current);
            } else if slot.top != Some(current) {
                if let Some(node) = slot.node_mut() {
                    host.apply_transform(node, &NodeTransform::place(current));
                }
                slot.top = Some(current);
            }

            current += height;
        }
        current
    }

    fn slot_height(&self, index: usize, tombstone_height: f32) -> f32 {
        self.window
            .slot(index)
            .and_then(|slot| slot.height)
            .unwrap_or(tombstone_height)
    }

    fn schedule_releases(&mut self, host: &mut H, animations: AnimationMap<H::Node>) {
        if animations.is_empty() {
            return;
        }
        let due = Instant::now() + self.config.animation_duration;
        for (i, swap) in animations {
            if let Some(mut displaced) = self.deferred.schedule(i, swap.node, due) {
                // The slot swapped again before the earlier fade finished.
                host.set_visible(&mut displaced, false);
                self.pool.release_tombstone(displaced);
            }
        }
    }
}

/// Scale factor guarded against degenerate (zero) boxes.
fn safe_ratio(numerator: f32, denominator: f32) -> f32 {
    if numerator > 0.0 && denominator > 0.0 {
        numerator / denominator
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::NodeBox;

    /// Minimal host: nodes are ids, content measures 150x300, tombstones
    /// 100x300.
    struct MiniHost {
        next_id: u32,
        attached: Vec<u32>,
        detached: Vec<u32>,
    }

    impl MiniHost {
        fn new() -> Self {
            Self {
                next_id: 0,
                attached: Vec::new(),
                detached: Vec::new(),
            }
        }
    }

    #[derive(Debug, PartialEq)]
    struct MiniNode {
        id: u32,
        content: bool,
    }

    impl ItemHost for MiniHost {
        type Record = u32;
        type Node = MiniNode;

        fn create_tombstone(&mut self) -> MiniNode {
            let id = self.next_id;
            self.next_id += 1;
            MiniNode { id, content: false }
        }

        fn render_item(&mut self, _record: &u32, reuse: Option<MiniNode>) -> MiniNode {
            match reuse {
                Some(mut node) => {
                    node.content = true;
                    node
                }
                None => {
                    let id = self.next_id;
                    self.next_id += 1;
                    MiniNode { id, content: true }
                }
            }
        }

        fn attach(&mut self, node: &mut MiniNode) {
            self.attached.push(node.id);
        }

        fn detach(&mut self, node: MiniNode) {
            self.detached.push(node.id);
        }

        fn measure(&mut self, node: &MiniNode) -> NodeBox {
            if node.content {
                NodeBox {
                    height: 150.0,
                    width: 300.0,
                }
            } else {
                NodeBox {
                    height: 100.0,
                    width: 300.0,
                }
            }
        }

        fn apply_transform(&mut self, _node: &mut MiniNode, _transform: &NodeTransform) {}

        fn set_visible(&mut self, _node: &mut MiniNode, _visible: bool) {}

        fn set_runway_extent(&mut self, _extent: f32) {}

        fn set_scroll_top(&mut self, _scroll_top: f32) {}
    }

    struct MiniSource {
        known: usize,
        requests: Vec<usize>,
    }

    impl ContentSource for MiniSource {
        fn known_record_count(&self) -> usize {
            self.known
        }

        fn request_more(&mut self, count: usize) {
            self.requests.push(count);
        }
    }

    fn renderer() -> ViewportRenderer<MiniHost> {
        ViewportRenderer::new(RendererConfig::default())
    }

    #[test]
    fn test_mount_backs_full_window_with_nodes() {
        let mut host = MiniHost::new();
        let mut source = MiniSource {
            known: 500,
            requests: Vec::new(),
        };
        let mut vr = renderer();
        vr.mount(&mut host, &mut source, Viewport::new(400.0, 500.0));

        let (first, last) = vr.render_window();
        assert_eq!(first, 0);
        assert!(last > 0);
        for i in first..last {
            assert!(
                vr.window().slot(i).is_some_and(|slot| slot.has_node()),
                "slot {i} has no node after reconciliation"
            );
        }
        // Nothing loaded yet, so a request went out.
        assert_eq!(source.requests.len(), 1);
        assert!(vr.fetch_in_flight());
    }

    #[test]
    fn test_scroll_without_offset_change_is_a_no_op() {
        let mut host = MiniHost::new();
        let mut source = MiniSource {
            known: 500,
            requests: Vec::new(),
        };
        let mut vr = renderer();
        vr.mount(&mut host, &mut source, Viewport::new(400.0, 500.0));
        let created = host.next_id;

        // The renderer corrected scroll_top at mount; echoing it back must
        // not trigger another pass.
        let echoed = vr.anchor_scroll_top();
        vr.handle_scroll(&mut host, &mut source, echoed);
        assert_eq!(host.next_id, created);
    }

    #[test]
    fn test_window_stays_within_known_count() {
        let mut host = MiniHost::new();
        let mut source = MiniSource {
            known: 12,
            requests: Vec::new(),
        };
        let mut vr = renderer();
        vr.mount(&mut host, &mut source, Viewport::new(400.0, 500.0));

        let (first, last) = vr.render_window();
        assert_eq!(first, 0);
        assert_eq!(last, 12);
    }

    #[test]
    fn test_reset_detaches_everything() {
        let mut host = MiniHost::new();
        let mut source = MiniSource {
            known: 500,
            requests: Vec::new(),
        };
        let mut vr = renderer();
        vr.mount(&mut host, &mut source, Viewport::new(400.0, 500.0));
        vr.records_arrived(&mut host, &mut source, (0..30).collect());

        vr.reset(&mut host);
        assert_eq!(vr.window().slot_count(), 0);
        assert_eq!(vr.stats().tombstones_pooled, 0);
        assert_eq!(vr.render_window(), (0, 0));
        // Every node that entered the tree has left it.
        assert_eq!(host.detached.len(), host.attached.len());
        assert_eq!(host.detached.len() as u32, host.next_id);
    }
}
