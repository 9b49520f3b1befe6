//! Per-index slot state for the virtual window.
//!
//! A slot tracks one logical item position: its data record (if loaded),
//! the visual node it currently owns (if any), and its last committed
//! geometry. Node ownership moves between slots and the renderer's pools by
//! explicit transfer (`take_node`/`put_node`), never by aliasing.

/// Kind of node a slot currently owns.
///
/// Recorded by the code that created the node, so tombstone-vs-content
/// decisions never inspect the node itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    /// Placeholder node with estimated geometry.
    Tombstone,
    /// Node rendered from a real data record.
    Content,
}

/// State of one logical item position.
///
/// `R` is the host's data record type, `N` its node handle type.
#[derive(Debug)]
pub struct Slot<R, N> {
    /// The item record, or `None` while unloaded.
    pub data: Option<R>,
    node: Option<(NodeKind, N)>,
    /// Last committed offset in scroll-axis pixels. `None` until placed.
    pub top: Option<f32>,
    /// Measured height in pixels. `None` until the node has been laid out.
    pub height: Option<f32>,
    /// Measured width in pixels. `None` until the node has been laid out.
    pub width: Option<f32>,
}

impl<R, N> Default for Slot<R, N> {
    fn default() -> Self {
        Self {
            data: None,
            node: None,
            top: None,
            height: None,
            width: None,
        }
    }
}

impl<R, N> Slot<R, N> {
    /// Creates a blank slot with tombstone defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the slot currently owns a node.
    pub fn has_node(&self) -> bool {
        self.node.is_some()
    }

    /// Kind of the owned node, if any.
    pub fn node_kind(&self) -> Option<NodeKind> {
        self.node.as_ref().map(|(kind, _)| *kind)
    }

    /// Borrows the owned node, if any.
    pub fn node(&self) -> Option<&N> {
        self.node.as_ref().map(|(_, node)| node)
    }

    /// Mutably borrows the owned node, if any.
    pub fn node_mut(&mut self) -> Option<&mut N> {
        self.node.as_mut().map(|(_, node)| node)
    }

    /// Transfers the owned node out of the slot.
    pub fn take_node(&mut self) -> Option<(NodeKind, N)> {
        self.node.take()
    }

    /// Transfers a node into the slot.
    ///
    /// A slot without data never holds a content node; that pairing is a
    /// logic error in the reconciliation pass.
    pub fn put_node(&mut self, kind: NodeKind, node: N) {
        debug_assert!(
            kind == NodeKind::Tombstone || self.data.is_some(),
            "content node assigned to a slot without data"
        );
        debug_assert!(self.node.is_none(), "slot already owns a node");
        self.node = Some((kind, node));
    }

    /// Records the measured box. Sticky: once a height is known it is kept
    /// until [`clear_geometry`](Self::clear_geometry) wipes it on resize.
    pub fn record_box(&mut self, height: f32, width: f32) {
        if self.height.is_none() {
            self.height = Some(height);
            self.width = Some(width);
        }
    }

    /// Drops all cached geometry (resize invalidation). Data and node
    /// ownership are untouched.
    pub fn clear_geometry(&mut self) {
        self.top = None;
        self.height = None;
        self.width = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_slot_has_tombstone_defaults() {
        let slot: Slot<String, u32> = Slot::new();
        assert!(slot.data.is_none());
        assert!(!slot.has_node());
        assert!(slot.top.is_none());
        assert!(slot.height.is_none());
    }

    #[test]
    fn test_node_transfer() {
        let mut slot: Slot<String, u32> = Slot::new();
        slot.put_node(NodeKind::Tombstone, 7);
        assert_eq!(slot.node_kind(), Some(NodeKind::Tombstone));
        assert_eq!(slot.node(), Some(&7));

        let (kind, node) = slot.take_node().unwrap();
        assert_eq!(kind, NodeKind::Tombstone);
        assert_eq!(node, 7);
        assert!(!slot.has_node());
    }

    #[test]
    fn test_measured_box_is_sticky() {
        let mut slot: Slot<String, u32> = Slot::new();
        slot.record_box(120.0, 80.0);
        // A second measurement must not overwrite the first.
        slot.record_box(300.0, 300.0);
        assert_eq!(slot.height, Some(120.0));
        assert_eq!(slot.width, Some(80.0));
    }

    #[test]
    fn test_clear_geometry_resets_measurement() {
        let mut slot: Slot<String, u32> = Slot::new();
        slot.record_box(120.0, 80.0);
        slot.top = Some(240.0);
        slot.clear_geometry();
        assert!(slot.height.is_none());
        assert!(slot.top.is_none());
        // Cleared geometry can be measured again.
        slot.record_box(90.0, 80.0);
        assert_eq!(slot.height, Some(90.0));
    }

    #[test]
    #[should_panic(expected = "content node assigned")]
    #[cfg(debug_assertions)]
    fn test_content_node_requires_data() {
        let mut slot: Slot<String, u32> = Slot::new();
        slot.put_node(NodeKind::Content, 1);
    }
}
