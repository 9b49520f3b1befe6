//! Node recycling pools.
//!
//! Off-window nodes are split by kind: tombstones go to a persistent free
//! list (they stay attached, hidden, and recycle at high frequency), while
//! released content nodes are a per-pass scratch list — whatever the
//! generate step does not reuse is detached before the pass commits.

/// Statistics about node lifecycle in the window.
///
/// Used for testing and debugging virtualization behavior.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WindowStats {
    /// Nodes currently owned by in-window slots.
    pub nodes_in_use: usize,
    /// Tombstone nodes parked in the free list.
    pub tombstones_pooled: usize,
    /// Content nodes awaiting reuse within the current pass.
    pub content_pooled: usize,
    /// Total nodes the renderer has asked the host to create.
    pub total_created: usize,
    /// Nodes handed back out of a pool instead of freshly created.
    pub reuse_count: usize,
}

/// Free lists for recyclable nodes, split by kind.
///
/// A node is owned by exactly one slot or one pool at a time; callers move
/// nodes in and out by value.
#[derive(Debug)]
pub struct NodePool<N> {
    tombstones: Vec<N>,
    content: Vec<N>,
    total_created: usize,
    reuse_count: usize,
}

impl<N> Default for NodePool<N> {
    fn default() -> Self {
        Self {
            tombstones: Vec::new(),
            content: Vec::new(),
            total_created: 0,
            reuse_count: 0,
        }
    }
}

impl<N> NodePool<N> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parks a tombstone node for reuse. The caller hides it first; it
    /// stays attached.
    pub fn release_tombstone(&mut self, node: N) {
        self.tombstones.push(node);
    }

    /// Parks a content node for reuse within this pass.
    pub fn release_content(&mut self, node: N) {
        self.content.push(node);
    }

    /// Takes a pooled tombstone, if any.
    pub fn take_tombstone(&mut self) -> Option<N> {
        let node = self.tombstones.pop();
        if node.is_some() {
            self.reuse_count += 1;
        }
        node
    }

    /// Takes a pooled content node, if any.
    pub fn take_content(&mut self) -> Option<N> {
        let node = self.content.pop();
        if node.is_some() {
            self.reuse_count += 1;
        }
        node
    }

    /// Records a node freshly created by the host.
    pub fn note_created(&mut self) {
        self.total_created += 1;
    }

    /// Drains the per-pass content scratch list; the caller detaches each.
    pub fn drain_content(&mut self) -> Vec<N> {
        std::mem::take(&mut self.content)
    }

    /// Drains everything (full reset); the caller detaches each node.
    pub fn drain_all(&mut self) -> Vec<N> {
        let mut nodes = std::mem::take(&mut self.tombstones);
        nodes.append(&mut self.content);
        nodes
    }

    pub fn tombstone_count(&self) -> usize {
        self.tombstones.len()
    }

    pub fn content_count(&self) -> usize {
        self.content.len()
    }

    pub fn total_created(&self) -> usize {
        self.total_created
    }

    pub fn reuse_count(&self) -> usize {
        self.reuse_count
    }
}
