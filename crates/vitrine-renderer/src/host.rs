//! Collaborator traits at the renderer's boundary.
//!
//! The renderer has no network or file format of its own; its entire
//! surface is calls to and from these collaborators. `ItemHost` wraps the
//! host UI (node creation, attachment, measurement, transforms) and
//! `ContentSource` wraps the data-fetching side.

use web_time::Duration;

/// Viewport geometry as seen by the renderer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Visible width in pixels.
    pub width: f32,
    /// Visible height in pixels.
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// A node's rendered box, read after attachment.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeBox {
    pub height: f32,
    pub width: f32,
}

/// Absolute placement plus optional transition applied to a node.
///
/// `scale` and `opacity` only depart from identity during a
/// tombstone-to-content swap; plain repositioning is a bare translate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeTransform {
    /// Absolute scroll-axis offset.
    pub translate_y: f32,
    /// Cross-axis / main-axis scale, identity `(1, 1)` outside swaps.
    pub scale: (f32, f32),
    /// Opacity, identity `1.0` outside swap fade-outs.
    pub opacity: f32,
    /// Transition duration; `None` commits the transform instantly.
    pub transition: Option<Duration>,
}

impl NodeTransform {
    /// Instant translate with no scale/opacity change.
    pub fn place(translate_y: f32) -> Self {
        Self {
            translate_y,
            scale: (1.0, 1.0),
            opacity: 1.0,
            transition: None,
        }
    }

    /// Translate animated over `duration`.
    pub fn slide(translate_y: f32, duration: Duration) -> Self {
        Self {
            transition: Some(duration),
            ..Self::place(translate_y)
        }
    }
}

/// Host UI collaborator: owns node presentation.
///
/// Nodes are opaque handles; the renderer only moves them between slots and
/// pools and tells the host where they go. The host must keep `measure`
/// valid for any node that has been attached and not yet detached — the
/// renderer always measures strictly after insertion, within the same pass.
pub trait ItemHost {
    /// The catalog data record. A black-box renderable.
    type Record;
    /// Handle to one rendered visual node.
    type Node;

    /// Produces a fresh placeholder node. Not yet attached.
    fn create_tombstone(&mut self) -> Self::Node;

    /// Renders `record` into `reuse` if given, otherwise into a fresh node.
    /// The returned node is attached iff `reuse` was (reused content nodes
    /// stay in the tree).
    fn render_item(&mut self, record: &Self::Record, reuse: Option<Self::Node>) -> Self::Node;

    /// Inserts a node into the render tree.
    fn attach(&mut self, node: &mut Self::Node);

    /// Removes a node from the render tree, consuming the handle.
    fn detach(&mut self, node: Self::Node);

    /// Reads an attached node's rendered box.
    fn measure(&mut self, node: &Self::Node) -> NodeBox;

    /// Applies placement (and any transition) to an attached node.
    fn apply_transform(&mut self, node: &mut Self::Node, transform: &NodeTransform);

    /// Shows or hides an attached node without detaching it. Pooled
    /// tombstones are hidden, not removed, because they recycle at high
    /// frequency.
    fn set_visible(&mut self, node: &mut Self::Node, visible: bool);

    /// Extends the scrollable content area to `extent` pixels.
    fn set_runway_extent(&mut self, extent: f32);

    /// Sets the scroll container's real scroll offset.
    fn set_scroll_top(&mut self, scroll_top: f32);
}

/// Data-fetching collaborator.
///
/// `request_more` is fire-and-forget: the renderer never awaits it, and the
/// source is expected to eventually deliver records (in logical order)
/// through [`ViewportRenderer::records_arrived`](crate::ViewportRenderer::records_arrived).
pub trait ContentSource {
    /// Total record count as currently known. May be refined over the
    /// session, e.g. after the first page lands.
    fn known_record_count(&self) -> usize;

    /// Requests `count` additional records.
    fn request_more(&mut self, count: usize);
}
