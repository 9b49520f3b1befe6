//! Viewport renderer for the Vitrine virtual scroller.
//!
//! Drives the window model from viewport events: on every scroll, resize,
//! or data-arrival event it recomputes the visible window plus overscan,
//! reconciles live nodes against that window (promoting tombstones,
//! recycling off-window nodes through pools), repositions everything by
//! absolute offset, sequences the tombstone-to-content swap animations, and
//! gates content requests to the data collaborator.
//!
//! Everything here is single-threaded and event-driven; the one async step
//! (content fetch) is fire-and-forget and only gated by an in-flight flag.

mod animation;
mod config;
mod events;
mod fetch;
mod host;
mod pool;
mod renderer;

pub use animation::{DeferredReleases, DueReleases, SwapAnimation};
pub use config::RendererConfig;
pub use events::{ResizeBinding, ResizeNotifier};
pub use fetch::ContentRequester;
pub use host::{ContentSource, ItemHost, NodeBox, NodeTransform, Viewport};
pub use pool::{NodePool, WindowStats};
pub use renderer::ViewportRenderer;
