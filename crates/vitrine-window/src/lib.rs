//! Window model for the Vitrine virtual scroller.
//!
//! Pure bookkeeping over an ordered, sparse sequence of slots (one per
//! logical item position) plus the scroll anchor that ties offset space to
//! index space. Knows nothing about the host UI: nodes are an opaque type
//! parameter owned by slots, and all geometry is plain `f32` pixels.
//!
//! The renderer crate drives this model; see `vitrine-renderer`.

mod anchor;
mod slot;
mod tombstone;
mod window;

pub use anchor::ScrollAnchor;
pub use slot::{NodeKind, Slot};
pub use tombstone::{TombstoneLayout, DEFAULT_TOMBSTONE_HEIGHT};
pub use window::WindowModel;
