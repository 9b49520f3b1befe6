//! Scoped resize subscription.
//!
//! The resize notifier is an explicit resource rather than a process-wide
//! singleton: the renderer's owner subscribes on construction and the
//! subscription unregisters itself when the returned binding drops, so no
//! callback can outlive the component that registered it.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::host::Viewport;

type ResizeCallback = Rc<dyn Fn(Viewport)>;

#[derive(Default)]
struct NotifierInner {
    callbacks: Vec<(u64, ResizeCallback)>,
    next_id: u64,
}

/// Registry of resize callbacks keyed by subscription id.
///
/// Cheap to clone; clones share the same registry.
#[derive(Clone, Default)]
pub struct ResizeNotifier {
    inner: Rc<RefCell<NotifierInner>>,
}

impl ResizeNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `callback` and returns the binding that keeps it alive.
    #[must_use = "dropping the binding unsubscribes immediately"]
    pub fn subscribe(&self, callback: ResizeCallback) -> ResizeBinding {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.callbacks.push((id, callback));
        ResizeBinding {
            notifier: Rc::downgrade(&self.inner),
            id,
        }
    }

    /// Invokes every live callback with the new viewport.
    pub fn notify(&self, viewport: Viewport) {
        // Snapshot so a callback may drop its own binding mid-notify.
        let callbacks: Vec<ResizeCallback> = self
            .inner
            .borrow()
            .callbacks
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect();
        for callback in callbacks {
            callback(viewport);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().callbacks.len()
    }
}

/// RAII guard for one resize subscription; unregisters on drop.
pub struct ResizeBinding {
    notifier: Weak<RefCell<NotifierInner>>,
    id: u64,
}

impl Drop for ResizeBinding {
    fn drop(&mut self) {
        if let Some(inner) = self.notifier.upgrade() {
            inner
                .borrow_mut()
                .callbacks
                .retain(|(id, _)| *id != self.id);
        }
    }
}
